// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for control-plane communication (spec §4.M, §6).
//!
//! Transport-agnostic per spec §6 ("JSON over a local socket is suitable");
//! [`pinokio_daemon`] runs the listener, [`pinokio_cli`] is the only
//! client. Wire format: 4-byte big-endian length prefix + JSON payload,
//! unchanged from the teacher's `oj-wire` framing.
//!
//! Payloads that mirror a spec §3 data-model entity re-use the
//! `pinokio_core` type directly (`ProcessRecord`, `TunnelRecord`,
//! `AppStateRecord`, `Alert`, `Event`) rather than redeclaring a parallel
//! wire struct — unlike the teacher, whose wire crate predates its core
//! crate's typed records and so redeclares `JobSummary`/`WorkerSummary`/etc.
//! Payloads owned by a crate this one does not depend on (cache stats, perf
//! samples, recovery patterns/history) are carried as `serde_json::Value`,
//! the same "opaque until the owning crate decodes it" shape spec §3 uses
//! for cache blob references.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod wire;

pub use request::{CacheValueWire, Request};
pub use response::Response;
pub use wire::{
    decode, encode, read_message, read_request, read_response, write_message, write_request, write_response,
    ProtocolError, MAX_FRAME_BYTES,
};

/// Protocol version exchanged in the `Hello`/`Welcome` handshake. Bumped
/// whenever a `Request`/`Response` variant changes shape in a way an older
/// client or daemon could misinterpret.
pub const PROTOCOL_VERSION: u32 = 1;

#[cfg(test)]
mod property_tests;
