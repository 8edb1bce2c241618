// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable string identifiers.
//!
//! `AppId` is operator-chosen (it comes from the catalog entry), while
//! `ProcessId`, `TunnelId` and `AlertId` are generated. `CacheKey` is
//! caller-chosen and may embed the kind, so it is a thin wrapper with no
//! generation helper.

use std::fmt;

macro_rules! string_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Build an id from an existing string (catalog ids, round-tripped ids).
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Generate a fresh id with this kind's conventional prefix.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, nanoid::nanoid!(16)))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(AppId, "app");
string_id!(ProcessId, "proc");
string_id!(TunnelId, "tun");
string_id!(AlertId, "alert");
string_id!(CacheKey, "key");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
