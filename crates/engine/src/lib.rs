// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pinokio-engine: the Install Engine (spec §4.F). Drives one app's
//! install state machine from a detected installer kind through
//! checkpointed step execution to a persisted `installed`/`failed`
//! outcome.

pub mod driver;
pub mod engine;
pub mod inputs;
pub mod progress;
pub mod state_store;
pub mod steps;
pub mod vars;

pub use driver::{build_steps, ScriptInterpreter};
pub use engine::{InstallEngine, InstallRequest};
pub use inputs::{validate_form, FieldKind, FieldSpec, FormValues, Validator};
pub use progress::ProgressBus;
pub use state_store::StateStore;
pub use steps::{Checkpoint, InstallStep, StepOp};
pub use vars::VarScope;
