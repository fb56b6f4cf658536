// src/engine/mod.rs

//! Launch orchestration.
//!
//! This module ties together:
//! - the per-stage outcome type and the single-slot error accumulator
//!   ([`outcome`])
//! - the host reporter the single user-visible error goes to ([`report`])
//! - the straight-line pipeline driver ([`orchestrator`])

pub mod orchestrator;
pub mod outcome;
pub mod report;

pub use orchestrator::{Invocation, Orchestrator};
pub use outcome::{ErrorRecord, ErrorSlot, LaunchOutcome, tagged};
pub use report::{ConsoleReporter, HostReporter, default_reporter};

#[cfg(windows)]
pub use report::DialogReporter;
