// src/engine/outcome.rs

//! Stage results and the pipeline's single-slot error accumulator.

use std::fmt;

/// Why a stage failed, as shown to the user.
///
/// The executable tag is attached after construction by whoever knows which
/// stage produced the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    message: String,
    code: i32,
    executable: Option<String>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code,
            executable: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn executable(&self) -> Option<&str> {
        self.executable.as_deref()
    }

    /// Tag the record with the executable that failed. An existing tag wins.
    pub fn tag_executable(&mut self, executable: impl Into<String>) {
        if self.executable.is_none() {
            self.executable = Some(executable.into());
        }
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.tag_executable(executable);
        self
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(exe) = &self.executable {
            write!(f, " (executable: {exe})")?;
        }
        write!(f, " [error {}]", self.code)
    }
}

impl std::error::Error for ErrorRecord {}

/// Result of one stage.
pub type LaunchOutcome = std::result::Result<(), ErrorRecord>;

/// Tag any error in `outcome` with `executable`.
pub fn tagged(outcome: LaunchOutcome, executable: &str) -> LaunchOutcome {
    outcome.map_err(|e| e.with_executable(executable))
}

/// Holds at most one carried error.
///
/// The first error recorded sticks; later records are ignored so a skipped or
/// later stage can never replace it.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    carried: Option<ErrorRecord>,
}

impl ErrorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.carried.is_none()
    }

    /// Record the error from `outcome` if the slot is still empty.
    ///
    /// Returns `true` when `outcome` was an error (recorded or not).
    pub fn record(&mut self, outcome: LaunchOutcome) -> bool {
        match outcome {
            Ok(()) => false,
            Err(err) => {
                if self.carried.is_none() {
                    self.carried = Some(err);
                }
                true
            }
        }
    }

    pub fn carried(&self) -> Option<&ErrorRecord> {
        self.carried.as_ref()
    }

    pub fn take(&mut self) -> Option<ErrorRecord> {
        self.carried.take()
    }
}
