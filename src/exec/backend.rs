// src/exec/backend.rs

//! Pluggable OS process services.
//!
//! The launcher talks to a `ProcessServices` implementation instead of the OS
//! directly. Production code uses the platform backend
//! ([`NativeServices`](crate::exec::native::NativeServices) or
//! [`WindowsServices`](crate::exec::windows::WindowsServices)); tests provide
//! a fake that records every call and never spawns anything.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use crate::exec::request::{ExecutionRequest, ShellRequest};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An OS-level failure: numeric code plus a description for the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail} (os error {code})")]
pub struct OsError {
    pub code: i32,
    pub detail: String,
}

impl OsError {
    pub fn new(code: i32, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

impl From<std::io::Error> for OsError {
    fn from(err: std::io::Error) -> Self {
        // A zero code would read as success once it becomes an exit code.
        let code = err.raw_os_error().filter(|c| *c != 0).unwrap_or(1);
        OsError::new(code, err.to_string())
    }
}

/// A started child process owned by the stage that created it.
///
/// Dropping it releases the OS handle without waiting.
pub trait ChildProcess: Send {
    fn id(&self) -> Option<u32>;

    /// Wait, unbounded, for the child to exit. Resolves to the exit code when
    /// the OS reports one.
    fn wait(&mut self) -> BoxFuture<'_, Result<Option<i32>, OsError>>;

    /// Wait up to `timeout` for the child to become ready for input.
    fn wait_for_input_idle(&mut self, timeout: Duration) -> BoxFuture<'_, ()>;
}

/// Create-process, shell-execute and friends.
pub trait ProcessServices: Send + Sync {
    type Child: ChildProcess;

    /// Prepared breakaway launch attribute. Released when dropped.
    type Attribute: Send + Sync;

    /// Prepare the attribute that removes a child from the package container.
    fn breakaway_attribute(&self) -> Result<Self::Attribute, OsError>;

    /// Create a child process. Handles and environment are inherited.
    fn create_process(
        &self,
        request: &ExecutionRequest,
        attribute: Option<&Self::Attribute>,
    ) -> Result<Self::Child, OsError>;

    /// Activate a file through the shell. `Ok(None)` means the shell succeeded
    /// but did not hand back a process.
    fn shell_execute(&self, request: &ShellRequest) -> Result<Option<Self::Child>, OsError>;

    /// Per-thread setup the shell needs before activations.
    fn init_shell_apartment(&self) {}
}
