// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`request`] describes one create-process or shell-activation call.
//! - [`command_line`] holds the small string helpers for command lines.
//! - [`strategy`] picks direct-exec, shell-activate or elevated activation.
//! - [`backend`] provides the `ProcessServices` trait the rest of the crate
//!   launches through, so tests can replace the OS with a fake.
//! - [`launcher`] issues one direct launch, waits, and normalises errors.
//! - [`native`] / [`windows`] are the platform backends.

pub mod backend;
pub mod command_line;
pub mod launcher;
pub mod request;
pub mod strategy;

#[cfg(not(windows))]
pub mod native;

#[cfg(windows)]
pub mod windows;

pub use backend::{BoxFuture, ChildProcess, OsError, ProcessServices};
pub use launcher::ProcessLauncher;
pub use request::{ExecutionRequest, ShellRequest, ShellVerb};
pub use strategy::LaunchStrategy;

/// Process services for the platform the launcher was built for.
#[cfg(not(windows))]
pub type PlatformServices = native::NativeServices;

#[cfg(windows)]
pub type PlatformServices = windows::WindowsServices;
