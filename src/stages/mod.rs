// src/stages/mod.rs

//! Pipeline stages.
//!
//! Each stage turns part of the [`LaunchEntry`](crate::config::LaunchEntry)
//! into a concrete launch request (`plan`) and then issues it (`run`). The
//! planning half is pure so the dry-run output and the tests can inspect
//! exactly what would be launched.

use std::time::Duration;

use crate::exec::{ProcessLauncher, ProcessServices};
use crate::fs::FileSystem;
use crate::types::ShowMode;

pub mod monitor;
pub mod primary;
pub mod script;

/// How long to wait for an elevated, non-waited monitor to become idle.
pub const INPUT_IDLE_TIMEOUT: Duration = Duration::from_secs(1);

/// Pause after an elevated, non-waited monitor activation. Elevation starts
/// the target, relaunches it, and the first instance exits almost at once.
pub const ELEVATION_GRACE: Duration = Duration::from_secs(5);

/// Timing knobs for the stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    pub input_idle_timeout: Duration,
    pub elevation_grace: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            input_idle_timeout: INPUT_IDLE_TIMEOUT,
            elevation_grace: ELEVATION_GRACE,
        }
    }
}

/// What every stage needs to issue launches.
pub struct StageContext<'a, S: ProcessServices> {
    pub launcher: &'a ProcessLauncher<S>,
    pub fs: &'a dyn FileSystem,
    pub show_mode: ShowMode,
    pub options: LaunchOptions,
}
