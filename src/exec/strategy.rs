// src/exec/strategy.rs

//! Launch-strategy selection.

use std::fmt;

use crate::config::MonitorSpec;

/// How a child gets started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// Create the process directly from an executable path and wait for it.
    DirectExec,

    /// Hand the file to the shell so its file-type association picks the
    /// handler. Nothing waits on the result.
    ShellActivate,

    /// Shell activation with the elevation verb.
    ElevatedActivate,
}

impl LaunchStrategy {
    /// Executables (`.exe`, any case) are created directly; anything else
    /// goes through the shell.
    pub fn for_primary(executable: &str) -> Self {
        if ends_with_ignore_ascii_case(executable, ".exe") {
            LaunchStrategy::DirectExec
        } else {
            LaunchStrategy::ShellActivate
        }
    }

    pub fn for_monitor(monitor: &MonitorSpec) -> Self {
        if monitor.as_admin {
            LaunchStrategy::ElevatedActivate
        } else {
            LaunchStrategy::DirectExec
        }
    }
}

impl fmt::Display for LaunchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchStrategy::DirectExec => "direct-exec",
            LaunchStrategy::ShellActivate => "shell-activate",
            LaunchStrategy::ElevatedActivate => "elevated-activate",
        };
        f.write_str(name)
    }
}

/// Case-insensitive (ASCII) suffix test.
pub fn ends_with_ignore_ascii_case(s: &str, suffix: &str) -> bool {
    if s.len() < suffix.len() {
        return false;
    }
    let start = s.len() - suffix.len();
    s.is_char_boundary(start) && s[start..].eq_ignore_ascii_case(suffix)
}
