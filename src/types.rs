// src/types.rs

//! Small value types and well-known codes shared across the launcher.

use std::fmt;
use std::str::FromStr;

/// Win32 `ERROR_FILE_NOT_FOUND`.
pub const ERROR_FILE_NOT_FOUND: i32 = 2;

/// Win32 `ERROR_NOT_FOUND`, used when no launch entry matches the current
/// application.
pub const ERROR_NOT_FOUND: i32 = 1168;

/// Win32 `ERROR_BAD_CONFIGURATION`, used for unreadable or invalid config files.
pub const ERROR_BAD_CONFIGURATION: i32 = 1610;

/// `E_APPLICATION_NOT_REGISTERED` (0x80040154) as a signed exit code.
///
/// Returned when a script is configured but the interpreter is missing.
pub const E_APPLICATION_NOT_REGISTERED: i32 = 0x8004_0154_u32 as i32;

/// Program token used to invoke the script interpreter. The OS resolves it
/// from the search path.
#[cfg(windows)]
pub const SCRIPT_INTERPRETER: &str = "Powershell.exe";

#[cfg(not(windows))]
pub const SCRIPT_INTERPRETER: &str = "pwsh";

/// Window show mode handed to the launcher and forwarded to children.
///
/// The value is opaque: it is never interpreted, only propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShowMode(pub i32);

impl ShowMode {
    /// `SW_SHOWNORMAL`.
    pub const NORMAL: ShowMode = ShowMode(1);

    pub fn raw(self) -> i32 {
        self.0
    }
}

impl Default for ShowMode {
    fn default() -> Self {
        ShowMode::NORMAL
    }
}

impl fmt::Display for ShowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(ShowMode)
            .map_err(|e| format!("invalid show mode '{s}': {e}"))
    }
}

/// One step of the launch pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    PreScript,
    Monitor,
    Primary,
    PostScript,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PreScript => "pre-script",
            Stage::Monitor => "monitor",
            Stage::Primary => "primary",
            Stage::PostScript => "post-script",
        };
        f.write_str(name)
    }
}
