// src/exec/request.rs

//! Inputs to the OS process services.

use std::fmt;
use std::path::PathBuf;

use crate::exec::command_line::program_name_from_command_line;
use crate::types::ShowMode;

/// One direct create-process call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Executable to run. `None` means the OS takes the program from the first
    /// token of `command_line`.
    pub application_name: Option<PathBuf>,

    /// Full command line, including the program token.
    pub command_line: String,

    /// Working directory for the child. `None` inherits the launcher's.
    pub current_directory: Option<PathBuf>,

    pub show_mode: ShowMode,

    /// Start the child outside the package container's process tree.
    pub breakaway_from_container: bool,
}

impl ExecutionRequest {
    /// The name used in "Failed to create a process for ..." messages.
    pub fn program_name_for_error(&self) -> String {
        match &self.application_name {
            Some(name) => name.display().to_string(),
            None => program_name_from_command_line(&self.command_line).to_string(),
        }
    }
}

/// Shell verb for an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellVerb {
    /// The file type's default action.
    Open,
    /// Request administrative elevation.
    RunAs,
}

impl ShellVerb {
    /// The verb string passed to the shell, if any.
    pub fn as_verb(self) -> Option<&'static str> {
        match self {
            ShellVerb::Open => None,
            ShellVerb::RunAs => Some("runas"),
        }
    }
}

impl fmt::Display for ShellVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_verb().unwrap_or("open"))
    }
}

/// One shell-activation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRequest {
    pub verb: ShellVerb,

    /// File to activate. May be wrapped in double quotes.
    pub file: String,

    pub parameters: String,

    pub directory: Option<PathBuf>,

    pub show_mode: ShowMode,

    /// Ask the shell to return only once the child is waiting for input.
    pub wait_for_input_idle: bool,
}
