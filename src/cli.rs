// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::exec::command_line::join_arguments;
use crate::types::ShowMode;

/// Command-line arguments for `pkglaunch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pkglaunch",
    version,
    about = "Start a packaged application with its scripts and monitor.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the launch configuration (TOML).
    ///
    /// Default: `config.toml` next to the launcher executable.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Identifier of the application entry to launch.
    ///
    /// May be omitted when the configuration holds a single application.
    #[arg(long, value_name = "ID")]
    pub app_id: Option<String>,

    /// Override the package root that relative paths resolve against.
    #[arg(long, value_name = "DIR")]
    pub package_root: Option<PathBuf>,

    /// Window show mode forwarded to every child process.
    #[arg(long, value_name = "N", default_value_t = 1, allow_negative_numbers = true)]
    pub show_mode: i32,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PKGLAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load the configuration and print the planned stages without launching.
    #[arg(long)]
    pub dry_run: bool,

    /// Arguments appended to the primary application's command line.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub passthrough: Vec<String>,
}

impl CliArgs {
    /// The pass-through arguments as one command-line string, each argument
    /// quoted so it survives being split again.
    pub fn passthrough_string(&self) -> String {
        join_arguments(&self.passthrough)
    }

    pub fn show_mode(&self) -> ShowMode {
        ShowMode(self.show_mode)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
