// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! These cover everything that can go wrong before the launch pipeline runs.
//! Failures of individual pipeline stages are values of
//! [`crate::engine::ErrorRecord`] instead.

use thiserror::Error;

use crate::types::ERROR_BAD_CONFIGURATION;

#[derive(Error, Debug)]
pub enum PkgLaunchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PkgLaunchError {
    /// Process exit code to use when this error aborts the launcher.
    pub fn exit_code(&self) -> i32 {
        match self {
            PkgLaunchError::ConfigError(_) | PkgLaunchError::TomlError(_) => {
                ERROR_BAD_CONFIGURATION
            }
            PkgLaunchError::IoError(e) => e.raw_os_error().unwrap_or(1),
            PkgLaunchError::Other(_) => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PkgLaunchError>;
