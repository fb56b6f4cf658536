// src/config/mod.rs

//! Launch configuration.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//! - Answer the pipeline's queries for the current application (`provider.rs`).

pub mod loader;
pub mod model;
pub mod provider;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_and_validate_with, load_from_path};
pub use model::{
    AppEntry, ApplicationConfig, ConfigFile, LaunchEntry, MonitorSpec, RawConfigFile, ScriptSpec,
};
pub use provider::{
    assemble_launch_entry, resolve_package_root, ConfigProvider, FileConfigProvider,
};
