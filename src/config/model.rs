// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::resolve_relative;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// packageRoot = "/pkg"
///
/// [[applications]]
/// id = "App"
/// executable = "app.exe"
/// arguments = "--mode=fast"
/// workingDirectory = ""
///
/// [applications.startScript]
/// scriptPath = "go.ps1"
///
/// [applications.monitor]
/// executable = "m.exe"
/// asAdmin = true
/// ```
///
/// Keys are camelCase because they are the contract with whoever authors the
/// package configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfigFile {
    /// Absolute package root. Defaults to the config file's directory.
    #[serde(default)]
    pub package_root: Option<PathBuf>,

    /// All `[[applications]]` entries.
    #[serde(default)]
    pub applications: Vec<ApplicationConfig>,
}

/// A validated configuration file.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holders can rely on
/// the invariants checked in `validate.rs`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    package_root: Option<PathBuf>,
    applications: Vec<ApplicationConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        package_root: Option<PathBuf>,
        applications: Vec<ApplicationConfig>,
    ) -> Self {
        Self {
            package_root,
            applications,
        }
    }

    pub fn package_root(&self) -> Option<&Path> {
        self.package_root.as_deref()
    }

    pub fn applications(&self) -> &[ApplicationConfig] {
        &self.applications
    }

    pub fn application(&self, id: &str) -> Option<&ApplicationConfig> {
        self.applications.iter().find(|app| app.id == id)
    }
}

/// One `[[applications]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConfig {
    /// Application identifier the launcher is started for.
    pub id: String,

    /// Executable path, relative to the package root.
    pub executable: String,

    /// Arguments appended after the executable.
    #[serde(default)]
    pub arguments: String,

    /// Working directory, relative to the package root. May be empty.
    #[serde(default)]
    pub working_directory: String,

    /// Script run before anything else.
    #[serde(default, alias = "preScript")]
    pub start_script: Option<ScriptSpec>,

    /// Script run after the primary application exits.
    #[serde(default, alias = "postScript")]
    pub end_script: Option<ScriptSpec>,

    /// Auxiliary process started before the primary application.
    #[serde(default)]
    pub monitor: Option<MonitorSpec>,
}

impl ApplicationConfig {
    pub fn entry(&self) -> AppEntry {
        AppEntry {
            executable: self.executable.clone(),
            arguments: self.arguments.clone(),
            working_directory: self.working_directory.clone(),
        }
    }
}

/// The part of an application entry that describes the primary executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub executable: String,
    pub arguments: String,
    pub working_directory: String,
}

/// A script run through the script interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSpec {
    /// Script path, relative to the working directory.
    pub script_path: String,

    #[serde(default)]
    pub script_arguments: Option<String>,

    /// When true the script stays inside the package container; otherwise it
    /// breaks away and runs with host identity.
    #[serde(default)]
    pub run_in_virtual_environment: Option<bool>,
}

impl ScriptSpec {
    pub fn new(script_path: impl Into<String>) -> Self {
        Self {
            script_path: script_path.into(),
            script_arguments: None,
            run_in_virtual_environment: None,
        }
    }

    pub fn runs_in_virtual_environment(&self) -> bool {
        self.run_in_virtual_environment.unwrap_or(false)
    }
}

/// An auxiliary process associated with the primary application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSpec {
    /// Executable path, relative to the package root.
    pub executable: String,

    #[serde(default)]
    pub arguments: String,

    /// Request elevation through the shell.
    #[serde(default, alias = "asadmin")]
    pub as_admin: bool,

    /// Block until the monitor exits before starting the primary application.
    #[serde(default)]
    pub wait: bool,
}

/// Everything the pipeline needs for one launcher invocation.
///
/// Assembled from a [`ConfigProvider`](crate::config::ConfigProvider) and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchEntry {
    pub package_root: PathBuf,
    pub executable: String,
    pub arguments: String,
    pub working_directory: String,
    pub pre_script: Option<ScriptSpec>,
    pub post_script: Option<ScriptSpec>,
    pub monitor: Option<MonitorSpec>,
}

impl LaunchEntry {
    /// `packageRoot / workingDirectory`.
    pub fn current_directory(&self) -> PathBuf {
        resolve_relative(&self.package_root, &self.working_directory)
    }

    /// `packageRoot / executable`.
    pub fn executable_path(&self) -> PathBuf {
        resolve_relative(&self.package_root, &self.executable)
    }
}
