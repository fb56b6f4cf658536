// src/config/provider.rs

//! The config provider seam: what the pipeline asks of the configuration.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{
    AppEntry, ApplicationConfig, ConfigFile, LaunchEntry, MonitorSpec, ScriptSpec,
};

/// Source of the launch entry and its optional stages for the current
/// application.
pub trait ConfigProvider {
    /// The primary executable entry, or `None` when no entry matches the
    /// current application identifier.
    fn query_launch_entry(&self) -> Option<AppEntry>;

    fn query_pre_script(&self) -> Option<ScriptSpec>;

    fn query_post_script(&self) -> Option<ScriptSpec>;

    fn query_monitor(&self) -> Option<MonitorSpec>;

    /// Absolute directory that relative configured paths resolve against.
    fn query_package_root(&self) -> PathBuf;
}

/// Gather everything the pipeline needs from a provider.
///
/// Returns `None` when the provider has no matching launch entry.
pub fn assemble_launch_entry(provider: &dyn ConfigProvider) -> Option<LaunchEntry> {
    let entry = provider.query_launch_entry()?;
    Some(LaunchEntry {
        package_root: provider.query_package_root(),
        executable: entry.executable,
        arguments: entry.arguments,
        working_directory: entry.working_directory,
        pre_script: provider.query_pre_script(),
        post_script: provider.query_post_script(),
        monitor: provider.query_monitor(),
    })
}

/// [`ConfigProvider`] backed by a validated config file.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    package_root: PathBuf,
    application: Option<ApplicationConfig>,
}

impl FileConfigProvider {
    /// Select the current application from `config`.
    ///
    /// - With an explicit `app_id`, the entry with exactly that id.
    /// - Without one, the only entry if exactly one is configured.
    pub fn new(config: &ConfigFile, app_id: Option<&str>, package_root: PathBuf) -> Self {
        let application = match app_id {
            Some(id) => config.application(id).cloned(),
            None => match config.applications() {
                [only] => Some(only.clone()),
                _ => None,
            },
        };

        debug!(
            app_id = app_id.unwrap_or("<none>"),
            matched = application.is_some(),
            "selected application entry"
        );

        Self {
            package_root,
            application,
        }
    }

    /// Build a provider from an already selected application.
    pub fn from_parts(package_root: PathBuf, application: Option<ApplicationConfig>) -> Self {
        Self {
            package_root,
            application,
        }
    }
}

impl ConfigProvider for FileConfigProvider {
    fn query_launch_entry(&self) -> Option<AppEntry> {
        self.application.as_ref().map(ApplicationConfig::entry)
    }

    fn query_pre_script(&self) -> Option<ScriptSpec> {
        self.application.as_ref()?.start_script.clone()
    }

    fn query_post_script(&self) -> Option<ScriptSpec> {
        self.application.as_ref()?.end_script.clone()
    }

    fn query_monitor(&self) -> Option<MonitorSpec> {
        self.application.as_ref()?.monitor.clone()
    }

    fn query_package_root(&self) -> PathBuf {
        self.package_root.clone()
    }
}

/// Decide the package root.
///
/// Precedence: explicit override, then `packageRoot` from the file, then the
/// directory containing the config file (or the current directory when the
/// config path is a bare file name).
pub fn resolve_package_root(
    override_root: Option<&Path>,
    config: &ConfigFile,
    config_path: &Path,
) -> PathBuf {
    if let Some(root) = override_root {
        return root.to_path_buf();
    }
    if let Some(root) = config.package_root() {
        return root.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
