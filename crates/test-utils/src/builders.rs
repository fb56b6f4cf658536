#![allow(dead_code)]

use std::path::PathBuf;

use pkglaunch::config::{
    ApplicationConfig, ConfigFile, FileConfigProvider, MonitorSpec, RawConfigFile, ScriptSpec,
};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_package_root(mut self, root: &str) -> Self {
        self.config.package_root = Some(PathBuf::from(root));
        self
    }

    pub fn with_application(mut self, app: ApplicationConfig) -> Self {
        self.config.applications.push(app);
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one `[[applications]]` entry.
pub struct ApplicationBuilder {
    app: ApplicationConfig,
}

impl ApplicationBuilder {
    pub fn new(id: &str, executable: &str) -> Self {
        Self {
            app: ApplicationConfig {
                id: id.to_string(),
                executable: executable.to_string(),
                arguments: String::new(),
                working_directory: String::new(),
                start_script: None,
                end_script: None,
                monitor: None,
            },
        }
    }

    pub fn arguments(mut self, arguments: &str) -> Self {
        self.app.arguments = arguments.to_string();
        self
    }

    pub fn working_directory(mut self, dir: &str) -> Self {
        self.app.working_directory = dir.to_string();
        self
    }

    pub fn pre_script(mut self, script: ScriptSpec) -> Self {
        self.app.start_script = Some(script);
        self
    }

    pub fn post_script(mut self, script: ScriptSpec) -> Self {
        self.app.end_script = Some(script);
        self
    }

    pub fn monitor(mut self, monitor: MonitorSpec) -> Self {
        self.app.monitor = Some(monitor);
        self
    }

    pub fn build(self) -> ApplicationConfig {
        self.app
    }

    /// Shortcut: a provider that has already selected this application.
    pub fn provider(self, package_root: &str) -> FileConfigProvider {
        FileConfigProvider::from_parts(PathBuf::from(package_root), Some(self.app))
    }
}

pub fn script(path: &str) -> ScriptSpec {
    ScriptSpec::new(path)
}

pub fn script_with_args(path: &str, arguments: &str) -> ScriptSpec {
    ScriptSpec {
        script_arguments: Some(arguments.to_string()),
        ..ScriptSpec::new(path)
    }
}

/// A script that stays inside the package container.
pub fn contained_script(path: &str) -> ScriptSpec {
    ScriptSpec {
        run_in_virtual_environment: Some(true),
        ..ScriptSpec::new(path)
    }
}

pub fn monitor(executable: &str, arguments: &str) -> MonitorSpec {
    MonitorSpec {
        executable: executable.to_string(),
        arguments: arguments.to_string(),
        as_admin: false,
        wait: false,
    }
}

pub fn elevated_monitor(executable: &str, arguments: &str, wait: bool) -> MonitorSpec {
    MonitorSpec {
        as_admin: true,
        wait,
        ..monitor(executable, arguments)
    }
}
