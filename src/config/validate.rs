// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PkgLaunchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PkgLaunchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.package_root, raw.applications))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_applications(cfg)?;
    validate_package_root(cfg)?;
    validate_application_ids(cfg)?;
    validate_paths(cfg)?;
    Ok(())
}

fn ensure_has_applications(cfg: &RawConfigFile) -> Result<()> {
    if cfg.applications.is_empty() {
        return Err(PkgLaunchError::ConfigError(
            "config must contain at least one [[applications]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_package_root(cfg: &RawConfigFile) -> Result<()> {
    if let Some(root) = &cfg.package_root {
        if !root.is_absolute() {
            return Err(PkgLaunchError::ConfigError(format!(
                "packageRoot must be an absolute path (got {:?})",
                root
            )));
        }
    }
    Ok(())
}

fn validate_application_ids(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for app in cfg.applications.iter() {
        if app.id.trim().is_empty() {
            return Err(PkgLaunchError::ConfigError(
                "application id must not be empty".to_string(),
            ));
        }
        if !seen.insert(app.id.as_str()) {
            return Err(PkgLaunchError::ConfigError(format!(
                "duplicate application id '{}'",
                app.id
            )));
        }
    }
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    for app in cfg.applications.iter() {
        if app.executable.trim().is_empty() {
            return Err(PkgLaunchError::ConfigError(format!(
                "application '{}' has an empty `executable`",
                app.id
            )));
        }

        for (key, script) in [
            ("startScript", app.start_script.as_ref()),
            ("endScript", app.end_script.as_ref()),
        ] {
            if let Some(script) = script {
                if script.script_path.trim().is_empty() {
                    return Err(PkgLaunchError::ConfigError(format!(
                        "application '{}' has an empty `{}.scriptPath`",
                        app.id, key
                    )));
                }
            }
        }

        if let Some(monitor) = &app.monitor {
            if monitor.executable.trim().is_empty() {
                return Err(PkgLaunchError::ConfigError(format!(
                    "application '{}' has an empty `monitor.executable`",
                    app.id
                )));
            }
        }
    }
    Ok(())
}
