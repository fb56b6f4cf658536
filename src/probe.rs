// src/probe.rs

//! Environment probe: is the script interpreter available on this host?

use std::ffi::OsString;
use std::path::PathBuf;

use tracing::debug;

use crate::engine::ErrorRecord;
use crate::types::{ERROR_NOT_FOUND, SCRIPT_INTERPRETER};

pub trait EnvironmentProbe: Send + Sync {
    /// `Ok(true)` when the interpreter is installed, `Ok(false)` when it is
    /// known to be missing, `Err` when presence cannot be determined.
    fn is_script_interpreter_installed(&self) -> Result<bool, ErrorRecord>;
}

/// Looks for an executable interpreter binary on a search path.
#[derive(Debug, Clone)]
pub struct PathProbe {
    search_path: Option<OsString>,
    program: String,
}

impl PathProbe {
    /// Probe the process `PATH` for the default interpreter.
    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
            program: SCRIPT_INTERPRETER.to_string(),
        }
    }

    pub fn with_search_path(search_path: Option<OsString>, program: impl Into<String>) -> Self {
        Self {
            search_path,
            program: program.into(),
        }
    }
}

impl EnvironmentProbe for PathProbe {
    fn is_script_interpreter_installed(&self) -> Result<bool, ErrorRecord> {
        let Some(search_path) = self.search_path.as_ref() else {
            return Err(ErrorRecord::new(
                "Cannot determine whether the script interpreter is installed: no search path is set.",
                ERROR_NOT_FOUND,
            ));
        };

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match which::which_in(&self.program, Some(search_path), cwd) {
            Ok(location) => {
                debug!(program = %self.program, location = %location.display(), "script interpreter found");
                Ok(true)
            }
            Err(err) => {
                debug!(program = %self.program, error = %err, "script interpreter not found");
                Ok(false)
            }
        }
    }
}

/// Reads the interpreter's install marker from the registry.
#[cfg(windows)]
#[derive(Debug, Clone, Default)]
pub struct RegistryProbe;

#[cfg(windows)]
impl RegistryProbe {
    pub const KEY_PATH: &'static str = r"SOFTWARE\Microsoft\PowerShell\1";
    pub const VALUE_NAME: &'static str = "Install";
}

#[cfg(windows)]
impl EnvironmentProbe for RegistryProbe {
    fn is_script_interpreter_installed(&self) -> Result<bool, ErrorRecord> {
        use windows::Win32::System::Registry::{
            HKEY, HKEY_LOCAL_MACHINE, KEY_READ, REG_VALUE_TYPE, RegCloseKey, RegOpenKeyExW,
            RegQueryValueExW,
        };
        use windows::core::PCWSTR;

        use crate::exec::windows::to_wide;

        struct RegKeyGuard(HKEY);
        impl Drop for RegKeyGuard {
            fn drop(&mut self) {
                unsafe {
                    let _ = RegCloseKey(self.0);
                }
            }
        }

        let path = to_wide(Self::KEY_PATH);
        let mut key = HKEY::default();
        let status =
            unsafe { RegOpenKeyExW(HKEY_LOCAL_MACHINE, PCWSTR(path.as_ptr()), Some(0), KEY_READ, &mut key) };
        if status.is_err() {
            return Err(ErrorRecord::new(
                "Error with getting the key to see if PowerShell is installed.",
                status.0 as i32,
            ));
        }
        let _guard = RegKeyGuard(key);

        let name = to_wide(Self::VALUE_NAME);
        let mut value: u32 = 0;
        let mut size = std::mem::size_of::<u32>() as u32;
        let mut kind = REG_VALUE_TYPE::default();
        let status = unsafe {
            RegQueryValueExW(
                key,
                PCWSTR(name.as_ptr()),
                None,
                Some(&mut kind as *mut REG_VALUE_TYPE),
                Some(&mut value as *mut u32 as *mut u8),
                Some(&mut size as *mut u32),
            )
        };

        if status.is_err() {
            debug!(code = status.0, "install marker not present");
            return Ok(false);
        }

        Ok(value == 1)
    }
}

/// The probe appropriate for the current platform.
pub fn default_probe() -> Box<dyn EnvironmentProbe> {
    #[cfg(windows)]
    {
        Box::new(RegistryProbe)
    }
    #[cfg(not(windows))]
    {
        Box::new(PathProbe::from_env())
    }
}
