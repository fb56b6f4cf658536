// src/exec/native.rs

//! Portable process services built on `tokio::process`.
//!
//! There is no package container outside Windows, so breakaway is modelled as
//! starting the child in its own process group. Shell activation goes through
//! the desktop opener and elevation through `pkexec`. Show modes have no
//! meaning here and are only logged.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, trace};

use crate::exec::backend::{BoxFuture, ChildProcess, OsError, ProcessServices};
use crate::exec::command_line::{split_command_line, unquote};
use crate::exec::request::{ExecutionRequest, ShellRequest, ShellVerb};
use crate::types::ERROR_FILE_NOT_FOUND;

#[cfg(target_os = "macos")]
const SHELL_OPENER: &str = "open";

#[cfg(not(target_os = "macos"))]
const SHELL_OPENER: &str = "xdg-open";

const ELEVATOR: &str = "pkexec";

/// Marker for "start in a new process group".
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGroupBreakaway;

#[derive(Debug, Clone, Default)]
pub struct NativeServices;

impl NativeServices {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug)]
pub struct NativeChild {
    child: Child,
}

impl ChildProcess for NativeChild {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn wait(&mut self) -> BoxFuture<'_, Result<Option<i32>, OsError>> {
        Box::pin(async move {
            let status = self.child.wait().await?;
            Ok(status.code())
        })
    }

    fn wait_for_input_idle(&mut self, _timeout: Duration) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }
}

/// An explicit application name is never searched for on `PATH`. A relative
/// name is the same file as an absolute program token on the command line
/// when one is given; otherwise it is taken relative to the launcher's own
/// directory, not the child's.
fn resolve_application_name(
    name: &Path,
    program_token: Option<&str>,
) -> Result<OsString, OsError> {
    if name.is_absolute() {
        return Ok(name.as_os_str().to_owned());
    }

    if let Some(token) = program_token.map(Path::new) {
        if token.is_absolute() && token.ends_with(name) {
            return Ok(token.as_os_str().to_owned());
        }
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd.join(name).into_os_string())
}

impl ProcessServices for NativeServices {
    type Child = NativeChild;
    type Attribute = ProcessGroupBreakaway;

    fn breakaway_attribute(&self) -> Result<Self::Attribute, OsError> {
        Ok(ProcessGroupBreakaway)
    }

    fn create_process(
        &self,
        request: &ExecutionRequest,
        attribute: Option<&Self::Attribute>,
    ) -> Result<Self::Child, OsError> {
        let argv = split_command_line(&request.command_line);

        let program: OsString = match (&request.application_name, argv.first()) {
            (Some(name), first) => resolve_application_name(name, first.map(String::as_str))?,
            (None, Some(first)) => OsString::from(first),
            (None, None) => {
                return Err(OsError::new(ERROR_FILE_NOT_FOUND, "empty command line"));
            }
        };

        let mut cmd = Command::new(&program);
        cmd.args(argv.iter().skip(1))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(dir) = &request.current_directory {
            cmd.current_dir(dir);
        }

        #[cfg(unix)]
        if attribute.is_some() {
            cmd.process_group(0);
        }
        #[cfg(not(unix))]
        let _ = attribute;

        trace!(show_mode = %request.show_mode, "show mode has no effect on this platform");

        let child = cmd.spawn()?;
        Ok(NativeChild { child })
    }

    fn shell_execute(&self, request: &ShellRequest) -> Result<Option<Self::Child>, OsError> {
        let file = unquote(&request.file);

        let mut cmd = match request.verb {
            ShellVerb::Open => {
                let mut cmd = Command::new(SHELL_OPENER);
                cmd.arg(file);
                if !request.parameters.trim().is_empty() {
                    debug!(
                        parameters = %request.parameters,
                        "desktop opener does not take parameters; dropping them"
                    );
                }
                cmd
            }
            ShellVerb::RunAs => {
                let mut cmd = Command::new(ELEVATOR);
                cmd.arg(file).args(split_command_line(&request.parameters));
                cmd
            }
        };

        if let Some(dir) = &request.directory {
            cmd.current_dir(dir);
        }

        // Callers that do not wait drop the child without reaping it. Tokio
        // queues dropped children and reaps them in the background, best
        // effort; whatever is left is inherited by init when the launcher exits.
        let child = cmd.spawn()?;
        Ok(Some(NativeChild { child }))
    }
}
