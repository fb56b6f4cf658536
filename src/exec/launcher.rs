// src/exec/launcher.rs

//! Issue one child launch and wait for it.

use tracing::{debug, info, warn};

use crate::engine::{ErrorRecord, LaunchOutcome};
use crate::exec::backend::{ChildProcess, ProcessServices};
use crate::exec::request::ExecutionRequest;

/// Synchronous (from the pipeline's point of view) process launcher.
///
/// Every successful `start` waits for the child to exit before returning.
#[derive(Debug)]
pub struct ProcessLauncher<S: ProcessServices> {
    services: S,
}

impl<S: ProcessServices> ProcessLauncher<S> {
    pub fn new(services: S) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    /// Create the child described by `request`, then wait for it to exit.
    ///
    /// A breakaway attribute that cannot be prepared is logged and the launch
    /// goes ahead without it; whether the launch itself succeeds decides the
    /// outcome.
    pub async fn start(&self, request: &ExecutionRequest) -> LaunchOutcome {
        let attribute = if request.breakaway_from_container {
            match self.services.breakaway_attribute() {
                Ok(attribute) => Some(attribute),
                Err(err) => {
                    warn!(
                        code = err.code,
                        error = %err,
                        "could not prepare breakaway attribute; launching inside the container"
                    );
                    None
                }
            }
        } else {
            None
        };

        info!(
            application = ?request.application_name,
            command_line = %request.command_line,
            current_directory = ?request.current_directory,
            show_mode = %request.show_mode,
            breakaway = attribute.is_some(),
            "creating process"
        );

        let created = self.services.create_process(request, attribute.as_ref());
        drop(attribute);

        let mut child = match created {
            Ok(child) => child,
            Err(err) => {
                let name = request.program_name_for_error();
                warn!(program = %name, error = %err, "create-process failed");
                return Err(ErrorRecord::new(
                    format!("Failed to create a process for {name}"),
                    err.code,
                ));
            }
        };

        debug!(pid = ?child.id(), "waiting for child to exit");

        match child.wait().await {
            Ok(exit_code) => {
                info!(pid = ?child.id(), exit_code = ?exit_code, "child exited");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "waiting on child failed");
                Err(ErrorRecord::new("Running process failed.", err.code))
            }
        }
    }
}
