// src/stages/primary.rs

//! Primary-application stage.

use tracing::{info, warn};

use crate::config::LaunchEntry;
use crate::engine::{ErrorRecord, LaunchOutcome, tagged};
use crate::exec::command_line::{join_fragments, quote};
use crate::exec::{ExecutionRequest, LaunchStrategy, ProcessServices, ShellRequest, ShellVerb};
use crate::stages::StageContext;
use crate::types::ShowMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryPlan {
    Direct(ExecutionRequest),
    Shell(ShellRequest),
}

impl PrimaryPlan {
    pub fn strategy(&self) -> LaunchStrategy {
        match self {
            PrimaryPlan::Direct(_) => LaunchStrategy::DirectExec,
            PrimaryPlan::Shell(_) => LaunchStrategy::ShellActivate,
        }
    }
}

/// `"<file name>" <arguments> <launcher args>`.
///
/// The leading file name is always quoted since it may contain spaces.
pub fn primary_command_line(entry: &LaunchEntry, launcher_args: &str) -> String {
    let exe_path = entry.executable_path();
    let file_name = exe_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.executable.clone());

    join_fragments([
        quote(&file_name).as_str(),
        entry.arguments.as_str(),
        launcher_args,
    ])
}

pub fn plan(entry: &LaunchEntry, launcher_args: &str, show_mode: ShowMode) -> PrimaryPlan {
    match LaunchStrategy::for_primary(&entry.executable) {
        LaunchStrategy::DirectExec => PrimaryPlan::Direct(ExecutionRequest {
            application_name: Some(entry.executable_path()),
            command_line: primary_command_line(entry, launcher_args),
            current_directory: Some(entry.current_directory()),
            show_mode,
            breakaway_from_container: false,
        }),
        // Launcher args are not forwarded: activated files go through their
        // file-type association.
        _ => PrimaryPlan::Shell(ShellRequest {
            verb: ShellVerb::Open,
            file: entry.executable_path().display().to_string(),
            parameters: entry.arguments.clone(),
            directory: (!entry.working_directory.is_empty()).then(|| entry.current_directory()),
            show_mode,
            wait_for_input_idle: false,
        }),
    }
}

/// Launch the primary application.
///
/// Direct launches wait for the application to exit; shell activations
/// return as soon as the shell accepts the request.
pub async fn launch_primary<S: ProcessServices>(
    ctx: &StageContext<'_, S>,
    entry: &LaunchEntry,
    launcher_args: &str,
) -> LaunchOutcome {
    let plan = plan(entry, launcher_args, ctx.show_mode);
    info!(
        executable = %entry.executable,
        strategy = %plan.strategy(),
        "launching primary application"
    );

    match plan {
        PrimaryPlan::Direct(request) => {
            tagged(ctx.launcher.start(&request).await, &entry.executable)
        }
        PrimaryPlan::Shell(request) => {
            info!(file = %request.file, parameters = %request.parameters, "using shell launch");
            match ctx.launcher.services().shell_execute(&request) {
                // The handle is released without waiting.
                Ok(_child) => Ok(()),
                Err(err) => {
                    warn!(error = %err, "shell activation failed");
                    Err(ErrorRecord::new(
                        format!("Failed to create a shell process for {}", request.file),
                        err.code,
                    ))
                }
            }
        }
    }
}
