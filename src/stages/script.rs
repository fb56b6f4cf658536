// src/stages/script.rs

//! Script stage: run a configured script through the interpreter.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ScriptSpec;
use crate::engine::{ErrorRecord, LaunchOutcome};
use crate::exec::command_line::join_fragments;
use crate::exec::{ExecutionRequest, ProcessServices};
use crate::fs::resolve_relative;
use crate::stages::StageContext;
use crate::types::{ERROR_FILE_NOT_FOUND, SCRIPT_INTERPRETER, ShowMode};

/// A fully resolved script launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPlan {
    /// Where the script must exist for the launch to be attempted.
    pub script_path: PathBuf,
    pub request: ExecutionRequest,
}

/// `<interpreter> -file <scriptPath> [<scriptArguments>]`.
pub fn script_command_line(spec: &ScriptSpec) -> String {
    join_fragments([
        SCRIPT_INTERPRETER,
        "-file",
        spec.script_path.as_str(),
        spec.script_arguments.as_deref().unwrap_or(""),
    ])
}

pub fn plan(
    spec: &ScriptSpec,
    package_root: &Path,
    working_directory: &str,
    show_mode: ShowMode,
) -> ScriptPlan {
    let current_directory = resolve_relative(package_root, working_directory);
    let script_path = current_directory.join(&spec.script_path);

    ScriptPlan {
        script_path,
        request: ExecutionRequest {
            // The OS finds the interpreter from the command line.
            application_name: None,
            command_line: script_command_line(spec),
            current_directory: Some(current_directory),
            show_mode,
            breakaway_from_container: !spec.runs_in_virtual_environment(),
        },
    }
}

/// Run `spec` and wait for the interpreter to exit.
///
/// A missing script file fails the stage without launching anything.
pub async fn run_script<S: ProcessServices>(
    ctx: &StageContext<'_, S>,
    spec: &ScriptSpec,
    package_root: &Path,
    working_directory: &str,
) -> LaunchOutcome {
    let plan = plan(spec, package_root, working_directory, ctx.show_mode);

    if !ctx.fs.exists(&plan.script_path) {
        warn!(script = %plan.script_path.display(), "script file not found");
        return Err(ErrorRecord::new(
            format!("The script file {} can't be found", plan.script_path.display()),
            ERROR_FILE_NOT_FOUND,
        ));
    }

    info!(
        script = %plan.script_path.display(),
        in_container = spec.runs_in_virtual_environment(),
        "running script"
    );

    ctx.launcher.start(&plan.request).await
}
