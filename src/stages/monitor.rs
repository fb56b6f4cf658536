// src/stages/monitor.rs

//! Monitor stage: start the auxiliary process, elevated or not.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::MonitorSpec;
use crate::engine::{ErrorRecord, LaunchOutcome, tagged};
use crate::exec::command_line::{join_fragments, quote};
use crate::exec::{
    ChildProcess, ExecutionRequest, LaunchStrategy, ProcessServices, ShellRequest, ShellVerb,
};
use crate::fs::resolve_relative;
use crate::stages::StageContext;
use crate::types::ShowMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorPlan {
    Direct(ExecutionRequest),
    Elevated { request: ShellRequest, wait: bool },
}

impl MonitorPlan {
    pub fn strategy(&self) -> LaunchStrategy {
        match self {
            MonitorPlan::Direct(_) => LaunchStrategy::DirectExec,
            MonitorPlan::Elevated { .. } => LaunchStrategy::ElevatedActivate,
        }
    }
}

pub fn plan(
    spec: &MonitorSpec,
    package_root: &Path,
    working_directory: &str,
    show_mode: ShowMode,
) -> MonitorPlan {
    let full_executable = resolve_relative(package_root, &spec.executable);
    let full_executable = quote(&full_executable.display().to_string());

    match LaunchStrategy::for_monitor(spec) {
        LaunchStrategy::ElevatedActivate => MonitorPlan::Elevated {
            request: ShellRequest {
                verb: ShellVerb::RunAs,
                file: full_executable,
                parameters: spec.arguments.clone(),
                directory: None,
                // Elevated activation always shows the monitor normally.
                show_mode: ShowMode::NORMAL,
                wait_for_input_idle: !spec.wait,
            },
            wait: spec.wait,
        },
        _ => MonitorPlan::Direct(ExecutionRequest {
            application_name: Some(spec.executable.clone().into()),
            command_line: join_fragments([full_executable.as_str(), spec.arguments.as_str()]),
            current_directory: Some(resolve_relative(package_root, working_directory)),
            show_mode,
            breakaway_from_container: false,
        }),
    }
}

/// Start the monitor.
///
/// - Not elevated: a direct launch that waits like any other; errors carry
///   the monitor executable.
/// - Elevated with `wait`: block until the monitor exits.
/// - Elevated without `wait`: give it a moment to settle, then move on while
///   it keeps running.
pub async fn launch_monitor<S: ProcessServices>(
    ctx: &StageContext<'_, S>,
    spec: &MonitorSpec,
    package_root: &Path,
    working_directory: &str,
) -> LaunchOutcome {
    let plan = plan(spec, package_root, working_directory, ctx.show_mode);
    info!(
        executable = %spec.executable,
        strategy = %plan.strategy(),
        wait = spec.wait,
        "creating the monitor"
    );

    match plan {
        MonitorPlan::Direct(request) => {
            tagged(ctx.launcher.start(&request).await, &spec.executable)
        }
        MonitorPlan::Elevated { request, wait } => {
            let child = ctx
                .launcher
                .services()
                .shell_execute(&request)
                .map_err(|err| {
                    warn!(error = %err, "elevated monitor activation failed");
                    ErrorRecord::new("Failed to start the monitor through the shell", err.code)
                        .with_executable(&spec.executable)
                })?;

            settle_elevated(ctx, child, wait).await;
            Ok(())
        }
    }
}

async fn settle_elevated<S: ProcessServices>(
    ctx: &StageContext<'_, S>,
    child: Option<S::Child>,
    wait: bool,
) {
    match (child, wait) {
        (Some(mut child), true) => {
            debug!("waiting for elevated monitor to exit");
            if let Err(err) = child.wait().await {
                warn!(error = %err, "waiting on elevated monitor failed");
            }
        }
        (Some(mut child), false) => {
            child.wait_for_input_idle(ctx.options.input_idle_timeout).await;
            tokio::time::sleep(ctx.options.elevation_grace).await;
        }
        (None, true) => {
            debug!("shell returned no handle for elevated monitor; nothing to wait on");
        }
        (None, false) => {
            tokio::time::sleep(ctx.options.elevation_grace).await;
        }
    }
}
