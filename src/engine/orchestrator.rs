// src/engine/orchestrator.rs

use std::fmt;

use tracing::{debug, error, info};

use crate::config::{ConfigProvider, LaunchEntry, ScriptSpec, assemble_launch_entry};
use crate::engine::outcome::{ErrorRecord, ErrorSlot, LaunchOutcome, tagged};
use crate::engine::report::HostReporter;
use crate::exec::{ProcessLauncher, ProcessServices};
use crate::fs::FileSystem;
use crate::probe::EnvironmentProbe;
use crate::stages::{LaunchOptions, StageContext, monitor, primary, script};
use crate::types::{
    E_APPLICATION_NOT_REGISTERED, ERROR_NOT_FOUND, SCRIPT_INTERPRETER, ShowMode, Stage,
};

/// What the launcher itself was started with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Opaque pass-through arguments for the primary application.
    pub arguments: String,
    pub show_mode: ShowMode,
}

/// Drives pre-script → monitor → primary → post-script for one invocation.
///
/// At most one error reaches the host reporter, right before `run` returns a
/// non-zero exit code. A failing monitor skips the primary; the post-script
/// runs whatever happened before it, but its own failure is reported only
/// when nothing earlier failed.
pub struct Orchestrator<'a, S: ProcessServices> {
    config: &'a dyn ConfigProvider,
    probe: &'a dyn EnvironmentProbe,
    reporter: &'a dyn HostReporter,
    fs: &'a dyn FileSystem,
    launcher: ProcessLauncher<S>,
    options: LaunchOptions,
}

impl<S: ProcessServices> fmt::Debug for Orchestrator<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a, S: ProcessServices> Orchestrator<'a, S> {
    pub fn new(
        launcher: ProcessLauncher<S>,
        config: &'a dyn ConfigProvider,
        probe: &'a dyn EnvironmentProbe,
        reporter: &'a dyn HostReporter,
        fs: &'a dyn FileSystem,
    ) -> Self {
        Self {
            config,
            probe,
            reporter,
            fs,
            launcher,
            options: LaunchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LaunchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn launcher(&self) -> &ProcessLauncher<S> {
        &self.launcher
    }

    /// Run the whole pipeline and return the process exit code.
    pub async fn run(&self, invocation: &Invocation) -> i32 {
        info!(arguments = %invocation.arguments, show_mode = %invocation.show_mode, "launch pipeline started");

        let Some(entry) = assemble_launch_entry(self.config) else {
            return self.fail(ErrorRecord::new(
                "No matching launch entry for the current application",
                ERROR_NOT_FOUND,
            ));
        };
        debug!(?entry, "resolved launch entry");

        let interpreter_installed = match self.probe.is_script_interpreter_installed() {
            Ok(installed) => installed,
            Err(err) => return self.fail(err),
        };

        let ctx = StageContext {
            launcher: &self.launcher,
            fs: self.fs,
            show_mode: invocation.show_mode,
            options: self.options,
        };

        if let Some(pre) = &entry.pre_script {
            if let Err(err) = self
                .run_script_stage(&ctx, Stage::PreScript, pre, &entry, interpreter_installed)
                .await
            {
                return self.fail(err);
            }
        }

        let mut carried = ErrorSlot::new();

        if let Some(spec) = &entry.monitor {
            self.launcher.services().init_shell_apartment();
            let outcome =
                monitor::launch_monitor(&ctx, spec, &entry.package_root, &entry.working_directory)
                    .await;
            log_stage(Stage::Monitor, &outcome);
            carried.record(outcome);
        }

        if carried.is_empty() {
            let outcome = primary::launch_primary(&ctx, &entry, &invocation.arguments).await;
            log_stage(Stage::Primary, &outcome);
            carried.record(outcome);
        } else {
            info!(stage = %Stage::Primary, "skipped after earlier failure");
        }

        let end_outcome = match &entry.post_script {
            Some(post) => {
                self.run_script_stage(&ctx, Stage::PostScript, post, &entry, interpreter_installed)
                    .await
            }
            None => Ok(()),
        };

        if let Some(err) = carried.take() {
            return self.fail(err);
        }
        if let Err(err) = end_outcome {
            return self.fail(err);
        }

        info!("launch pipeline finished");
        0
    }

    async fn run_script_stage(
        &self,
        ctx: &StageContext<'_, S>,
        stage: Stage,
        spec: &ScriptSpec,
        entry: &LaunchEntry,
        interpreter_installed: bool,
    ) -> LaunchOutcome {
        let outcome = if interpreter_installed {
            script::run_script(ctx, spec, &entry.package_root, &entry.working_directory).await
        } else {
            Err(ErrorRecord::new(
                "The script interpreter is not installed on this machine",
                E_APPLICATION_NOT_REGISTERED,
            ))
        };
        let outcome = tagged(outcome, SCRIPT_INTERPRETER);
        log_stage(stage, &outcome);
        outcome
    }

    fn fail(&self, err: ErrorRecord) -> i32 {
        error!(code = err.code(), error = %err, "launch pipeline failed");
        self.reporter.report(&err.to_string());
        err.code()
    }
}

fn log_stage(stage: Stage, outcome: &LaunchOutcome) {
    match outcome {
        Ok(()) => info!(%stage, "stage completed"),
        Err(err) => info!(%stage, code = err.code(), "stage failed"),
    }
}
