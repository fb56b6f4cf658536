// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod probe;
pub mod stages;
pub mod types;

use tracing::{debug, error};

use crate::cli::CliArgs;
use crate::config::{
    FileConfigProvider, LaunchEntry, assemble_launch_entry, default_config_path,
    load_and_validate, resolve_package_root,
};
use crate::engine::{HostReporter, Invocation, Orchestrator, default_reporter};
use crate::errors::Result;
use crate::exec::{PlatformServices, ProcessLauncher};
use crate::fs::RealFileSystem;
use crate::probe::default_probe;
use crate::stages::monitor::MonitorPlan;
use crate::stages::primary::PrimaryPlan;
use crate::stages::{monitor, primary, script};

/// High-level entry point used by `main.rs`. Returns the process exit code.
///
/// This wires together:
/// - config loading and application selection
/// - the platform process services, probe and reporter
/// - the launch pipeline
///
/// Failures before the pipeline starts (unreadable or invalid config) are
/// reported through the host reporter like any stage error.
pub async fn run(args: CliArgs) -> i32 {
    let reporter = default_reporter();
    match run_with_reporter(&args, reporter.as_ref()).await {
        Ok(code) => code,
        Err(err) => {
            reporter.report(&err.to_string());
            err.exit_code()
        }
    }
}

async fn run_with_reporter(args: &CliArgs, reporter: &dyn HostReporter) -> Result<i32> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path).inspect_err(|err| {
        error!(config = %config_path.display(), error = %err, "could not load launch configuration");
    })?;

    let package_root = resolve_package_root(args.package_root.as_deref(), &cfg, &config_path);
    debug!(package_root = %package_root.display(), "resolved package root");

    let provider = FileConfigProvider::new(&cfg, args.app_id.as_deref(), package_root);
    let invocation = Invocation {
        arguments: args.passthrough_string(),
        show_mode: args.show_mode(),
    };

    if args.dry_run {
        match assemble_launch_entry(&provider) {
            Some(entry) => print_dry_run(&entry, &invocation),
            None => println!("pkglaunch dry-run: no matching launch entry"),
        }
        return Ok(0);
    }

    let probe = default_probe();
    let fs = RealFileSystem;
    let orchestrator = Orchestrator::new(
        ProcessLauncher::new(PlatformServices::new()),
        &provider,
        probe.as_ref(),
        reporter,
        &fs,
    );

    Ok(orchestrator.run(&invocation).await)
}

/// Print what each stage would launch, in pipeline order.
fn print_dry_run(entry: &LaunchEntry, invocation: &Invocation) {
    let root = &entry.package_root;
    let wd = &entry.working_directory;

    println!("pkglaunch dry-run");
    println!("  package_root = {}", root.display());
    println!("  show_mode = {}", invocation.show_mode);
    println!();

    if let Some(spec) = &entry.pre_script {
        let plan = script::plan(spec, root, wd, invocation.show_mode);
        println!("pre-script:");
        println!("    script: {}", plan.script_path.display());
        println!("    cmd: {}", plan.request.command_line);
        println!("    breakaway: {}", plan.request.breakaway_from_container);
    }

    if let Some(spec) = &entry.monitor {
        println!("monitor:");
        match monitor::plan(spec, root, wd, invocation.show_mode) {
            MonitorPlan::Direct(request) => {
                println!("    strategy: direct");
                println!("    cmd: {}", request.command_line);
                if let Some(dir) = &request.current_directory {
                    println!("    dir: {}", dir.display());
                }
            }
            MonitorPlan::Elevated { request, wait } => {
                println!("    strategy: elevated");
                println!("    file: {}", request.file);
                println!("    parameters: {}", request.parameters);
                println!("    wait: {wait}");
            }
        }
    }

    println!("primary:");
    match primary::plan(entry, &invocation.arguments, invocation.show_mode) {
        PrimaryPlan::Direct(request) => {
            println!("    strategy: direct");
            if let Some(app) = &request.application_name {
                println!("    application: {}", app.display());
            }
            println!("    cmd: {}", request.command_line);
            if let Some(dir) = &request.current_directory {
                println!("    dir: {}", dir.display());
            }
        }
        PrimaryPlan::Shell(request) => {
            println!("    strategy: shell");
            println!("    file: {}", request.file);
            if !request.parameters.is_empty() {
                println!("    parameters: {}", request.parameters);
            }
            if let Some(dir) = &request.directory {
                println!("    dir: {}", dir.display());
            }
        }
    }

    if let Some(spec) = &entry.post_script {
        let plan = script::plan(spec, root, wd, invocation.show_mode);
        println!("post-script:");
        println!("    script: {}", plan.script_path.display());
        println!("    cmd: {}", plan.request.command_line);
        println!("    breakaway: {}", plan.request.breakaway_from_container);
    }

    debug!("dry-run complete (no execution)");
}
