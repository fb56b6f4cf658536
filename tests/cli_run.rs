// tests/cli_run.rs

use std::error::Error;
use std::fs;

use clap::Parser;
use tempfile::TempDir;

use pkglaunch::cli::CliArgs;
use pkglaunch::config::LaunchEntry;
use pkglaunch::exec::command_line::split_command_line;
use pkglaunch::stages::primary::primary_command_line;
use pkglaunch::types::{ERROR_BAD_CONFIGURATION, ShowMode};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn trailing_arguments_are_passed_through() -> TestResult {
    let args = CliArgs::try_parse_from([
        "pkglaunch",
        "--app-id",
        "App",
        "--show-mode",
        "3",
        "--",
        "--flag",
        "value with space",
    ])?;

    assert_eq!(args.app_id.as_deref(), Some("App"));
    assert_eq!(args.show_mode(), ShowMode(3));
    assert_eq!(args.passthrough, vec!["--flag", "value with space"]);
    assert!(!args.dry_run);
    Ok(())
}

#[test]
fn passthrough_arguments_keep_their_boundaries() -> TestResult {
    let passthrough = [
        "my file.txt",
        "--name=\"quoted\"",
        "C:\\dir with space\\",
        "",
        "plain",
    ];
    let args = CliArgs::try_parse_from(["pkglaunch", "--"].into_iter().chain(passthrough))?;

    let entry = LaunchEntry {
        package_root: "/pkg".into(),
        executable: "app.exe".to_string(),
        arguments: String::new(),
        working_directory: String::new(),
        pre_script: None,
        post_script: None,
        monitor: None,
    };
    let command_line = primary_command_line(&entry, &args.passthrough_string());

    let mut expected = vec!["app.exe".to_string()];
    expected.extend(passthrough.iter().map(|a| a.to_string()));
    assert_eq!(split_command_line(&command_line), expected);
    Ok(())
}

#[test]
fn defaults() -> TestResult {
    let args = CliArgs::try_parse_from(["pkglaunch"])?;
    assert_eq!(args.show_mode(), ShowMode::NORMAL);
    assert!(args.config.is_none());
    assert!(args.passthrough.is_empty());
    assert_eq!(args.passthrough_string(), "");
    Ok(())
}

#[tokio::test]
async fn dry_run_launches_nothing() -> TestResult {
    let dir = TempDir::new()?;
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        "[[applications]]\nid = 'App'\nexecutable = 'pkglaunch-not-installed.exe'\n",
    )?;

    let config = config.to_string_lossy().into_owned();
    let args = CliArgs::try_parse_from(["pkglaunch", "--config", config.as_str(), "--dry-run"])?;
    assert_eq!(pkglaunch::run(args).await, 0);
    Ok(())
}

#[tokio::test]
async fn invalid_config_exits_with_bad_configuration() -> TestResult {
    let dir = TempDir::new()?;
    let config = dir.path().join("config.toml");
    fs::write(&config, "packageRoot = 'relative'\n")?;

    let config = config.to_string_lossy().into_owned();
    let args = CliArgs::try_parse_from(["pkglaunch", "--config", config.as_str()])?;
    assert_eq!(pkglaunch::run(args).await, ERROR_BAD_CONFIGURATION);
    Ok(())
}
