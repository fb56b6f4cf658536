// tests/config_loading.rs

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use pkglaunch::config::{
    ConfigFile, ConfigProvider, FileConfigProvider, RawConfigFile, assemble_launch_entry,
    load_and_validate, load_and_validate_with, resolve_package_root,
};
use pkglaunch::errors::PkgLaunchError;
use pkglaunch::fs::mock::MockFileSystem;
use pkglaunch::types::ERROR_BAD_CONFIGURATION;
use pkglaunch_test_utils::builders::{ApplicationBuilder, ConfigFileBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(dir: &TempDir, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents)?;
    Ok(path)
}

const FULL_CONFIG: &str = r#"
[[applications]]
id = "App"
executable = "bin/app.exe"
arguments = "--mode=fast"
workingDirectory = "bin"

[applications.startScript]
scriptPath = "setup.ps1"
scriptArguments = "-Quiet"

[applications.endScript]
scriptPath = "teardown.ps1"
runInVirtualEnvironment = true

[applications.monitor]
executable = "monitor.exe"
arguments = "--watch"
asAdmin = true
wait = true
"#;

#[test]
fn loads_a_full_application_entry() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, FULL_CONFIG)?;

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.applications().len(), 1);
    assert_eq!(cfg.package_root(), None);

    let app = cfg.application("App").ok_or("missing App")?;
    assert_eq!(app.executable, "bin/app.exe");
    assert_eq!(app.arguments, "--mode=fast");
    assert_eq!(app.working_directory, "bin");

    let pre = app.start_script.as_ref().ok_or("missing startScript")?;
    assert_eq!(pre.script_path, "setup.ps1");
    assert_eq!(pre.script_arguments.as_deref(), Some("-Quiet"));
    assert!(!pre.runs_in_virtual_environment());

    let post = app.end_script.as_ref().ok_or("missing endScript")?;
    assert!(post.runs_in_virtual_environment());

    let monitor = app.monitor.as_ref().ok_or("missing monitor")?;
    assert!(monitor.as_admin);
    assert!(monitor.wait);
    Ok(())
}

#[test]
fn accepts_alternate_key_spellings() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[[applications]]
id = "App"
executable = "app.exe"

[applications.preScript]
scriptPath = "pre.ps1"

[applications.postScript]
scriptPath = "post.ps1"

[applications.monitor]
executable = "m.exe"
asadmin = true
"#,
    )?;

    let cfg = load_and_validate(&path)?;
    let app = cfg.application("App").ok_or("missing App")?;
    assert_eq!(app.start_script.as_ref().map(|s| s.script_path.as_str()), Some("pre.ps1"));
    assert_eq!(app.end_script.as_ref().map(|s| s.script_path.as_str()), Some("post.ps1"));
    assert_eq!(app.monitor.as_ref().map(|m| (m.as_admin, m.wait)), Some((true, false)));
    Ok(())
}

#[test]
fn rejects_invalid_configs() -> TestResult {
    let cases = [
        ("no applications", "packageRoot = '/x'\n"),
        (
            "duplicate ids",
            "[[applications]]\nid = 'A'\nexecutable = 'a.exe'\n[[applications]]\nid = 'A'\nexecutable = 'b.exe'\n",
        ),
        ("empty id", "[[applications]]\nid = ''\nexecutable = 'a.exe'\n"),
        ("empty executable", "[[applications]]\nid = 'A'\nexecutable = ' '\n"),
        (
            "relative package root",
            "packageRoot = 'relative/dir'\n[[applications]]\nid = 'A'\nexecutable = 'a.exe'\n",
        ),
        (
            "empty script path",
            "[[applications]]\nid = 'A'\nexecutable = 'a.exe'\n[applications.startScript]\nscriptPath = ''\n",
        ),
        (
            "empty monitor executable",
            "[[applications]]\nid = 'A'\nexecutable = 'a.exe'\n[applications.monitor]\nexecutable = ''\n",
        ),
    ];

    for (name, contents) in cases {
        let dir = TempDir::new()?;
        let path = write_config(&dir, contents)?;
        match load_and_validate(&path) {
            Err(err @ PkgLaunchError::ConfigError(_)) => {
                assert_eq!(err.exit_code(), ERROR_BAD_CONFIGURATION, "{name}");
            }
            other => panic!("{name}: expected a config error, got {other:?}"),
        }
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[[applications]\nid = ")?;

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, PkgLaunchError::TomlError(_)));
    assert_eq!(err.exit_code(), ERROR_BAD_CONFIGURATION);
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> TestResult {
    let dir = TempDir::new()?;
    let err = load_and_validate(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, PkgLaunchError::IoError(_)));
    Ok(())
}

#[test]
fn loads_through_the_filesystem_abstraction() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/cfg/config.toml",
        "[[applications]]\nid = 'A'\nexecutable = 'a.exe'\n",
    );

    let cfg = load_and_validate_with(&fs, Path::new("/cfg/config.toml"))?;
    assert!(cfg.application("A").is_some());

    let err = load_and_validate_with(&fs, Path::new("/cfg/other.toml")).unwrap_err();
    assert!(matches!(err, PkgLaunchError::Other(_)));
    Ok(())
}

#[test]
fn package_root_precedence() -> TestResult {
    let dir = TempDir::new()?;
    let explicit = dir.path().join("explicit");
    let from_file = dir.path().join("from-file");
    let config_path = dir.path().join("cfg").join("config.toml");

    let with_root = ConfigFile::try_from(RawConfigFile {
        package_root: Some(from_file.clone()),
        ..ConfigFileBuilder::new()
            .with_application(ApplicationBuilder::new("A", "a.exe").build())
            .build_raw()
    })?;
    let without_root = ConfigFileBuilder::new()
        .with_application(ApplicationBuilder::new("A", "a.exe").build())
        .build();

    assert_eq!(
        resolve_package_root(Some(explicit.as_path()), &with_root, &config_path),
        explicit
    );
    assert_eq!(resolve_package_root(None, &with_root, &config_path), from_file);
    assert_eq!(
        resolve_package_root(None, &without_root, &config_path),
        dir.path().join("cfg")
    );
    Ok(())
}

#[test]
fn provider_selects_the_current_application() {
    let single = ConfigFileBuilder::new()
        .with_application(ApplicationBuilder::new("Only", "only.exe").build())
        .build();
    let many = ConfigFileBuilder::new()
        .with_application(ApplicationBuilder::new("A", "a.exe").build())
        .with_application(ApplicationBuilder::new("B", "b.exe").build())
        .build();
    let root = PathBuf::from("/pkg");

    let p = FileConfigProvider::new(&single, None, root.clone());
    assert_eq!(p.query_launch_entry().map(|e| e.executable), Some("only.exe".to_string()));

    let p = FileConfigProvider::new(&many, None, root.clone());
    assert!(p.query_launch_entry().is_none());

    let p = FileConfigProvider::new(&many, Some("B"), root.clone());
    assert_eq!(p.query_launch_entry().map(|e| e.executable), Some("b.exe".to_string()));

    let p = FileConfigProvider::new(&many, Some("b"), root.clone());
    assert!(p.query_launch_entry().is_none());
    assert!(assemble_launch_entry(&p).is_none());
}

#[test]
fn assembled_entry_carries_every_stage() {
    let provider = ApplicationBuilder::new("App", "app.exe")
        .arguments("-a")
        .working_directory("wd")
        .pre_script(pkglaunch_test_utils::builders::script("pre.ps1"))
        .post_script(pkglaunch_test_utils::builders::script("post.ps1"))
        .monitor(pkglaunch_test_utils::builders::monitor("m.exe", ""))
        .provider("/pkg");

    let entry = assemble_launch_entry(&provider).expect("entry");
    assert_eq!(entry.package_root, PathBuf::from("/pkg"));
    assert_eq!(entry.arguments, "-a");
    assert_eq!(entry.current_directory(), Path::new("/pkg").join("wd"));
    assert!(entry.pre_script.is_some());
    assert!(entry.post_script.is_some());
    assert!(entry.monitor.is_some());
}
