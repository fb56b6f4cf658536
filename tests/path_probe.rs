// tests/path_probe.rs

use std::error::Error;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use pkglaunch::probe::{EnvironmentProbe, PathProbe};
use pkglaunch::types::ERROR_NOT_FOUND;

type TestResult = Result<(), Box<dyn Error>>;

fn write_executable(path: &Path) -> TestResult {
    fs::write(path, "#!/bin/sh\nexit 0\n")?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

#[test]
fn finds_interpreter_on_search_path() -> TestResult {
    let empty = TempDir::new()?;
    let bin = TempDir::new()?;
    write_executable(&bin.path().join("pwsh"))?;

    let search = std::env::join_paths([empty.path(), bin.path()])?;
    let probe = PathProbe::with_search_path(Some(search), "pwsh");
    assert_eq!(probe.is_script_interpreter_installed(), Ok(true));
    Ok(())
}

#[test]
fn reports_missing_interpreter() -> TestResult {
    let empty = TempDir::new()?;
    let probe = PathProbe::with_search_path(Some(OsString::from(empty.path())), "pwsh");
    assert_eq!(probe.is_script_interpreter_installed(), Ok(false));
    Ok(())
}

#[test]
fn directories_do_not_count() -> TestResult {
    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("pwsh"))?;
    let probe = PathProbe::with_search_path(Some(OsString::from(dir.path())), "pwsh");
    assert_eq!(probe.is_script_interpreter_installed(), Ok(false));
    Ok(())
}

#[cfg(unix)]
#[test]
fn files_without_the_exec_bit_do_not_count() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    let bin = TempDir::new()?;
    let interpreter = bin.path().join("pwsh");
    fs::write(&interpreter, "#!/bin/sh\nexit 0\n")?;
    fs::set_permissions(&interpreter, fs::Permissions::from_mode(0o644))?;

    let probe = PathProbe::with_search_path(Some(OsString::from(bin.path())), "pwsh");
    assert_eq!(probe.is_script_interpreter_installed(), Ok(false));
    Ok(())
}

#[test]
fn unset_search_path_is_an_error() {
    let probe = PathProbe::with_search_path(None, "pwsh");
    let err = probe.is_script_interpreter_installed().unwrap_err();
    assert_eq!(err.code(), ERROR_NOT_FOUND);
}
