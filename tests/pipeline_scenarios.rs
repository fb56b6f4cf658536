// tests/pipeline_scenarios.rs

mod common;
use crate::common::{Harness, PKG};

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pkglaunch::exec::ShellVerb;
use pkglaunch::exec::command_line::quote;
use pkglaunch::types::{E_APPLICATION_NOT_REGISTERED, ERROR_FILE_NOT_FOUND, ShowMode};
use pkglaunch_test_utils::builders::{ApplicationBuilder, elevated_monitor, script};
use pkglaunch_test_utils::fakes::{Call, FakeProbe};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn happy_path_launches_primary_once() -> TestResult {
    let h = Harness::new();
    let provider = ApplicationBuilder::new("App", "app.exe")
        .arguments("--mode=fast")
        .provider(PKG);

    let code = h.run(&provider, "extra").await;
    assert_eq!(code, 0);

    let created = h.services.created();
    assert_eq!(created.len(), 1);
    let primary = &created[0];
    assert_eq!(primary.application_name, Some(Path::new(PKG).join("app.exe")));
    assert_eq!(primary.command_line, "\"app.exe\" --mode=fast extra");
    assert_eq!(primary.current_directory, Some(PathBuf::from(PKG)));
    assert!(!primary.breakaway_from_container);

    assert!(h.reporter.messages().is_empty());
    assert!(h.services.shell_requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn non_executable_primary_goes_through_the_shell() -> TestResult {
    let h = Harness::new();
    let provider = ApplicationBuilder::new("Doc", "doc.pdf").provider(PKG);

    let code = h.run(&provider, "ignored").await;
    assert_eq!(code, 0);

    assert!(h.services.created().is_empty());
    let shell = h.services.shell_requests();
    assert_eq!(shell.len(), 1);
    assert_eq!(shell[0].verb, ShellVerb::Open);
    assert_eq!(shell[0].file, Path::new(PKG).join("doc.pdf").display().to_string());
    assert_eq!(shell[0].parameters, "");
    assert_eq!(shell[0].directory, None);

    // Shell-activated primaries are never waited on.
    assert!(
        !h.services
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Wait { .. }))
    );
    Ok(())
}

#[tokio::test]
async fn missing_pre_script_is_reported_without_launching() -> TestResult {
    let h = Harness::new();
    let provider = ApplicationBuilder::new("App", "app.exe")
        .pre_script(script("go.ps1"))
        .provider(PKG);

    let code = h.run(&provider, "").await;
    assert_eq!(code, ERROR_FILE_NOT_FOUND);

    assert!(h.services.calls().is_empty());
    let messages = h.reporter.messages();
    assert_eq!(messages.len(), 1);
    let expected = format!(
        "The script file {} can't be found",
        Path::new(PKG).join("go.ps1").display()
    );
    assert!(messages[0].contains(&expected), "got: {}", messages[0]);
    Ok(())
}

#[tokio::test]
async fn absent_interpreter_with_pre_script_launches_nothing() -> TestResult {
    let h = Harness::new().with_probe(FakeProbe::missing());
    h.fs.add_file(Path::new(PKG).join("go.ps1"), "Write-Host hi");
    let provider = ApplicationBuilder::new("App", "app.exe")
        .pre_script(script("go.ps1"))
        .provider(PKG);

    let code = h.run(&provider, "").await;
    assert_eq!(code, E_APPLICATION_NOT_REGISTERED);

    assert!(h.services.calls().is_empty());
    let messages = h.reporter.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("not installed"), "got: {}", messages[0]);
    Ok(())
}

#[tokio::test]
async fn primary_failure_is_reported_after_post_script_runs() -> TestResult {
    let h = Harness::new();
    h.fs.add_file(Path::new(PKG).join("post.ps1"), "");
    h.services.fail_create_when("app.exe", 5);
    let provider = ApplicationBuilder::new("App", "app.exe")
        .post_script(script("post.ps1"))
        .provider(PKG);

    let code = h.run(&provider, "").await;
    assert_eq!(code, 5);

    let created = h.services.created();
    assert_eq!(created.len(), 2);
    assert!(created[1].command_line.contains("-file post.ps1"));

    let messages = h.reporter.messages();
    assert_eq!(messages.len(), 1);
    let expected_name = Path::new(PKG).join("app.exe").display().to_string();
    assert!(messages[0].contains(&format!("Failed to create a process for {expected_name}")));
    assert!(messages[0].contains("(executable: app.exe)"));
    assert!(messages[0].contains("[error 5]"));
    Ok(())
}

#[tokio::test]
async fn elevated_monitor_with_wait_blocks_before_primary() -> TestResult {
    let h = Harness::new();
    let provider = ApplicationBuilder::new("App", "app.exe")
        .monitor(elevated_monitor("m.exe", "-x", true))
        .provider(PKG);

    let code = h.run(&provider, "").await;
    assert_eq!(code, 0);

    let shell = h.services.shell_requests();
    assert_eq!(shell.len(), 1);
    let monitor = &shell[0];
    assert_eq!(monitor.verb, ShellVerb::RunAs);
    assert_eq!(monitor.file, quote(&Path::new(PKG).join("m.exe").display().to_string()));
    assert_eq!(monitor.parameters, "-x");
    assert_eq!(monitor.directory, None);
    assert_eq!(monitor.show_mode, ShowMode::NORMAL);
    assert!(!monitor.wait_for_input_idle);

    let calls = h.services.calls();
    assert!(matches!(calls[0], Call::InitShellApartment));
    assert!(matches!(calls[1], Call::ShellExecute(_)));
    let Call::Wait { pid: monitor_pid } = calls[2] else {
        panic!("expected a wait on the monitor, got {:?}", calls[2]);
    };
    assert!(matches!(calls[3], Call::CreateProcess { .. }));
    assert!(matches!(calls[4], Call::Wait { pid } if pid != monitor_pid));
    assert_eq!(calls.len(), 5);
    Ok(())
}

#[tokio::test]
async fn elevated_monitor_without_wait_only_waits_for_input_idle() -> TestResult {
    let h = Harness::new();
    let provider = ApplicationBuilder::new("App", "app.exe")
        .monitor(elevated_monitor("m.exe", "", false))
        .provider(PKG);

    let code = h.run(&provider, "").await;
    assert_eq!(code, 0);

    let shell = h.services.shell_requests();
    assert!(shell[0].wait_for_input_idle);

    let calls = h.services.calls();
    assert!(matches!(calls[1], Call::ShellExecute(_)));
    assert!(matches!(
        calls[2],
        Call::WaitForInputIdle { timeout, .. } if timeout == Duration::from_millis(10)
    ));
    assert!(matches!(calls[3], Call::CreateProcess { .. }));
    Ok(())
}

#[tokio::test]
async fn elevated_monitor_without_handle_still_continues() -> TestResult {
    let h = Harness::new();
    h.services.shell_without_handle();
    let provider = ApplicationBuilder::new("App", "app.exe")
        .monitor(elevated_monitor("m.exe", "", true))
        .provider(PKG);

    let code = h.run(&provider, "").await;
    assert_eq!(code, 0);
    assert_eq!(h.services.created().len(), 1);
    Ok(())
}
