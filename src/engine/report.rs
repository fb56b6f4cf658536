// src/engine/report.rs

//! Host reporter: where the single user-visible error message goes.

use tracing::error;

/// Sink for human-readable error strings.
///
/// The orchestrator calls `report` at most once per invocation, right before
/// exiting with a non-zero code.
pub trait HostReporter: Send + Sync {
    fn report(&self, text: &str);
}

/// Writes the message to stderr.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter;

impl HostReporter for ConsoleReporter {
    fn report(&self, text: &str) {
        error!(message = %text, "launch failed");
        eprintln!("pkglaunch: {text}");
    }
}

/// Shows the message in a modal error box in addition to stderr.
#[cfg(windows)]
#[derive(Debug, Clone, Default)]
pub struct DialogReporter;

#[cfg(windows)]
impl HostReporter for DialogReporter {
    fn report(&self, text: &str) {
        use windows::Win32::UI::WindowsAndMessaging::{MB_ICONERROR, MB_OK, MessageBoxW};
        use windows::core::PCWSTR;

        use crate::exec::windows::to_wide;

        ConsoleReporter.report(text);

        let title = to_wide("Package launcher");
        let body = to_wide(text);
        unsafe {
            MessageBoxW(
                None,
                PCWSTR(body.as_ptr()),
                PCWSTR(title.as_ptr()),
                MB_OK | MB_ICONERROR,
            );
        }
    }
}

/// The reporter appropriate for the current platform.
pub fn default_reporter() -> Box<dyn HostReporter> {
    #[cfg(windows)]
    {
        Box::new(DialogReporter)
    }
    #[cfg(not(windows))]
    {
        Box::new(ConsoleReporter)
    }
}
