use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use pkglaunch::engine::{ErrorRecord, HostReporter};
use pkglaunch::exec::{
    BoxFuture, ChildProcess, ExecutionRequest, OsError, ProcessServices, ShellRequest,
};
use pkglaunch::probe::EnvironmentProbe;

/// One call observed by [`FakeServices`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateProcess {
        request: ExecutionRequest,
        breakaway_attached: bool,
    },
    ShellExecute(ShellRequest),
    Wait {
        pid: u32,
    },
    WaitForInputIdle {
        pid: u32,
        timeout: Duration,
    },
    InitShellApartment,
}

#[derive(Debug)]
struct FakeState {
    calls: Vec<Call>,
    next_pid: u32,
    create_failures: Vec<(String, i32)>,
    wait_failures: Vec<(String, i32)>,
    breakaway_failure: Option<i32>,
    shell_failure: Option<i32>,
    shell_returns_handle: bool,
    exit_code: i32,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            next_pid: 1000,
            create_failures: Vec::new(),
            wait_failures: Vec::new(),
            breakaway_failure: None,
            shell_failure: None,
            shell_returns_handle: true,
            exit_code: 0,
        }
    }
}

/// Process services that never touch the OS.
///
/// - records every create / shell / wait call
/// - fails create or wait when the command line contains a scripted needle
/// - clones share state, so a test can keep one handle and move another
///   into the launcher
#[derive(Debug, Clone, Default)]
pub struct FakeServices {
    state: Arc<Mutex<FakeState>>,
}

impl FakeServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `create_process` with `code` when the command line or the
    /// application name contains `needle`.
    pub fn fail_create_when(&self, needle: &str, code: i32) -> &Self {
        self.lock().create_failures.push((needle.to_string(), code));
        self
    }

    /// Fail the wait of a child whose command line contains `needle`.
    pub fn fail_wait_when(&self, needle: &str, code: i32) -> &Self {
        self.lock().wait_failures.push((needle.to_string(), code));
        self
    }

    pub fn fail_breakaway(&self, code: i32) -> &Self {
        self.lock().breakaway_failure = Some(code);
        self
    }

    pub fn fail_shell(&self, code: i32) -> &Self {
        self.lock().shell_failure = Some(code);
        self
    }

    /// Make successful shell activations return no process handle.
    pub fn shell_without_handle(&self) -> &Self {
        self.lock().shell_returns_handle = false;
        self
    }

    /// Exit code reported by every successful wait.
    pub fn exit_with(&self, code: i32) -> &Self {
        self.lock().exit_code = code;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn created(&self) -> Vec<ExecutionRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::CreateProcess { request, .. } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn shell_requests(&self) -> Vec<ShellRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::ShellExecute(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn spawn_child(&self, state: &mut FakeState, label: &str) -> FakeChild {
        let pid = state.next_pid;
        state.next_pid += 1;
        let wait_failure = state
            .wait_failures
            .iter()
            .find(|(needle, _)| label.contains(needle.as_str()))
            .map(|(_, code)| *code);

        FakeChild {
            pid,
            state: Arc::clone(&self.state),
            wait_failure,
            exit_code: state.exit_code,
        }
    }
}

/// Stand-in for the prepared breakaway attribute.
#[derive(Debug)]
pub struct FakeAttribute;

impl ProcessServices for FakeServices {
    type Child = FakeChild;
    type Attribute = FakeAttribute;

    fn breakaway_attribute(&self) -> Result<Self::Attribute, OsError> {
        match self.lock().breakaway_failure {
            Some(code) => Err(OsError::new(code, "scripted attribute failure")),
            None => Ok(FakeAttribute),
        }
    }

    fn create_process(
        &self,
        request: &ExecutionRequest,
        attribute: Option<&Self::Attribute>,
    ) -> Result<Self::Child, OsError> {
        let mut state = self.lock();
        state.calls.push(Call::CreateProcess {
            request: request.clone(),
            breakaway_attached: attribute.is_some(),
        });

        let app = request
            .application_name
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let label = format!("{app} {}", request.command_line);

        let failure = state
            .create_failures
            .iter()
            .find(|(needle, _)| label.contains(needle.as_str()))
            .map(|(_, code)| *code);
        if let Some(code) = failure {
            return Err(OsError::new(code, "scripted create failure"));
        }

        Ok(self.spawn_child(&mut state, &label))
    }

    fn shell_execute(&self, request: &ShellRequest) -> Result<Option<Self::Child>, OsError> {
        let mut state = self.lock();
        state.calls.push(Call::ShellExecute(request.clone()));

        if let Some(code) = state.shell_failure {
            return Err(OsError::new(code, "scripted shell failure"));
        }
        if !state.shell_returns_handle {
            return Ok(None);
        }
        let label = format!("{} {}", request.file, request.parameters);
        Ok(Some(self.spawn_child(&mut state, &label)))
    }

    fn init_shell_apartment(&self) {
        self.lock().calls.push(Call::InitShellApartment);
    }
}

#[derive(Debug)]
pub struct FakeChild {
    pid: u32,
    state: Arc<Mutex<FakeState>>,
    wait_failure: Option<i32>,
    exit_code: i32,
}

impl ChildProcess for FakeChild {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn wait(&mut self) -> BoxFuture<'_, Result<Option<i32>, OsError>> {
        Box::pin(async move {
            self.state.lock().unwrap().calls.push(Call::Wait { pid: self.pid });
            match self.wait_failure {
                Some(code) => Err(OsError::new(code, "scripted wait failure")),
                None => Ok(Some(self.exit_code)),
            }
        })
    }

    fn wait_for_input_idle(&mut self, timeout: Duration) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.state.lock().unwrap().calls.push(Call::WaitForInputIdle {
                pid: self.pid,
                timeout,
            });
        })
    }
}

/// Probe with a fixed answer that counts how often it was asked.
#[derive(Debug)]
pub struct FakeProbe {
    answer: Result<bool, ErrorRecord>,
    queries: AtomicUsize,
}

impl FakeProbe {
    pub fn installed() -> Self {
        Self::answering(Ok(true))
    }

    pub fn missing() -> Self {
        Self::answering(Ok(false))
    }

    pub fn failing(message: &str, code: i32) -> Self {
        Self::answering(Err(ErrorRecord::new(message, code)))
    }

    fn answering(answer: Result<bool, ErrorRecord>) -> Self {
        Self {
            answer,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl EnvironmentProbe for FakeProbe {
    fn is_script_interpreter_installed(&self) -> Result<bool, ErrorRecord> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

/// Reporter that keeps every message it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl HostReporter for RecordingReporter {
    fn report(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}
