// src/exec/windows.rs

//! Win32 process services.
//!
//! Blocking waits run on Tokio's blocking pool so the launcher's runtime stays
//! responsive. Every handle is owned by a guard that closes it on drop.

use std::ffi::{OsStr, c_void};
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};
use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_OBJECT_0};
use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE, CoInitializeEx};
use windows::Win32::System::Threading::{
    CreateProcessW, DeleteProcThreadAttributeList, EXTENDED_STARTUPINFO_PRESENT,
    GetExitCodeProcess, INFINITE, InitializeProcThreadAttributeList,
    LPPROC_THREAD_ATTRIBUTE_LIST, PROCESS_INFORMATION, STARTF_USESHOWWINDOW, STARTUPINFOEXW,
    STARTUPINFOW, UpdateProcThreadAttribute, WaitForSingleObject,
};
use windows::Win32::UI::Shell::{
    SEE_MASK_NOCLOSEPROCESS, SEE_MASK_WAITFORINPUTIDLE, SHELLEXECUTEINFOW, ShellExecuteExW,
};
use windows::Win32::UI::WindowsAndMessaging::WaitForInputIdle;
use windows::core::{PCWSTR, PWSTR};

use crate::exec::backend::{BoxFuture, ChildProcess, OsError, ProcessServices};
use crate::exec::request::{ExecutionRequest, ShellRequest};

/// `PROC_THREAD_ATTRIBUTE_DESKTOP_APP_POLICY`.
const PROC_THREAD_ATTRIBUTE_DESKTOP_APP_POLICY: usize = 0x0002_0012;

/// `PROCESS_CREATION_DESKTOP_APP_BREAKAWAY_DISABLE_PROCESS_TREE`.
const PROCESS_CREATION_DESKTOP_APP_BREAKAWAY_DISABLE_PROCESS_TREE: u32 = 0x04;

/// NUL-terminated UTF-16 copy of `s`.
pub fn to_wide(s: &str) -> Vec<u16> {
    os_to_wide(OsStr::new(s))
}

fn os_to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

fn path_to_wide(path: &Path) -> Vec<u16> {
    os_to_wide(path.as_os_str())
}

/// Convert a `windows` error into an [`OsError`], unwrapping Win32 codes that
/// were packed into an HRESULT.
pub fn os_error(err: &windows::core::Error, detail: &str) -> OsError {
    let hr = err.code().0 as u32;
    let code = if hr & 0xFFFF_0000 == 0x8007_0000 {
        (hr & 0xFFFF) as i32
    } else {
        hr as i32
    };
    OsError::new(code, format!("{detail}: {}", err.message()))
}

/// Owned process handle.
#[derive(Debug)]
struct OwnedHandle(HANDLE);

// A process handle is a kernel object reference and may be used from any
// thread.
unsafe impl Send for OwnedHandle {}
unsafe impl Sync for OwnedHandle {}

impl OwnedHandle {
    fn raw(&self) -> usize {
        self.0.0 as usize
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

fn handle_from_raw(raw: usize) -> HANDLE {
    HANDLE(raw as *mut c_void)
}

/// Process-thread attribute list carrying the desktop-app breakaway policy.
///
/// Allocated in two phases (size query, then initialise); `Drop` deletes the
/// list and frees the buffer on every path.
pub struct BreakawayAttribute {
    buffer: Vec<usize>,
    initialized: bool,
    // The list stores a pointer to this value; it must outlive the list.
    policy: Box<u32>,
}

unsafe impl Send for BreakawayAttribute {}
unsafe impl Sync for BreakawayAttribute {}

impl BreakawayAttribute {
    fn new() -> Result<Self, OsError> {
        let mut size: usize = 0;
        // The size query always "fails" with ERROR_INSUFFICIENT_BUFFER.
        let _ = unsafe { InitializeProcThreadAttributeList(None, 1, None, &mut size) };

        let words = size.div_ceil(std::mem::size_of::<usize>()).max(1);
        let mut attribute = Self {
            buffer: vec![0usize; words],
            initialized: false,
            policy: Box::new(PROCESS_CREATION_DESKTOP_APP_BREAKAWAY_DISABLE_PROCESS_TREE),
        };

        unsafe { InitializeProcThreadAttributeList(Some(attribute.list()), 1, None, &mut size) }
            .map_err(|e| os_error(&e, "Could not initialize the proc thread attribute list."))?;
        attribute.initialized = true;

        unsafe {
            UpdateProcThreadAttribute(
                attribute.list(),
                0,
                PROC_THREAD_ATTRIBUTE_DESKTOP_APP_POLICY,
                Some(&*attribute.policy as *const u32 as *const c_void),
                std::mem::size_of::<u32>(),
                None,
                None,
            )
        }
        .map_err(|e| os_error(&e, "Could not update Proc thread attribute."))?;

        Ok(attribute)
    }

    fn list(&self) -> LPPROC_THREAD_ATTRIBUTE_LIST {
        LPPROC_THREAD_ATTRIBUTE_LIST(self.buffer.as_ptr() as *mut c_void)
    }
}

impl Drop for BreakawayAttribute {
    fn drop(&mut self) {
        if self.initialized {
            unsafe { DeleteProcThreadAttributeList(self.list()) };
        }
    }
}

#[derive(Debug)]
pub struct WindowsChild {
    process: OwnedHandle,
    pid: Option<u32>,
}

impl ChildProcess for WindowsChild {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    fn wait(&mut self) -> BoxFuture<'_, Result<Option<i32>, OsError>> {
        let raw = self.process.raw();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let handle = handle_from_raw(raw);
                let result = unsafe { WaitForSingleObject(handle, INFINITE) };
                if result != WAIT_OBJECT_0 {
                    let err = windows::core::Error::from_win32();
                    return Err(os_error(&err, "WaitForSingleObject"));
                }
                let mut code: u32 = 0;
                let exit_code = unsafe { GetExitCodeProcess(handle, &mut code) }
                    .ok()
                    .map(|_| code as i32);
                Ok(exit_code)
            })
            .await
            .map_err(|e| OsError::new(1, format!("wait task failed: {e}")))?
        })
    }

    fn wait_for_input_idle(&mut self, timeout: Duration) -> BoxFuture<'_, ()> {
        let raw = self.process.raw();
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        Box::pin(async move {
            let res = tokio::task::spawn_blocking(move || unsafe {
                WaitForInputIdle(handle_from_raw(raw), millis)
            })
            .await;
            if let Ok(status) = res {
                debug!(status, "WaitForInputIdle returned");
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct WindowsServices;

impl WindowsServices {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessServices for WindowsServices {
    type Child = WindowsChild;
    type Attribute = BreakawayAttribute;

    fn breakaway_attribute(&self) -> Result<Self::Attribute, OsError> {
        BreakawayAttribute::new()
    }

    fn create_process(
        &self,
        request: &ExecutionRequest,
        attribute: Option<&Self::Attribute>,
    ) -> Result<Self::Child, OsError> {
        let application = request.application_name.as_deref().map(path_to_wide);
        // CreateProcessW may write into the command line buffer.
        let mut command_line = to_wide(&request.command_line);
        let directory = request.current_directory.as_deref().map(path_to_wide);

        let mut startup = STARTUPINFOEXW {
            StartupInfo: STARTUPINFOW {
                cb: std::mem::size_of::<STARTUPINFOEXW>() as u32,
                dwFlags: STARTF_USESHOWWINDOW,
                wShowWindow: request.show_mode.raw() as u16,
                ..Default::default()
            },
            ..Default::default()
        };
        if let Some(attribute) = attribute {
            startup.lpAttributeList = attribute.list();
        }

        let mut info = PROCESS_INFORMATION::default();
        unsafe {
            CreateProcessW(
                application
                    .as_ref()
                    .map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr())),
                Some(PWSTR(command_line.as_mut_ptr())),
                None,
                None,
                true,
                EXTENDED_STARTUPINFO_PRESENT,
                None,
                directory
                    .as_ref()
                    .map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr())),
                &startup.StartupInfo,
                &mut info,
            )
        }
        .map_err(|e| os_error(&e, "CreateProcessW"))?;

        drop(OwnedHandle(info.hThread));

        Ok(WindowsChild {
            process: OwnedHandle(info.hProcess),
            pid: Some(info.dwProcessId),
        })
    }

    fn shell_execute(&self, request: &ShellRequest) -> Result<Option<Self::Child>, OsError> {
        let verb = request.verb.as_verb().map(to_wide);
        let file = to_wide(&request.file);
        let parameters = to_wide(&request.parameters);
        let directory = request.directory.as_deref().map(path_to_wide);

        let mut mask = SEE_MASK_NOCLOSEPROCESS;
        if request.wait_for_input_idle {
            mask |= SEE_MASK_WAITFORINPUTIDLE;
        }

        let mut info = SHELLEXECUTEINFOW {
            cbSize: std::mem::size_of::<SHELLEXECUTEINFOW>() as u32,
            fMask: mask,
            lpVerb: verb.as_ref().map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr())),
            lpFile: PCWSTR(file.as_ptr()),
            lpParameters: PCWSTR(parameters.as_ptr()),
            lpDirectory: directory
                .as_ref()
                .map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr())),
            nShow: request.show_mode.raw(),
            ..Default::default()
        };

        unsafe { ShellExecuteExW(&mut info) }.map_err(|e| os_error(&e, "ShellExecuteExW"))?;

        if info.hProcess.is_invalid() {
            debug!(file = %request.file, "shell activation returned no process handle");
            return Ok(None);
        }

        Ok(Some(WindowsChild {
            process: OwnedHandle(info.hProcess),
            pid: None,
        }))
    }

    fn init_shell_apartment(&self) {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE) };
        if hr.is_err() {
            warn!(hresult = hr.0, "CoInitializeEx failed");
        }
    }
}
