//! [`WindowSystem`] on top of `user32`.

use std::ffi::c_void;
use std::time::Duration;

use windows::Win32::Foundation::{BOOL, FALSE, HWND, LPARAM, TRUE, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, FindWindowExW, FindWindowW, GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN,
    SMTO_NORMAL, SWP_NOZORDER, SendMessageTimeoutW, SetParent, SetWindowPos,
};
use windows::core::{Error, HSTRING, PCWSTR};

use super::{Enumeration, OsError, OsResult, Rect, ScreenMetrics, WindowHandle, WindowSystem};

/// The real desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32;

fn hwnd(handle: Option<WindowHandle>) -> HWND {
    handle.map_or_else(HWND::default, |handle| HWND(handle.raw() as *mut c_void))
}

fn handle(hwnd: HWND) -> Option<WindowHandle> {
    (!hwnd.is_invalid()).then(|| WindowHandle::from_raw(hwnd.0 as isize))
}

fn pcwstr(value: Option<&HSTRING>) -> PCWSTR {
    value.map_or_else(PCWSTR::null, |value| PCWSTR(value.as_ptr()))
}

fn os_error(call: &'static str, err: &Error) -> OsError {
    OsError::new(call, err.code().0)
}

/// State handed to [`visit_window`] through the `LPARAM` of `EnumWindows`.
struct EnumContext<'a> {
    visit: &'a mut dyn FnMut(WindowHandle) -> Enumeration,
    stopped: bool,
}

unsafe extern "system" fn visit_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: `lparam` points to the `EnumContext` owned by `enum_top_level`, which outlives
    // the `EnumWindows` call.
    let context = unsafe { &mut *(lparam.0 as *mut EnumContext) };
    let Some(window) = handle(hwnd) else {
        return TRUE;
    };
    match (context.visit)(window) {
        Enumeration::Continue => TRUE,
        Enumeration::Stop => {
            context.stopped = true;
            FALSE
        }
    }
}

impl WindowSystem for Win32 {
    fn find_window(&self, class: Option<&str>, title: Option<&str>) -> Option<WindowHandle> {
        let class = class.map(HSTRING::from);
        let title = title.map(HSTRING::from);
        let found = unsafe { FindWindowW(pcwstr(class.as_ref()), pcwstr(title.as_ref())) };
        found.ok().and_then(handle)
    }

    fn find_child(
        &self,
        parent: Option<WindowHandle>,
        after: Option<WindowHandle>,
        class: &str,
    ) -> Option<WindowHandle> {
        let class = HSTRING::from(class);
        let found = unsafe {
            FindWindowExW(
                hwnd(parent),
                hwnd(after),
                PCWSTR(class.as_ptr()),
                PCWSTR::null(),
            )
        };
        found.ok().and_then(handle)
    }

    fn enum_top_level(&self, visit: &mut dyn FnMut(WindowHandle) -> Enumeration) -> OsResult<()> {
        let mut context = EnumContext {
            visit,
            stopped: false,
        };
        let result = unsafe {
            EnumWindows(
                Some(visit_window),
                LPARAM(std::ptr::from_mut(&mut context) as isize),
            )
        };
        match result {
            // EnumWindows reports a visitor asking to stop as a failure
            Err(_) if context.stopped => Ok(()),
            Err(err) => Err(os_error("EnumWindows", &err)),
            Ok(()) => Ok(()),
        }
    }

    fn send_message_timeout(
        &self,
        window: WindowHandle,
        message: u32,
        wparam: usize,
        lparam: isize,
        timeout: Duration,
    ) -> OsResult<usize> {
        let mut reply: usize = 0;
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        let sent = unsafe {
            SendMessageTimeoutW(
                hwnd(Some(window)),
                message,
                WPARAM(wparam),
                LPARAM(lparam),
                SMTO_NORMAL,
                millis,
                Some(std::ptr::from_mut(&mut reply)),
            )
        };
        if sent.0 == 0 {
            return Err(os_error("SendMessageTimeoutW", &Error::from_win32()));
        }
        Ok(reply)
    }

    fn screen_metrics(&self) -> OsResult<ScreenMetrics> {
        let width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        let height = unsafe { GetSystemMetrics(SM_CYSCREEN) };
        // GetSystemMetrics has no extended error information, zero is its only failure signal
        if width == 0 || height == 0 {
            return Err(OsError::new("GetSystemMetrics", 0));
        }
        Ok(ScreenMetrics { width, height })
    }

    fn set_position(&self, window: WindowHandle, rect: Rect) -> OsResult<()> {
        unsafe {
            SetWindowPos(
                hwnd(Some(window)),
                HWND::default(),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOZORDER,
            )
        }
        .map_err(|err| os_error("SetWindowPos", &err))
    }

    fn set_parent(&self, window: WindowHandle, parent: WindowHandle) -> OsResult<()> {
        unsafe { SetParent(hwnd(Some(window)), hwnd(Some(parent))) }
            .map(|_previous| ())
            .map_err(|err| os_error("SetParent", &err))
    }
}
