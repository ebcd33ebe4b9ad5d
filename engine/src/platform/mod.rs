//! Window system primitives.
//!
//! The embedding protocol only talks to the desktop through [`WindowSystem`], the Win32 version
//! lives in [`win32`] and is only built on Windows.

#[cfg(windows)]
mod win32;

#[cfg(windows)]
pub use win32::Win32;

use std::time::Duration;
use thiserror::Error;

/// Opaque handle of a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(isize);

impl WindowHandle {
    #[must_use]
    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> isize {
        self.0
    }
}

/// Returned by enumeration visitors to decide whether the enumeration goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enumeration {
    Continue,
    Stop,
}

/// Dimensions of the primary display, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMetrics {
    pub width: i32,
    pub height: i32,
}

/// Position and size of a window, relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// A rectangle anchored at the origin that covers the whole screen.
    #[must_use]
    pub const fn covering(metrics: ScreenMetrics) -> Self {
        Self {
            x: 0,
            y: 0,
            width: metrics.width,
            height: metrics.height,
        }
    }
}

/// A failed OS call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{call}` failed with OS error {code:#x}")]
pub struct OsError {
    pub call: &'static str,
    pub code: i32,
}

impl OsError {
    #[must_use]
    pub const fn new(call: &'static str, code: i32) -> Self {
        Self { call, code }
    }
}

pub type OsResult<T> = Result<T, OsError>;

/// The window system primitives the embedding protocol relies on.
pub trait WindowSystem {
    /// Finds a top-level window by class and/or title.
    fn find_window(&self, class: Option<&str>, title: Option<&str>) -> Option<WindowHandle>;

    /// Finds a window of the given class.
    ///
    /// With a `parent`, only its children are searched. Without one, the search runs over the
    /// top-level windows, which makes `after` a sibling lookup. The search starts right after
    /// `after` in z-order, or at the first window when `after` is `None`.
    fn find_child(
        &self,
        parent: Option<WindowHandle>,
        after: Option<WindowHandle>,
        class: &str,
    ) -> Option<WindowHandle>;

    /// Calls `visit` for every top-level window in z-order, until it returns
    /// [`Enumeration::Stop`].
    ///
    /// # Errors
    /// Returns an [`OsError`] if the enumeration itself fails. Stopping early is not a failure.
    fn enum_top_level(&self, visit: &mut dyn FnMut(WindowHandle) -> Enumeration) -> OsResult<()>;

    /// Sends a message and waits for it to be processed, at most for `timeout`.
    ///
    /// # Errors
    /// Returns an [`OsError`] if the message could not be delivered or timed out.
    fn send_message_timeout(
        &self,
        window: WindowHandle,
        message: u32,
        wparam: usize,
        lparam: isize,
        timeout: Duration,
    ) -> OsResult<usize>;

    /// Reads the size of the primary display.
    ///
    /// # Errors
    /// Returns an [`OsError`] if a metric cannot be read.
    fn screen_metrics(&self) -> OsResult<ScreenMetrics>;

    /// Moves and resizes a window without changing its z-order.
    ///
    /// # Errors
    /// Returns an [`OsError`] if the OS rejects the new geometry.
    fn set_position(&self, window: WindowHandle, rect: Rect) -> OsResult<()>;

    /// Makes `parent` the parent of `window`.
    ///
    /// # Errors
    /// Returns an [`OsError`] if the OS refuses the reparenting.
    fn set_parent(&self, window: WindowHandle, parent: WindowHandle) -> OsResult<()>;
}

impl<W: WindowSystem + ?Sized> WindowSystem for &W {
    fn find_window(&self, class: Option<&str>, title: Option<&str>) -> Option<WindowHandle> {
        (**self).find_window(class, title)
    }

    fn find_child(
        &self,
        parent: Option<WindowHandle>,
        after: Option<WindowHandle>,
        class: &str,
    ) -> Option<WindowHandle> {
        (**self).find_child(parent, after, class)
    }

    fn enum_top_level(&self, visit: &mut dyn FnMut(WindowHandle) -> Enumeration) -> OsResult<()> {
        (**self).enum_top_level(visit)
    }

    fn send_message_timeout(
        &self,
        window: WindowHandle,
        message: u32,
        wparam: usize,
        lparam: isize,
        timeout: Duration,
    ) -> OsResult<usize> {
        (**self).send_message_timeout(window, message, wparam, lparam, timeout)
    }

    fn screen_metrics(&self) -> OsResult<ScreenMetrics> {
        (**self).screen_metrics()
    }

    fn set_position(&self, window: WindowHandle, rect: Rect) -> OsResult<()> {
        (**self).set_position(window, rect)
    }

    fn set_parent(&self, window: WindowHandle, parent: WindowHandle) -> OsResult<()> {
        (**self).set_parent(window, parent)
    }
}
