//! Finding the layer between the wallpaper and the desktop icons.
//!
//! The desktop shell (`Progman`) only creates that layer, a `WorkerW` window, when asked to
//! through an undocumented message. Once it exists, it is the top-level window directly
//! following the one that hosts the icon view (`SHELLDLL_DefView`).
//!
//! Everything here depends on shell internals observed on Windows 8 through 11 23H2. If the
//! shell changes its window layout again, this module is the only one to touch.

use std::time::Duration;

use thiserror::Error;

use crate::platform::{Enumeration, WindowHandle, WindowSystem};

/// Class of the desktop shell's root window.
pub const SHELL_ROOT_CLASS: &str = "Progman";
/// Class of the window holding the desktop icons.
pub const SHELL_VIEW_CLASS: &str = "SHELLDLL_DefView";
/// Class of the hidden rendering layer.
pub const LAYER_CLASS: &str = "WorkerW";

/// Undocumented `Progman` message that makes the shell split the icon view from the
/// wallpaper and put a fresh `WorkerW` between them. Without it the search fails on systems
/// where the layer has not been created yet.
pub const SPAWN_LAYER_MESSAGE: u32 = 0x052C;
/// `(wParam, lParam)` pairs sent with [`SPAWN_LAYER_MESSAGE`], in this order.
pub const SPAWN_LAYER_PARAMS: [(usize, isize); 2] = [(0xD, 0), (0xD, 1)];
/// How long the shell gets to process each message.
pub const SPAWN_LAYER_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, PartialEq, Error)]
pub enum LocateError {
    #[error("desktop shell window `{SHELL_ROOT_CLASS}` not found")]
    ShellNotFound,
    #[error("no `{LAYER_CLASS}` window behind the desktop icons")]
    LayerNotFound,
}

pub struct DesktopLayerLocator<'a, W: WindowSystem> {
    windows: &'a W,
}

impl<'a, W: WindowSystem> DesktopLayerLocator<'a, W> {
    pub fn new(windows: &'a W) -> Self {
        Self { windows }
    }

    /// Forces the shell to create the hidden layer, then finds it.
    ///
    /// The first top-level window owning the icon view decides, the enumeration stops there.
    ///
    /// # Errors
    /// - [`LocateError::ShellNotFound`] if there is no desktop shell.
    /// - [`LocateError::LayerNotFound`] if no window matches after a full enumeration.
    pub fn locate(&self) -> Result<WindowHandle, LocateError> {
        let shell = self
            .windows
            .find_window(Some(SHELL_ROOT_CLASS), None)
            .ok_or(LocateError::ShellNotFound)?;
        self.spawn_layer(shell);

        let mut found = Vec::new();
        let enumerated = self.windows.enum_top_level(&mut |window| {
            match layer_behind(self.windows, window) {
                Some(layer) => {
                    found.push(layer);
                    Enumeration::Stop
                }
                None => Enumeration::Continue,
            }
        });
        if let Err(err) = enumerated {
            log::error!("{err}");
            return Err(LocateError::LayerNotFound);
        }

        let layer = found.first().copied().ok_or(LocateError::LayerNotFound)?;
        log::info!("desktop layer {layer:?} found");
        Ok(layer)
    }

    fn spawn_layer(&self, shell: WindowHandle) {
        for (wparam, lparam) in SPAWN_LAYER_PARAMS {
            if let Err(err) = self.windows.send_message_timeout(
                shell,
                SPAWN_LAYER_MESSAGE,
                wparam,
                lparam,
                SPAWN_LAYER_TIMEOUT,
            ) {
                // The search below decides whether this mattered
                log::warn!("{err}");
            }
        }
    }
}

/// The hidden layer, if `window` is the one hosting the desktop icons.
pub fn layer_behind<W: WindowSystem>(windows: &W, window: WindowHandle) -> Option<WindowHandle> {
    windows.find_child(Some(window), None, SHELL_VIEW_CLASS)?;
    windows.find_child(None, Some(window), LAYER_CLASS)
}
