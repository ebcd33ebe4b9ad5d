//! Turns a window into the desktop background.

use thiserror::Error;

use crate::platform::{OsError, Rect, ScreenMetrics, WindowHandle, WindowSystem};

#[derive(Debug, PartialEq, Error)]
pub enum EmbedError {
    #[error("cannot resize player window: {0}")]
    ResizeFailed(OsError),
    #[error("cannot move player window into the desktop layer: {0}")]
    ReparentFailed(OsError),
}

pub struct WindowEmbedder<'a, W: WindowSystem> {
    windows: &'a W,
}

impl<'a, W: WindowSystem> WindowEmbedder<'a, W> {
    pub fn new(windows: &'a W) -> Self {
        Self { windows }
    }

    /// Stretches `window` over the primary screen and reparents it under `layer`.
    ///
    /// Nothing is rolled back: if reparenting fails, the window stays resized.
    ///
    /// # Errors
    /// Returns which of the two steps failed.
    pub fn embed(
        &self,
        window: WindowHandle,
        layer: WindowHandle,
        metrics: ScreenMetrics,
    ) -> Result<(), EmbedError> {
        self.windows
            .set_position(window, Rect::covering(metrics))
            .map_err(EmbedError::ResizeFailed)?;
        self.windows
            .set_parent(window, layer)
            .map_err(EmbedError::ReparentFailed)?;
        log::info!(
            "window {window:?} embedded into {layer:?} at {}x{}",
            metrics.width,
            metrics.height
        );
        Ok(())
    }
}
