mod mpv;

pub use mpv::Mpv;

use smol::process::Command;
use std::path::Path;

/// General trait of a video player that can be embedded.
pub trait PlayerBackend {
    /// Name of the executable, without extension.
    fn executable(&self) -> &str;

    /// Class of the player's top-level window.
    fn window_class(&self) -> &str;

    /// Gets the [`Command`] that plays `video` with the player at `program`.
    fn command(&self, program: &Path, video: &Path) -> Command;
}
