//! # `vidwall-engine`
//!
//! Plays a video as the desktop background: the player is spawned, its window found, and then
//! moved into the hidden layer the desktop shell draws between the wallpaper and the icons.
//!
//! OS access goes through the traits in [`platform`], [`supervisor`] and [`config`], the
//! Windows implementations are only compiled there.

pub mod backends;
pub mod config;
pub mod desktop;
pub mod embed;
pub mod launcher;
pub mod platform;
pub mod session;
pub mod supervisor;

pub use backends::{Mpv, PlayerBackend};
pub use config::{ConfigError, ConfigStore, Configuration, FileStorage, Storage};
pub use desktop::{DesktopLayerLocator, LocateError};
pub use embed::{EmbedError, WindowEmbedder};
pub use launcher::{DEFAULT_TIMEOUT, LaunchError, PlayerLauncher, PlayerProcess};
pub use platform::{ScreenMetrics, WindowHandle, WindowSystem};
pub use session::{RunError, Session};
pub use supervisor::{ProcessSupervisor, ProcessTable, StopOutcome, SuperviseError, SystemProcesses};

#[cfg(windows)]
pub use config::RegistryStorage;
#[cfg(windows)]
pub use platform::Win32;
