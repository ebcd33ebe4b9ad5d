//! One embedding run, from the stored configuration to a player behind the desktop icons.
//!
//! Every failure ends the run. The only retry is the bounded window lookup, and the only
//! compensation is clearing the stored video when the player never shows a window.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::backends::PlayerBackend;
use crate::config::{ConfigError, ConfigStore, Storage};
use crate::desktop::{DesktopLayerLocator, LocateError};
use crate::embed::{EmbedError, WindowEmbedder};
use crate::launcher::{LaunchError, POLL_INTERVAL, PlayerLauncher};
use crate::platform::{OsError, WindowSystem};
use crate::supervisor::{ProcessSupervisor, ProcessTable, SuperviseError};

#[derive(Debug, PartialEq, Error)]
pub enum RunError {
    #[error("{0}")]
    ConfigInvalid(ConfigError),
    #[error("`{0}` is not installed or not in PATH")]
    PlayerNotInstalled(String),
    #[error("failed to stop the running player: {0}")]
    ProcessStopFailed(SuperviseError),
    #[error("{0}")]
    ProcessSpawnFailed(LaunchError),
    #[error("player window did not show up within {0:?}, the video might be invalid")]
    WindowDiscoveryTimeout(Duration),
    #[error("{0}")]
    DesktopLayerNotFound(LocateError),
    #[error("cannot resize player window: {0}")]
    ResizeFailed(OsError),
    #[error("cannot move player window into the desktop layer: {0}")]
    ReparentFailed(OsError),
}

impl From<EmbedError> for RunError {
    fn from(err: EmbedError) -> Self {
        match err {
            EmbedError::ResizeFailed(err) => Self::ResizeFailed(err),
            EmbedError::ReparentFailed(err) => Self::ReparentFailed(err),
        }
    }
}

pub struct Session<W, T, S, B>
where
    W: WindowSystem,
    T: ProcessTable,
    S: Storage,
    B: PlayerBackend,
{
    windows: W,
    config: ConfigStore<S>,
    supervisor: ProcessSupervisor<T>,
    backend: B,
    interval: Duration,
}

impl<W, T, S, B> Session<W, T, S, B>
where
    W: WindowSystem,
    T: ProcessTable,
    S: Storage,
    B: PlayerBackend,
{
    pub fn new(windows: W, processes: T, storage: S, backend: B) -> Self {
        let supervisor = ProcessSupervisor::new(processes, backend.executable());
        Self {
            windows,
            config: ConfigStore::new(storage),
            supervisor,
            backend,
            interval: POLL_INTERVAL,
        }
    }

    /// Overrides the delay between two player window lookups.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Plays the configured video as the desktop background.
    ///
    /// Returns the pid of the player, which keeps running after this returns.
    ///
    /// # Errors
    /// See [`RunError`]. A player spawned before the failure is left running.
    pub async fn run(&mut self, timeout: Duration) -> Result<u32, RunError> {
        let video = self.load_video()?;
        log::info!("video: {}", video.display());

        self.supervisor.stop().map_err(RunError::ProcessStopFailed)?;
        let program = self
            .supervisor
            .locate()
            .map_err(|_| RunError::PlayerNotInstalled(self.backend.executable().to_string()))?;

        let launcher = PlayerLauncher::new(&self.windows, &self.backend, program)
            .poll_interval(self.interval);
        let player = launcher
            .spawn(&video)
            .map_err(RunError::ProcessSpawnFailed)?;
        let window = match launcher.await_window(timeout).await {
            Ok(window) => window,
            Err(err) => {
                log::warn!("{err}, forgetting {}", video.display());
                self.invalidate();
                return Err(RunError::WindowDiscoveryTimeout(timeout));
            }
        };

        let layer = DesktopLayerLocator::new(&self.windows)
            .locate()
            .map_err(RunError::DesktopLayerNotFound)?;
        let metrics = self
            .windows
            .screen_metrics()
            .map_err(RunError::ResizeFailed)?;
        WindowEmbedder::new(&self.windows).embed(window, layer, metrics)?;

        Ok(player.release())
    }

    /// The video to play, resetting the stored value if it is unusable.
    fn load_video(&self) -> Result<PathBuf, RunError> {
        match self.config.read() {
            Ok(config) => config
                .video_path()
                .map(Path::to_path_buf)
                .ok_or(RunError::ConfigInvalid(ConfigError::Empty)),
            Err(ConfigError::NotConfigured) => {
                log::warn!("no video configured yet");
                self.invalidate();
                Err(RunError::ConfigInvalid(ConfigError::Empty))
            }
            Err(err @ ConfigError::Invalid(_)) => {
                log::warn!("{err}, resetting configuration");
                self.invalidate();
                Err(RunError::ConfigInvalid(err))
            }
            Err(err) => Err(RunError::ConfigInvalid(err)),
        }
    }

    fn invalidate(&self) {
        if let Err(err) = self.config.clear() {
            log::error!("{err}");
        }
    }
}
