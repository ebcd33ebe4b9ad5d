//! Spawns the player and waits for its window.
//!
//! The player is never awaited: once spawned it runs on its own, and the only thing waited on
//! is its top-level window. Discovery goes `Spawned -> Polling -> {Found, TimedOut}`, with a
//! hard budget of `timeout / interval` window lookups.

use std::path::{Path, PathBuf};
use std::time::Duration;

use smol::process::Child;
use thiserror::Error;

use crate::backends::PlayerBackend;
use crate::platform::{WindowHandle, WindowSystem};

/// Delay between two window lookups.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long the player gets to show its window.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, PartialEq, Error)]
pub enum LaunchError {
    #[error("cannot spawn `{program}`: {reason}")]
    SpawnFailed { program: PathBuf, reason: String },
    #[error("player window did not show up within {0:?}")]
    Timeout(Duration),
}

/// Progress of the window discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Nothing has been looked up yet.
    Spawned,
    /// This many lookups found nothing.
    Polling(u32),
    Found(WindowHandle),
    TimedOut,
}

impl Discovery {
    /// Moves on after a lookup that returned `seen`, with `budget` lookups allowed in total.
    #[must_use]
    pub fn advance(self, seen: Option<WindowHandle>, budget: u32) -> Self {
        let done = match self {
            Self::Found(_) | Self::TimedOut => return self,
            Self::Spawned => 1,
            Self::Polling(attempts) => attempts + 1,
        };
        match seen {
            Some(window) => Self::Found(window),
            None if done >= budget => Self::TimedOut,
            None => Self::Polling(done),
        }
    }
}

/// Number of lookups fitting in `timeout`, at least one.
#[must_use]
pub fn poll_budget(timeout: Duration, interval: Duration) -> u32 {
    let interval = interval.as_micros().max(1);
    u32::try_from(timeout.as_micros() / interval)
        .unwrap_or(u32::MAX)
        .max(1)
}

/// A spawned player.
///
/// Dropping it does not stop the player.
#[derive(Debug)]
pub struct PlayerProcess {
    pid: u32,
    child: Child,
}

impl PlayerProcess {
    /// Lets the player run on its own, returning its pid.
    #[must_use]
    pub fn release(self) -> u32 {
        drop(self.child);
        self.pid
    }
}

pub struct PlayerLauncher<'a, W: WindowSystem, B: PlayerBackend> {
    windows: &'a W,
    backend: &'a B,
    program: PathBuf,
    interval: Duration,
}

impl<'a, W: WindowSystem, B: PlayerBackend> PlayerLauncher<'a, W, B> {
    /// Launcher for the player installed at `program`.
    pub fn new(windows: &'a W, backend: &'a B, program: PathBuf) -> Self {
        Self {
            windows,
            backend,
            program,
            interval: POLL_INTERVAL,
        }
    }

    /// Overrides [`POLL_INTERVAL`].
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Starts the player on `video`, detached.
    ///
    /// # Errors
    /// Returns [`LaunchError::SpawnFailed`] if the OS cannot start the program.
    pub fn spawn(&self, video: &Path) -> Result<PlayerProcess, LaunchError> {
        let mut sys_cmd = self.backend.command(&self.program, video);
        let child = sys_cmd.spawn().map_err(|err| LaunchError::SpawnFailed {
            program: self.program.clone(),
            reason: err.to_string(),
        })?;
        let pid = child.id();
        log::info!("spawned `{}` (pid {pid})", self.program.display());
        Ok(PlayerProcess { pid, child })
    }

    /// Polls for the player's window until it appears or `timeout` runs out.
    ///
    /// # Errors
    /// Returns [`LaunchError::Timeout`] once the lookup budget is spent. The configured video is
    /// then most likely something the player cannot decode.
    pub async fn await_window(&self, timeout: Duration) -> Result<WindowHandle, LaunchError> {
        let budget = poll_budget(timeout, self.interval);
        let class = self.backend.window_class();
        let mut state = Discovery::Spawned;
        loop {
            let seen = self.windows.find_window(Some(class), None);
            state = state.advance(seen, budget);
            match state {
                Discovery::Found(window) => {
                    log::info!("player window {window:?} found");
                    return Ok(window);
                }
                Discovery::TimedOut => {
                    log::error!("no `{class}` window after {budget} lookups");
                    return Err(LaunchError::Timeout(timeout));
                }
                Discovery::Spawned | Discovery::Polling(_) => {
                    smol::Timer::after(self.interval).await;
                }
            }
        }
    }
}
