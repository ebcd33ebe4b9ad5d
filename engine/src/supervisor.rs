//! Keeps at most one player running.
//!
//! Before a new player is started, every running instance of the same executable is killed.
//! The next run is responsible for stopping the player this run leaves behind.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use sysinfo::{Pid, ProcessesToUpdate, System};
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum SuperviseError {
    #[error("cannot list running processes")]
    CheckFailed,
    #[error("cannot kill process {0}")]
    KillFailed(u32),
    #[error("`{0}` not found in PATH")]
    NotFound(String),
}

/// What [`ProcessSupervisor::stop`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No instance was running.
    NothingToStop,
    /// This many instances were killed.
    Stopped(usize),
}

/// Access to the running processes.
pub trait ProcessTable {
    /// Process ids whose executable image is exactly `image`.
    ///
    /// # Errors
    /// Returns [`SuperviseError::CheckFailed`] if the processes cannot be listed.
    fn find(&mut self, image: &str) -> Result<Vec<u32>, SuperviseError>;

    /// Forcibly terminates a process, returns whether that succeeded.
    fn kill(&mut self, pid: u32) -> bool;
}

impl<T: ProcessTable + ?Sized> ProcessTable for &mut T {
    fn find(&mut self, image: &str) -> Result<Vec<u32>, SuperviseError> {
        (**self).find(image)
    }

    fn kill(&mut self, pid: u32) -> bool {
        (**self).kill(pid)
    }
}

/// The processes of this machine.
pub struct SystemProcesses {
    system: System,
}

impl SystemProcesses {
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProcesses {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcesses {
    fn find(&mut self, image: &str) -> Result<Vec<u32>, SuperviseError> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);
        Ok(self
            .system
            .processes_by_exact_name(OsStr::new(image))
            .map(|process| process.pid().as_u32())
            .collect())
    }

    fn kill(&mut self, pid: u32) -> bool {
        self.system
            .process(Pid::from_u32(pid))
            .is_some_and(sysinfo::Process::kill)
    }
}

pub struct ProcessSupervisor<T: ProcessTable> {
    table: T,
    executable: String,
}

impl<T: ProcessTable> ProcessSupervisor<T> {
    /// Supervises the executable called `executable`, given without extension.
    pub fn new(table: T, executable: &str) -> Self {
        Self {
            table,
            executable: executable.to_string(),
        }
    }

    /// Image name of the supervised executable as the process list shows it.
    #[must_use]
    pub fn image(&self) -> String {
        format!("{}{}", self.executable, env::consts::EXE_SUFFIX)
    }

    /// Kills every running instance of the executable.
    ///
    /// Calling this when nothing runs is fine and returns [`StopOutcome::NothingToStop`].
    ///
    /// # Errors
    /// - [`SuperviseError::CheckFailed`] if the processes cannot be listed.
    /// - [`SuperviseError::KillFailed`] if an instance survives the kill.
    pub fn stop(&mut self) -> Result<StopOutcome, SuperviseError> {
        let image = self.image();
        let running = self.table.find(&image)?;
        if running.is_empty() {
            log::info!("no `{image}` processes found");
            return Ok(StopOutcome::NothingToStop);
        }
        for &pid in &running {
            // It may have exited on its own since it was listed
            if !self.table.kill(pid) && self.table.find(&image)?.contains(&pid) {
                log::error!("failed to kill `{image}` (pid {pid})");
                return Err(SuperviseError::KillFailed(pid));
            }
        }
        log::info!("killed {} `{image}` process(es)", running.len());
        Ok(StopOutcome::Stopped(running.len()))
    }

    /// Resolves the executable through `$PATH`.
    ///
    /// # Errors
    /// Returns [`SuperviseError::NotFound`] if it is not installed.
    pub fn locate(&self) -> Result<PathBuf, SuperviseError> {
        let found = locate_executable(
            &self.executable,
            env::var_os("PATH"),
            env::var_os("PATHEXT"),
        );
        match found {
            Some(path) => {
                log::info!("`{}` found at {}", self.executable, path.display());
                Ok(path)
            }
            None => Err(SuperviseError::NotFound(self.executable.clone())),
        }
    }
}

/// Searches `search_path` for an executable `name`.
///
/// On Windows a name without extension is tried with every extension listed in `extensions`
/// (the `PATHEXT` format) instead, `.EXE` is assumed when none are given.
pub fn locate_executable(
    name: &str,
    search_path: Option<OsString>,
    extensions: Option<OsString>,
) -> Option<PathBuf> {
    let candidates = candidate_names(name, extensions.as_deref());
    env::split_paths(&search_path?)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates.iter().map(move |file| dir.join(file)))
        .find(|path| is_executable(path))
}

fn candidate_names(name: &str, extensions: Option<&OsStr>) -> Vec<String> {
    if !cfg!(windows) || Path::new(name).extension().is_some() {
        return vec![name.to_string()];
    }
    // An extensionless file of the same name is never something Windows can start
    let extensions = extensions.map_or_else(
        || String::from(".EXE"),
        |value| value.to_string_lossy().to_string(),
    );
    extensions
        .split(';')
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!("{name}{}", ext.to_lowercase()))
        .collect()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
