use thiserror::Error;
use vidwall_engine::{ConfigError, RunError, SuperviseError};

#[derive(Debug, PartialEq, Error)]
pub enum CliError {
    #[error("{0}")]
    Run(#[from] RunError),
    #[error("invalid path: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Supervise(#[from] SuperviseError),
    #[error("cannot find the path of this program: {0}")]
    CurrentExe(String),
    #[error("cannot update the context menu: {0}")]
    ContextMenu(String),
    #[error("$APPDATA is not set")]
    NoAppData,
    #[error("cannot create the startup shortcut: {0}")]
    Shortcut(String),
    #[error("the startup shortcut does not exist")]
    ShortcutMissing,
    #[error("cannot remove the startup shortcut: {0}")]
    RemoveShortcut(String),
    #[error("cannot run as administrator: {0}")]
    Elevation(String),
    #[error("cannot find where to store the configuration")]
    NoConfigDir,
    #[error("Windows {major}.{minor} is older than Windows 8")]
    WindowsTooOld { major: u32, minor: u32 },
    #[error("cannot read the Windows version: {0}")]
    WindowsVersion(String),
    #[error("not supported on this platform")]
    Unsupported,
}
