//! Plain file storage, used where there is no registry.

use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ConfigError, Storage};

/// Stores the video path as the whole content of a single file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage at `video_path` inside the user's configuration directory.
    ///
    /// Returns `None` if neither `$XDG_CONFIG_HOME` nor `$HOME` is set.
    #[must_use]
    pub fn in_config_dir() -> Option<Self> {
        sys_config_dir().map(|dir| Self::new(dir.join("video_path")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<String>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content.trim_end_matches(['\r', '\n']).to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ConfigError::Storage(err.to_string())),
        }
    }

    fn save(&self, value: &str) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| ConfigError::Storage(err.to_string()))?;
        }
        std::fs::write(&self.path, value).map_err(|err| ConfigError::Storage(err.to_string()))
    }
}

fn sys_config_dir() -> Option<PathBuf> {
    let default;
    if let Ok(value) = env::var("XDG_CONFIG_HOME") {
        default = PathBuf::from(value + "/vidwall");
    } else if let Ok(value) = env::var("HOME") {
        default = PathBuf::from(value + "/.config/vidwall");
    } else {
        return None;
    }
    Some(default)
}
