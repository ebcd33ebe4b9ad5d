//! The persisted configuration: a single video path.
//!
//! The stored value is either empty or an absolute path to an existing file. Anything else
//! found in storage is reported as [`ConfigError::Invalid`] and must be cleared by the caller,
//! it is never handed to the player.

mod file;
#[cfg(windows)]
mod registry;

pub use file::FileStorage;
#[cfg(windows)]
pub use registry::RegistryStorage;

use std::path::Path;
use thiserror::Error;

/// Where the configuration value lives between runs.
pub trait Storage {
    /// Loads the stored value, `None` if it has never been written.
    ///
    /// # Errors
    /// Returns [`ConfigError::Storage`] if the backing store cannot be read.
    fn load(&self) -> Result<Option<String>, ConfigError>;

    /// Replaces the stored value.
    ///
    /// # Errors
    /// Returns [`ConfigError::Storage`] if the backing store cannot be written.
    fn save(&self, value: &str) -> Result<(), ConfigError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn load(&self) -> Result<Option<String>, ConfigError> {
        (**self).load()
    }

    fn save(&self, value: &str) -> Result<(), ConfigError> {
        (**self).save(value)
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Nothing has ever been stored.
    #[error("no video has been configured")]
    NotConfigured,
    /// The stored value is empty, there is nothing to play.
    #[error("video path is empty")]
    Empty,
    /// The stored value does not pass validation.
    #[error("stored video path `{0}` is invalid")]
    Invalid(String),
    #[error("`{0}` is not an absolute path")]
    PathNotAbsolute(String),
    #[error("`{0}` does not exist")]
    PathNotFound(String),
    #[error("`{0}` is a directory")]
    PathIsDirectory(String),
    #[error("configuration storage failed: {0}")]
    Storage(String),
}

/// The configuration as read from [`Storage`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Configuration {
    video_path: String,
}

impl Configuration {
    /// The configured video, `None` when the configuration is empty.
    #[must_use]
    pub fn video_path(&self) -> Option<&Path> {
        (!self.video_path.is_empty()).then(|| Path::new(&self.video_path))
    }
}

/// Checks that `path` can be stored.
///
/// # Errors
/// The empty string is always accepted. Otherwise the path must be absolute, exist and not be a
/// directory.
pub fn validate_path(path: &str) -> Result<(), ConfigError> {
    if path.is_empty() {
        return Ok(());
    }
    let candidate = Path::new(path);
    if !candidate.is_absolute() {
        return Err(ConfigError::PathNotAbsolute(path.to_string()));
    }
    let metadata =
        std::fs::metadata(candidate).map_err(|_| ConfigError::PathNotFound(path.to_string()))?;
    if metadata.is_dir() {
        return Err(ConfigError::PathIsDirectory(path.to_string()));
    }
    Ok(())
}

/// Validating front of a [`Storage`].
///
/// Nothing is cached, every [`ConfigStore::read`] goes to the storage again.
pub struct ConfigStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ConfigStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Reads and validates the stored configuration.
    ///
    /// # Errors
    /// - [`ConfigError::NotConfigured`] if nothing was ever stored.
    /// - [`ConfigError::Invalid`] if the stored path fails validation. The caller should
    ///   [`ConfigStore::clear`] it.
    /// - [`ConfigError::Storage`] if the storage cannot be read.
    pub fn read(&self) -> Result<Configuration, ConfigError> {
        let Some(value) = self.storage.load()? else {
            return Err(ConfigError::NotConfigured);
        };
        if validate_path(&value).is_err() {
            return Err(ConfigError::Invalid(value));
        }
        Ok(Configuration { video_path: value })
    }

    /// Validates and persists a new video path, the empty string clears the configuration.
    ///
    /// A rejected path leaves the stored value untouched. If the storage fails halfway, the
    /// value is reset to empty.
    ///
    /// # Errors
    /// Returns the validation error, or [`ConfigError::Storage`] if persisting failed.
    pub fn write(&self, path: &str) -> Result<(), ConfigError> {
        validate_path(path)?;
        if let Err(err) = self.storage.save(path) {
            log::error!("failed to store video path: {err}");
            if !path.is_empty() && self.storage.save("").is_err() {
                log::error!("failed to reset video path");
            }
            return Err(err);
        }
        log::info!("video path set to `{path}`");
        Ok(())
    }

    /// Resets the configuration to empty.
    ///
    /// # Errors
    /// Returns [`ConfigError::Storage`] if the storage cannot be written.
    pub fn clear(&self) -> Result<(), ConfigError> {
        self.storage.save("")
    }
}
