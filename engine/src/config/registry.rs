//! Registry storage under `HKEY_CURRENT_USER`.

use std::io::ErrorKind;

use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, KEY_QUERY_VALUE};

use super::{ConfigError, Storage};

/// Key holding the configuration.
pub const APP_KEY: &str = r"Software\VidWall";
/// Value holding the video path.
pub const VIDEO_PATH_VALUE: &str = "VideoPath";

#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryStorage;

impl Storage for RegistryStorage {
    fn load(&self) -> Result<Option<String>, ConfigError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key = match hkcu.open_subkey_with_flags(APP_KEY, KEY_QUERY_VALUE) {
            Ok(key) => key,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ConfigError::Storage(err.to_string())),
        };
        match key.get_value::<String, _>(VIDEO_PATH_VALUE) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ConfigError::Storage(err.to_string())),
        }
    }

    fn save(&self, value: &str) -> Result<(), ConfigError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let (key, _) = hkcu
            .create_subkey(APP_KEY)
            .map_err(|err| ConfigError::Storage(err.to_string()))?;
        key.set_value(VIDEO_PATH_VALUE, &value)
            .map_err(|err| ConfigError::Storage(err.to_string()))
    }
}
