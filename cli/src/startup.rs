//! Playing the video on login, through a shortcut in the user's Startup folder.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::CliError;
use crate::notify::APP_NAME;

/// The Startup folder of the user whose `%APPDATA%` is `appdata`.
///
/// # Errors
/// Returns [`CliError::NoAppData`] if `appdata` is missing or empty.
pub fn startup_dir(appdata: Option<OsString>) -> Result<PathBuf, CliError> {
    let appdata = appdata.filter(|value| !value.is_empty()).ok_or(CliError::NoAppData)?;
    Ok(PathBuf::from(appdata)
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
        .join("Startup"))
}

/// Where the shortcut goes.
///
/// # Errors
/// See [`startup_dir`].
pub fn shortcut_path(appdata: Option<OsString>) -> Result<PathBuf, CliError> {
    Ok(startup_dir(appdata)?.join(format!("{APP_NAME}.lnk")))
}

/// Deletes the shortcut at `path`.
///
/// # Errors
/// Returns [`CliError::ShortcutMissing`] if there is none, [`CliError::RemoveShortcut`] if it
/// cannot be deleted.
pub fn remove_shortcut(path: &Path) -> Result<(), CliError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::info!("removed {}", path.display());
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Err(CliError::ShortcutMissing),
        Err(err) => Err(CliError::RemoveShortcut(err.to_string())),
    }
}

/// Adds a shortcut to `exe` to the Startup folder.
///
/// # Errors
/// Returns [`CliError::NoAppData`] or [`CliError::Shortcut`].
#[cfg(windows)]
pub fn enable(exe: &Path) -> Result<(), CliError> {
    let shortcut = shortcut_path(std::env::var_os("APPDATA"))?;
    create_shortcut(exe, &shortcut).map_err(|err| CliError::Shortcut(err.to_string()))?;
    log::info!("created {}", shortcut.display());
    Ok(())
}

#[cfg(not(windows))]
pub fn enable(_exe: &Path) -> Result<(), CliError> {
    Err(CliError::Unsupported)
}

/// Removes the shortcut from the Startup folder.
///
/// # Errors
/// Returns [`CliError::NoAppData`], or the errors of [`remove_shortcut`].
pub fn disable() -> Result<(), CliError> {
    remove_shortcut(&shortcut_path(std::env::var_os("APPDATA"))?)
}

#[cfg(windows)]
fn create_shortcut(target: &Path, shortcut: &Path) -> windows::core::Result<()> {
    use windows::Win32::Foundation::TRUE;
    use windows::Win32::System::Com::{
        CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx,
        CoUninitialize, IPersistFile,
    };
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};
    use windows::core::{HSTRING, Interface};

    // SAFETY: COM is initialized for this thread before use and released after.
    unsafe {
        CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok()?;
        let saved = (|| {
            let link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)?;
            link.SetPath(&HSTRING::from(target.as_os_str()))?;
            if let Some(dir) = target.parent() {
                link.SetWorkingDirectory(&HSTRING::from(dir.as_os_str()))?;
            }
            link.SetDescription(&HSTRING::from(APP_NAME))?;
            link.SetIconLocation(&HSTRING::from(target.as_os_str()), 0)?;
            let file: IPersistFile = link.cast()?;
            file.Save(&HSTRING::from(shortcut.as_os_str()), TRUE)
        })();
        CoUninitialize();
        saved
    }
}
