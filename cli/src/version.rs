//! Windows version gate.
//!
//! The desktop shell only creates the layer behind the icons since Windows 8 (NT 6.2), older
//! shells ignore the message asking for it.

#![cfg_attr(not(windows), allow(dead_code))]

use crate::error::CliError;

/// Oldest supported NT version, as `(major, minor)`.
pub const MIN_VERSION: (u32, u32) = (6, 2);

/// Accepts NT `major.minor` if the shell is recent enough.
///
/// # Errors
/// Returns [`CliError::WindowsTooOld`] otherwise.
pub fn require_supported(major: u32, minor: u32) -> Result<(), CliError> {
    if (major, minor) < MIN_VERSION {
        return Err(CliError::WindowsTooOld { major, minor });
    }
    Ok(())
}

/// Checks the version of the running Windows.
///
/// # Errors
/// Returns [`CliError::WindowsVersion`] if it cannot be read, [`CliError::WindowsTooOld`] if
/// it is too old.
#[cfg(windows)]
pub fn check() -> Result<(), CliError> {
    use windows::Wdk::System::SystemServices::RtlGetVersion;
    use windows::Win32::System::SystemInformation::OSVERSIONINFOW;

    let mut info = OSVERSIONINFOW {
        dwOSVersionInfoSize: u32::try_from(size_of::<OSVERSIONINFOW>()).unwrap_or(u32::MAX),
        ..Default::default()
    };
    // SAFETY: `info` is a valid, sized `OSVERSIONINFOW` for the duration of the call.
    unsafe { RtlGetVersion(&raw mut info) }
        .ok()
        .map_err(|err| CliError::WindowsVersion(err.to_string()))?;
    log::debug!(
        "running on Windows {}.{}.{}",
        info.dwMajorVersion,
        info.dwMinorVersion,
        info.dwBuildNumber
    );
    require_supported(info.dwMajorVersion, info.dwMinorVersion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_8_and_later() {
        assert_eq!(require_supported(6, 2), Ok(()));
        assert_eq!(require_supported(6, 3), Ok(()));
        assert_eq!(require_supported(10, 0), Ok(()));
    }

    #[test]
    fn windows_7_and_earlier() {
        assert_eq!(
            require_supported(6, 1),
            Err(CliError::WindowsTooOld { major: 6, minor: 1 })
        );
        assert_eq!(
            require_supported(5, 1),
            Err(CliError::WindowsTooOld { major: 5, minor: 1 })
        );
        assert_eq!(
            require_supported(6, 1).unwrap_err().to_string(),
            "Windows 6.1 is older than Windows 8"
        );
    }
}
