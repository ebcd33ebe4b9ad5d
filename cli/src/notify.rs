//! Blocking notifications for the user, who usually started us from Explorer and has no console.

pub const APP_NAME: &str = "VidWall";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Caption shown on the notification.
#[must_use]
pub fn caption(title: &str) -> String {
    format!("{APP_NAME} - {title}")
}

/// Shows `text` and waits for the user to dismiss it.
#[cfg(windows)]
pub fn show(title: &str, text: &str, level: Level) {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        MB_ICONERROR, MB_ICONINFORMATION, MB_OK, MessageBoxW,
    };
    use windows::core::HSTRING;

    let icon = match level {
        Level::Info => MB_ICONINFORMATION,
        Level::Error => MB_ICONERROR,
    };
    // SAFETY: both strings outlive the call, no owner window.
    unsafe {
        MessageBoxW(
            HWND::default(),
            &HSTRING::from(text),
            &HSTRING::from(caption(title)),
            MB_OK | icon,
        );
    }
}

#[cfg(not(windows))]
pub fn show(title: &str, text: &str, level: Level) {
    match level {
        Level::Info => log::info!("{}: {text}", caption(title)),
        Level::Error => log::error!("{}: {text}", caption(title)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getting_caption() {
        assert_eq!(caption("Error"), "VidWall - Error");
    }
}
