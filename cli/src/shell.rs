//! Explorer integration: the context menu entry on videos, and running as administrator.
//!
//! The entries live under `HKEY_CLASSES_ROOT\SystemFileAssociations`, which only an
//! administrator may write.

#![cfg_attr(not(windows), allow(dead_code))]

use std::path::Path;

use crate::error::CliError;

/// Extensions that get the context menu entry.
pub const VIDEO_EXTENSIONS: [&str; 7] = [".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"];
/// Label of the entry.
pub const MENU_LABEL: &str = "Set as desktop background";
const MENU_VERB: &str = "SetAsDesktopBackground";

/// Key of the entry for files with extension `ext`, relative to `HKEY_CLASSES_ROOT`.
#[must_use]
pub fn menu_key(ext: &str) -> String {
    format!(r"SystemFileAssociations\{ext}\shell\{MENU_VERB}")
}

/// Command Explorer runs on the selected file.
#[must_use]
pub fn menu_command(exe: &Path) -> String {
    format!("\"{}\" --set \"%1\"", exe.display())
}

/// The arguments of this invocation without the program name, as given to
/// [`relaunch_elevated`].
#[must_use]
pub fn forwarded_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().skip(1).collect()
}

/// Quotes arguments for a Windows command line.
#[must_use]
pub fn join_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.is_empty() || arg.contains([' ', '\t', '"']) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Adds the entry for every video extension.
///
/// # Errors
/// Returns [`CliError::ContextMenu`] on the first key that cannot be written.
#[cfg(windows)]
pub fn install_context_menu(exe: &Path) -> Result<(), CliError> {
    use winreg::RegKey;
    use winreg::enums::HKEY_CLASSES_ROOT;

    let classes = RegKey::predef(HKEY_CLASSES_ROOT);
    let command = menu_command(exe);
    for ext in VIDEO_EXTENSIONS {
        let written = classes.create_subkey(menu_key(ext)).and_then(|(key, _)| {
            key.set_value("", &MENU_LABEL)?;
            let (command_key, _) = key.create_subkey("command")?;
            command_key.set_value("", &command)
        });
        written.map_err(|err| CliError::ContextMenu(format!("{ext}: {err}")))?;
        log::info!("context menu entry added for {ext}");
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn install_context_menu(_exe: &Path) -> Result<(), CliError> {
    Err(CliError::Unsupported)
}

/// Removes the entry from every video extension, skipping the ones without it.
///
/// # Errors
/// Returns [`CliError::ContextMenu`] if an existing entry cannot be deleted.
#[cfg(windows)]
pub fn uninstall_context_menu() -> Result<(), CliError> {
    use std::io::ErrorKind;
    use winreg::RegKey;
    use winreg::enums::HKEY_CLASSES_ROOT;

    let classes = RegKey::predef(HKEY_CLASSES_ROOT);
    for ext in VIDEO_EXTENSIONS {
        match classes.delete_subkey_all(menu_key(ext)) {
            Ok(()) => log::info!("context menu entry removed for {ext}"),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no context menu entry for {ext}");
            }
            Err(err) => return Err(CliError::ContextMenu(format!("{ext}: {err}"))),
        }
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn uninstall_context_menu() -> Result<(), CliError> {
    Err(CliError::Unsupported)
}

/// Whether this process runs with administrator rights.
#[cfg(windows)]
#[must_use]
pub fn is_elevated() -> bool {
    // SAFETY: no arguments, only reads the process token.
    unsafe { windows::Win32::UI::Shell::IsUserAnAdmin().as_bool() }
}

#[cfg(not(windows))]
#[must_use]
pub fn is_elevated() -> bool {
    false
}

/// Starts this program again as administrator, with `args`. The caller should exit afterwards.
///
/// # Errors
/// Returns [`CliError::Elevation`] if the user declined or the program cannot be started.
#[cfg(windows)]
pub fn relaunch_elevated<I, S>(exe: &Path, args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
    use windows::core::{HSTRING, PCWSTR, w};

    let file = HSTRING::from(exe.as_os_str());
    let parameters = HSTRING::from(join_args(args));
    // SAFETY: every string outlives the call.
    let instance = unsafe {
        ShellExecuteW(
            HWND::default(),
            w!("runas"),
            &file,
            &parameters,
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };
    // Anything up to 32 is an error code
    let code = instance.0 as isize;
    if code <= 32 {
        return Err(CliError::Elevation(format!("ShellExecuteW returned {code}")));
    }
    log::info!("relaunched as administrator");
    Ok(())
}

#[cfg(not(windows))]
pub fn relaunch_elevated<I, S>(_exe: &Path, _args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Err(CliError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getting_menu_key() {
        assert_eq!(
            menu_key(".mkv"),
            r"SystemFileAssociations\.mkv\shell\SetAsDesktopBackground"
        );
    }

    #[test]
    fn getting_menu_command() {
        let exe = Path::new(r"C:\Program Files\VidWall\vidwall.exe");
        assert_eq!(
            menu_command(exe),
            r#""C:\Program Files\VidWall\vidwall.exe" --set "%1""#
        );
    }

    #[test]
    fn joining_args() {
        assert_eq!(join_args(["--install"]), "--install");
        assert_eq!(
            join_args(["--set", r"C:\my videos\sea.mp4", ""]),
            r#"--set "C:\my videos\sea.mp4" """#
        );
        assert_eq!(join_args(Vec::<String>::new()), "");
    }

    #[test]
    fn relaunch_keeps_options() {
        let args = ["vidwall", "--install", "-v", "--timeout", "2s"].map(String::from);
        let forwarded = forwarded_args(args);
        assert_eq!(forwarded, vec!["--install", "-v", "--timeout", "2s"]);
        assert_eq!(join_args(&forwarded), "--install -v --timeout 2s");
        assert!(forwarded_args(Vec::new()).is_empty());
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_elsewhere() {
        assert!(!is_elevated());
        assert_eq!(uninstall_context_menu(), Err(CliError::Unsupported));
        assert_eq!(
            relaunch_elevated(Path::new("vidwall"), ["--install"]),
            Err(CliError::Unsupported)
        );
    }
}
