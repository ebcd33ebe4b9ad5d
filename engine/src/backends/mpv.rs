//! Generates the command summoning `mpv`.

use smol::process::{Command, Stdio};
use std::ffi::OsString;
use std::path::Path;

use crate::backends::PlayerBackend;

/// Fixed rendering flags: fullscreen, endless loop, no sound, hardware decoding and
/// low-latency, display-synchronised scaling.
pub const MPV_FLAGS: [&str; 11] = [
    "--fs",
    "--loop",
    "--mute=yes",
    "--panscan=1.0",
    "--hwdec=auto",
    "--profile=low-latency",
    "--framedrop=no",
    "--scale=bilinear",
    "--dscale=bilinear",
    "--video-sync=display-resample",
    "--video-output-levels=full",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct Mpv;

impl Mpv {
    /// Arguments passed to `mpv`, the video is always last.
    #[must_use]
    pub fn args(video: &Path) -> Vec<OsString> {
        MPV_FLAGS
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(video.as_os_str().to_owned()))
            .collect()
    }
}

impl PlayerBackend for Mpv {
    fn executable(&self) -> &str {
        "mpv"
    }

    fn window_class(&self) -> &str {
        "mpv"
    }

    fn command(&self, program: &Path, video: &Path) -> Command {
        let mut sys_cmd = Command::new(program);
        sys_cmd
            .args(Self::args(video))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(windows)]
        {
            use smol::process::windows::CommandExt;
            use windows::Win32::System::Threading::CREATE_NO_WINDOW;
            sys_cmd.creation_flags(CREATE_NO_WINDOW.0);
        }
        sys_cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn getting_args() {
        let args = Mpv::args(&PathBuf::from("/videos/ocean.mp4"));
        assert_eq!(args.len(), 12);
        assert_eq!(args.first(), Some(&OsString::from("--fs")));
        assert_eq!(args.last(), Some(&OsString::from("/videos/ocean.mp4")));
        assert_eq!(
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" "),
            "--fs --loop --mute=yes --panscan=1.0 --hwdec=auto --profile=low-latency \
             --framedrop=no --scale=bilinear --dscale=bilinear --video-sync=display-resample \
             --video-output-levels=full /videos/ocean.mp4"
        );
    }

    #[test]
    fn video_with_spaces_is_one_argument() {
        let args = Mpv::args(&PathBuf::from("/videos/my ocean.mp4"));
        assert_eq!(args.last(), Some(&OsString::from("/videos/my ocean.mp4")));
        assert_eq!(args.len(), 12);
    }
}
