//! cli parameters

use std::time::Duration;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Plays a video as the desktop background, behind the icons.",
    long_about = "Plays a video as the desktop background, behind the icons.\n\
                  Without any option, the last configured video is played."
)]
#[command(group(
    ArgGroup::new("action")
        .args(["check", "quit", "set", "install", "uninstall", "enable_startup", "disable_startup"])
))]
pub struct Cli {
    #[arg(long = "check", help = "Check that mpv is installed.")]
    pub check: bool,

    #[arg(long = "quit", help = "Stop the video currently playing.")]
    pub quit: bool,

    #[arg(
        long = "set",
        value_name = "FILE",
        help = "Set the video to play, then play it. The path must be absolute."
    )]
    pub set: Option<String>,

    #[arg(
        long = "install",
        help = "Add \"Set as desktop background\" to the context menu of videos (administrator)."
    )]
    pub install: bool,

    #[arg(
        long = "uninstall",
        help = "Remove the context menu entries (administrator)."
    )]
    pub uninstall: bool,

    #[arg(long = "enable-startup", help = "Play the video when logging in.")]
    pub enable_startup: bool,

    #[arg(long = "disable-startup", help = "Do not play the video when logging in.")]
    pub disable_startup: bool,

    #[arg(
        short = 't',
        long = "timeout",
        value_name = "DURATION",
        default_value = "5s",
        value_parser = parse_timeout,
        help = "How long mpv gets to show its window."
    )]
    pub timeout: Duration,

    #[arg(short = 'v', long = "verbose", help = "Print debug messages.")]
    pub verbose: bool,
}

/// What a single invocation does.
#[derive(Debug, PartialEq)]
pub enum Action<'a> {
    Check,
    Quit,
    Install,
    Uninstall,
    EnableStartup,
    DisableStartup,
    /// Play the stored video, after storing this one if given.
    Play(Option<&'a str>),
}

impl Cli {
    #[must_use]
    pub fn action(&self) -> Action<'_> {
        if self.check {
            Action::Check
        } else if self.quit {
            Action::Quit
        } else if self.install {
            Action::Install
        } else if self.uninstall {
            Action::Uninstall
        } else if self.enable_startup {
            Action::EnableStartup
        } else if self.disable_startup {
            Action::DisableStartup
        } else {
            Action::Play(self.set.as_deref())
        }
    }
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let duration = duration_str::parse(value).map_err(|err| err.to_string())?;
    if duration.is_zero() {
        return Err(String::from("timeout must be longer than zero"));
    }
    Ok(duration)
}
