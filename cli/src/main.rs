//! `vidwall` entry
//!
//! Sets a video as the desktop background. The video is stored, so running without arguments
//! plays the last one again, which is what the startup shortcut does.

mod cli;
mod error;
mod notify;
mod shell;
mod startup;
mod version;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use vidwall_engine::{Mpv, PlayerBackend, ProcessSupervisor, StopOutcome, SystemProcesses};

use crate::cli::{Action, Cli};
use crate::error::CliError;
use crate::notify::Level;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = setup_logger(cli.verbose) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            notify::show("Error", &err.to_string(), Level::Error);
            ExitCode::FAILURE
        }
    }
}

fn setup_logger(verbose: bool) -> Result<(), fern::InitError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                message
            ));
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    match cli.action() {
        Action::Check => {
            check();
            Ok(())
        }
        Action::Quit => quit(),
        Action::Install => {
            let exe = current_exe()?;
            if !shell::is_elevated() {
                return shell::relaunch_elevated(
                    &exe,
                    shell::forwarded_args(std::env::args()),
                );
            }
            shell::install_context_menu(&exe)?;
            notify::show(
                "Success",
                "Context menu entries created for video files.",
                Level::Info,
            );
            Ok(())
        }
        Action::Uninstall => {
            if !shell::is_elevated() {
                return shell::relaunch_elevated(
                    &current_exe()?,
                    shell::forwarded_args(std::env::args()),
                );
            }
            shell::uninstall_context_menu()?;
            notify::show(
                "Success",
                "Context menu entries removed from video files.",
                Level::Info,
            );
            Ok(())
        }
        Action::EnableStartup => {
            startup::enable(&current_exe()?)?;
            notify::show("Success", "Added to startup.", Level::Info);
            Ok(())
        }
        Action::DisableStartup => {
            startup::disable()?;
            notify::show("Success", "Removed from startup.", Level::Info);
            Ok(())
        }
        Action::Play(video) => play(video, cli.timeout),
    }
}

fn current_exe() -> Result<PathBuf, CliError> {
    std::env::current_exe().map_err(|err| CliError::CurrentExe(err.to_string()))
}

fn supervisor() -> ProcessSupervisor<SystemProcesses> {
    ProcessSupervisor::new(SystemProcesses::new(), Mpv.executable())
}

/// Reports whether the player can be found, with install instructions if not.
fn check() {
    match supervisor().locate() {
        Ok(path) => println!("mpv is installed at {}", path.display()),
        Err(err) => {
            println!("Error: {err}.");
            println!("Your system does not have a usable video player (mpv) installed.");
            println!("Please install it using the following command:");
            println!("$ choco install mpv");
        }
    }
}

fn quit() -> Result<(), CliError> {
    match supervisor().stop()? {
        StopOutcome::NothingToStop => println!("mpv is not running"),
        StopOutcome::Stopped(count) => println!("stopped {count} mpv process(es)"),
    }
    Ok(())
}

#[cfg(windows)]
fn play(video: Option<&str>, timeout: Duration) -> Result<(), CliError> {
    use vidwall_engine::{ConfigStore, RegistryStorage, Session, Win32};

    version::check()?;
    let storage = RegistryStorage;
    if let Some(video) = video {
        ConfigStore::new(&storage).write(video)?;
    }
    let mut session = Session::new(Win32, SystemProcesses::new(), &storage, Mpv);
    let pid = smol::block_on(session.run(timeout))?;
    log::info!("playing as the desktop background (pid {pid})");
    Ok(())
}

#[cfg(not(windows))]
fn play(video: Option<&str>, _timeout: Duration) -> Result<(), CliError> {
    use vidwall_engine::{ConfigStore, FileStorage};

    // The video can still be stored, only playing it needs the Windows shell
    let storage = FileStorage::in_config_dir().ok_or(CliError::NoConfigDir)?;
    if let Some(video) = video {
        ConfigStore::new(&storage).write(video)?;
    }
    Err(CliError::Unsupported)
}
