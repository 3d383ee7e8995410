//! Command-line flags and the non-interactive modes.

use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::io::{self, Write};
use websh_client::RemoteExecutor;
use websh_core::{APP_NAME, Outcome, version_line};

#[derive(Debug, Parser)]
#[command(name = APP_NAME)]
#[command(about = "Interactive prompt for the websh remote shell", long_about = None)]
#[command(override_usage = "websh-prompt [OPTIONS]")]
pub struct Cli {
    /// Show version
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// Test websh server status
    #[arg(short = 't', long = "test")]
    pub test: bool,

    /// Positional arguments are accepted by the parser only to be rejected.
    #[arg(hide = true)]
    pub args: Vec<String>,
}

/// What the process was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ShowVersion,
    Ping,
    Interactive,
}

impl Cli {
    /// Picks the mode. `--version` wins over `--test`, and both are honored
    /// before stray positional arguments are rejected.
    pub fn mode(&self) -> Result<Mode, Outcome> {
        if self.version {
            return Ok(Mode::ShowVersion);
        }
        if self.test {
            return Ok(Mode::Ping);
        }
        if !self.args.is_empty() {
            tracing::error!("Too many arguments.");
            return Err(Outcome::ArgumentError);
        }
        Ok(Mode::Interactive)
    }
}

/// Parses `args` (including the program name). On `Err` the caller exits
/// with the returned outcome; `--help` is reported as [`Outcome::Ok`].
pub fn parse_mode<I, T>(args: I) -> Result<Mode, Outcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => cli.mode(),
        Err(e) => {
            let outcome = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Outcome::Ok,
                _ => Outcome::ArgumentError,
            };
            if let Err(print_err) = e.print() {
                tracing::debug!("Failed to print usage: {}", print_err);
            }
            if outcome != Outcome::Ok {
                tracing::error!("Argument parsing failed.");
            }
            Err(outcome)
        }
    }
}

pub fn print_version(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", version_line())
}

/// Performs one liveness check and prints the reported status.
pub async fn ping_once<X: RemoteExecutor>(executor: &X, out: &mut dyn Write) -> Outcome {
    match executor.ping().await {
        Ok(result) => {
            if let Err(e) = writeln!(out, "{}", result.status) {
                tracing::debug!("Failed to write ping status: {}", e);
            }
            if result.is_ok() {
                Outcome::Ok
            } else {
                tracing::error!("websh server reported status {:?}", result.status);
                Outcome::PingFailed
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            Outcome::PingFailed
        }
    }
}
