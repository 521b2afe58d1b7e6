//! Core library entry for the `oneshot` CLI.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod ports;
pub mod runner;

use clap::error::ErrorKind;
use clap::Parser;

pub use error::RunError;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print to stdout and count as success.
///
/// # Errors
///
/// Returns a [`RunError`] when argument parsing fails or any step of the
/// prompt/completion pass fails.
pub fn run<I, T>(args: I) -> Result<(), RunError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(RunError::Usage(err.to_string().trim_end().to_string())),
    };
    runner::dispatch(&cli)
}
