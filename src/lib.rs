//! Core library entry for the `cshlink` CLI.
//!
//! Given the URL of a page in generated documentation output, `cshlink`
//! finds the site's alias manifest, looks the page up, and produces a
//! stable `Default.<ext>#cshid=<id>` link to share.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod handoff;
pub mod locate;
pub mod logging;
pub mod manifest;
pub mod paths;
pub mod ports;
pub mod share;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // Help and version output are successful runs and go to stdout.
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| e.to_string());
        }
        Err(err) => return Err(err.to_string()),
    };
    logging::init(cli.verbose);
    commands::dispatch(&cli.command)
}
