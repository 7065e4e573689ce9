//! Binary entrypoint for the `cshlink` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A local .env may carry CSHLINK_* settings.
    let _ = dotenvy::dotenv();

    // Recording and replay are handled in commands::dispatch via
    // CSHLINK_RECORD=<file> and CSHLINK_REPLAY=<file>.
    match cshlink::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
