//! Binary entrypoint for the `appgen` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env is fine; settings fall back to the environment and defaults.
    let _ = dotenvy::dotenv();

    // Recording and replay are handled in commands::dispatch via APPGEN_RECORD / APPGEN_REPLAY.
    match appgen::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
