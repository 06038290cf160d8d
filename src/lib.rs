//! Core library for the `appgen` CLI.
//!
//! Describe an application, have the generator backend scaffold it, refine
//! it by chatting with the backend assistant, and export it as JSON or ZIP.
//! All state lives in one JSON document under the state directory.

pub mod adapters;
pub mod cassette;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod generator;
pub mod logging;
pub mod ports;
pub mod project;
pub mod state;
pub mod upload;
pub mod workspace;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing, settings resolution or
/// command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    let settings = config::Settings::load(cli.config.as_deref())?;
    logging::init(&settings.log);
    commands::dispatch(&cli.command, &settings)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["appgen", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_reports_missing_config_file() {
        let err = run(["appgen", "--config", "/nonexistent/appgen.yaml", "status"]).unwrap_err();
        assert!(err.contains("Failed to read config file"));
    }
}
