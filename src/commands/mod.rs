//! Command dispatch and handlers.

pub mod chat;
pub mod files;
pub mod generate;
pub mod project;
pub mod status;

use std::env;
use std::path::PathBuf;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Settings;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// `APPGEN_REPLAY=<cassette>` serves clock and backend from a cassette.
/// `APPGEN_RECORD=<dir>` records them to per-port cassette files in a new
/// directory under `<dir>`.
///
/// # Errors
///
/// Returns an error string if the context cannot be built or the selected
/// command handler fails.
pub fn dispatch(command: &Command, settings: &Settings) -> Result<(), String> {
    let (ctx, session) = if let Ok(path) = env::var("APPGEN_REPLAY") {
        (ServiceContext::replaying(&PathBuf::from(path))?, None)
    } else if let Ok(path) = env::var("APPGEN_RECORD") {
        let (ctx, session) = ServiceContext::recording_at(settings, PathBuf::from(path))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(settings), None)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let result = runtime.block_on(dispatch_with_context(command, &ctx, settings));

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
) -> Result<(), String> {
    match command {
        Command::Generate { description, features } => {
            generate::run(ctx, settings, description.as_deref(), features.as_deref()).await
        }
        Command::Project(sub) => project::run(ctx, settings, sub).await,
        Command::Files(sub) => files::run(ctx, settings, sub).await,
        Command::Chat(sub) => chat::run(ctx, settings, sub).await,
        Command::Status => {
            status::run(ctx, settings);
            Ok(())
        }
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
