//! `appgen files` commands.

use crate::cli::FilesCommand;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::upload::UploadOutcome;
use crate::workspace::Workspace;

/// Execute a `files` subcommand.
///
/// # Errors
///
/// Returns an error string if a file cannot be attached.
pub async fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    command: &FilesCommand,
) -> Result<(), String> {
    let mut ws = Workspace::open(ctx, &settings.state_dir);

    match command {
        FilesCommand::Add { paths } => {
            for path in paths {
                let outcome = ws
                    .add_file(path)
                    .await
                    .map_err(|e| format!("Failed to attach {}: {e}", path.display()))?;
                match outcome {
                    UploadOutcome::Added => println!("Attached {}", path.display()),
                    UploadOutcome::Duplicate => {
                        eprintln!("{} is already attached.", path.display());
                    }
                }
            }
        }
        FilesCommand::Remove { index } => match ws.remove_file(*index) {
            Some(file) => println!("Detached {}", file.name),
            None => eprintln!("No attached file at position {index}."),
        },
        FilesCommand::List => {
            let files = &ws.state().uploads.files;
            if files.is_empty() {
                println!("No files attached.");
            }
            for (index, file) in files.iter().enumerate() {
                println!("{index:>3}  {}  {} bytes  {}", file.name, file.size, file.type_label());
            }
        }
        FilesCommand::Clear => {
            ws.clear_files();
            println!("Detached all files.");
        }
    }
    Ok(())
}
