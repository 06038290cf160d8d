//! `appgen project` commands.

use std::io::{BufRead, Write};

use crate::cli::ProjectCommand;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::export::ExportOutcome;
use crate::workspace::Workspace;

/// Execute a `project` subcommand.
///
/// # Errors
///
/// Returns an error string if the selected operation fails.
pub async fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    command: &ProjectCommand,
) -> Result<(), String> {
    let mut ws = Workspace::open(ctx, &settings.state_dir);

    match command {
        ProjectCommand::Show => show(&ws),
        ProjectCommand::Cat { path } => cat(&ws, path.as_deref())?,
        ProjectCommand::Select { path } => {
            ws.select_file(path).map_err(|e| e.to_string())?;
            println!("Selected {path}");
        }
        ProjectCommand::Reset { yes } => {
            let confirmed = *yes || confirm_on_stdin();
            if ws.reset_project(|| confirmed) {
                println!("Project reset to the default template.");
            } else {
                println!("Reset cancelled.");
            }
        }
        ProjectCommand::Import { file } => {
            let text = ctx
                .fs
                .read_to_string(file)
                .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
            let bound = ws.import_project_json(&text).await.map_err(|e| e.to_string())?;
            println!("Imported {} file(s).", ws.state().project.files.len());
            match bound {
                Some(project_id) => println!("Chat ready for project {project_id}."),
                None => eprintln!("Warning: the project could not be stored for chat."),
            }
        }
        ProjectCommand::Export => {
            let path = ws.export_project_json(&settings.out_dir).map_err(|e| e.to_string())?;
            println!("Exported to {}", path.display());
        }
        ProjectCommand::ExportZip { name } => {
            let outcome = ws
                .export_zip(name.as_deref(), &settings.out_dir, settings.export_stagger)
                .await
                .map_err(|e| format!("Export failed: {e}"))?;
            match outcome {
                ExportOutcome::Archive(path) => println!("Exported to {}", path.display()),
                ExportOutcome::IndividualFiles(paths) => {
                    eprintln!("ZIP export failed; wrote files individually.");
                    for path in paths {
                        println!("{}", path.display());
                    }
                }
            }
        }
        ProjectCommand::Fetch => {
            let count = ws.fetch_remote_project().await.map_err(|e| e.to_string())?;
            println!("Fetched {count} file(s) from the server.");
        }
    }
    Ok(())
}

fn show(ws: &Workspace<'_>) {
    let project = &ws.state().project;
    if project.files.is_empty() {
        println!("Project is empty.");
        return;
    }
    let selected = project.selected_file.as_deref();
    let width = project.files.paths().map(str::len).max().unwrap_or(4).max(4);
    println!("  {:<width$}  {:>6}", "PATH", "LINES");
    for (path, content) in project.files.iter() {
        let marker = if Some(path) == selected { '*' } else { ' ' };
        println!("{marker} {path:<width$}  {:>6}", content.lines().count());
    }
}

fn cat(ws: &Workspace<'_>, path: Option<&str>) -> Result<(), String> {
    let project = &ws.state().project;
    let content = match path {
        Some(path) => {
            project.files.get(path).ok_or_else(|| format!("No such file in project: {path}"))?
        }
        None => project.selected_content().ok_or("No file selected")?,
    };
    println!("{content}");
    Ok(())
}

fn confirm_on_stdin() -> bool {
    eprint!("Reset the project? All unsaved changes will be lost. [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
