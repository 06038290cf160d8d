//! `appgen chat` commands.

use crate::chat::{Reconciliation, Role};
use crate::cli::ChatCommand;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::workspace::Workspace;

/// Execute a `chat` subcommand.
///
/// # Errors
///
/// Returns an error string if no project is linked or the backend fails.
pub async fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    command: &ChatCommand,
) -> Result<(), String> {
    let mut ws = Workspace::open(ctx, &settings.state_dir);

    match command {
        ChatCommand::Send { message } => {
            let reply = ws.send_chat(message).await.map_err(|e| e.to_string())?;
            println!("{}", reply.message);
            if let Some(files) = &reply.updated_project {
                let version = ws.state().session.project_version;
                println!("Project updated to version {version} ({} file(s)).", files.len());
            }
        }
        ChatCommand::History { sync, force } => {
            ws.state().session.bound_id().map_err(|e| e.to_string())?;
            if *sync {
                match ws.sync_history(*force).await {
                    Some(Reconciliation::ReplacedFromServer) => {
                        eprintln!("History updated from the server.");
                    }
                    Some(Reconciliation::KeptLocal) => eprintln!("Local history is newer."),
                    Some(Reconciliation::Unchanged) | None => {}
                }
            }
            let transcript = ws.transcript();
            if transcript.is_empty() {
                println!("No messages yet.");
            }
            for message in transcript {
                let role = match message.role {
                    Role::User => "you",
                    Role::Assistant => "assistant",
                };
                println!("[{}] {role}: {}", message.timestamp, message.content);
            }
        }
        ChatCommand::Export { project } => {
            let project_id = match project {
                Some(id) => id.clone(),
                None => ws.state().session.bound_id().map_err(|e| e.to_string())?.to_string(),
            };
            match ws.export_chat_history(&project_id, &settings.out_dir) {
                Ok(Some(path)) => println!("Exported to {}", path.display()),
                Ok(None) => println!("No chat history for project {project_id}."),
                Err(e) => return Err(e.to_string()),
            }
        }
        ChatCommand::Clear { all: true, .. } => {
            let cleared = ws.clear_all_chat_data();
            println!("Cleared {cleared} chat item(s).");
        }
        ChatCommand::Clear { all: false, project } => {
            let project_id = match project {
                Some(id) => id.clone(),
                None => ws.state().session.bound_id().map_err(|e| e.to_string())?.to_string(),
            };
            if ws.clear_project_chat_history(&project_id) {
                println!("Cleared chat history for project {project_id}.");
            } else {
                println!("No chat history for project {project_id}.");
            }
        }
        ChatCommand::Projects => {
            for project_id in ws.stored_chat_projects() {
                println!("{project_id}");
            }
        }
    }
    Ok(())
}
