//! `appgen status` command.

use crate::chat::SessionState;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::workspace::Workspace;

/// Execute the `status` command.
///
/// Prints the project, attachment and chat state as label/value rows.
pub fn run(ctx: &ServiceContext, settings: &Settings) {
    let ws = Workspace::open(ctx, &settings.state_dir);
    let state = ws.state();

    let chat = match state.session.state() {
        SessionState::Unbound => "not linked".to_string(),
        SessionState::Bound { project_id, version } => format!("{project_id} (version {version})"),
    };
    let rows = [
        ("Backend", settings.backend_url.clone()),
        ("State", settings.state_dir.display().to_string()),
        ("Files", state.project.files.len().to_string()),
        ("Selected", state.project.selected_file.clone().unwrap_or_else(|| "-".to_string())),
        ("Attached", state.uploads.files.len().to_string()),
        ("Chat", chat),
        ("Messages", ws.transcript().len().to_string()),
        ("Transcripts", state.transcripts.project_ids().len().to_string()),
    ];

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        println!("{label:<width$}  {value}");
    }
}
