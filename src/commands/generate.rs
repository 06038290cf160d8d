//! `appgen generate` command.

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::workspace::Workspace;

/// Execute the `generate` command.
///
/// Given values overwrite the persisted form; omitted ones reuse it.
///
/// # Errors
///
/// Returns an error string if the description is blank or generation fails.
pub async fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    description: Option<&str>,
    features: Option<&str>,
) -> Result<(), String> {
    let mut ws = Workspace::open(ctx, &settings.state_dir);
    if description.is_some() || features.is_some() {
        ws.set_form(description.map(String::from), features.map(String::from));
    }

    let attached = ws.state().uploads.files.len();
    if attached > 0 {
        eprintln!("Including {attached} reference file(s).");
    }

    let generated = ws.generate().await.map_err(|e| format!("Generation failed: {e}"))?;

    println!("Generated {} file(s):", generated.files.len());
    let selected = ws.state().project.selected_file.as_deref();
    for path in generated.files.paths() {
        let marker = if Some(path) == selected { '*' } else { ' ' };
        println!("{marker} {path}");
    }
    if let Some(project_id) = &generated.project_id {
        println!("Chat ready for project {project_id}.");
    }
    Ok(())
}
