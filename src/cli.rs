//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `appgen`.
#[derive(Debug, Parser)]
#[command(name = "appgen", version, about = "Generate, refine and export front-end projects")]
pub struct Cli {
    /// YAML config file (defaults to `APPGEN_CONFIG`, then `appgen.yaml`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a project from a description and the attached files.
    Generate {
        /// What the application should do. Reuses the last one when omitted.
        #[arg(short, long)]
        description: Option<String>,
        /// Optional feature list.
        #[arg(short, long)]
        features: Option<String>,
    },
    /// Inspect, import and export the current project.
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage reference files attached to generation requests.
    #[command(subcommand)]
    Files(FilesCommand),
    /// Talk to the assistant about the current project.
    #[command(subcommand)]
    Chat(ChatCommand),
    /// Summarize the current state.
    Status,
}

/// `appgen project` subcommands.
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List project files.
    Show,
    /// Print a file; the selected one by default.
    Cat {
        /// Project path, e.g. `/App.js`.
        path: Option<String>,
    },
    /// Select a file.
    Select {
        /// Project path, e.g. `/App.js`.
        path: String,
    },
    /// Restore the built-in template and clear all project state.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Replace the project with a JSON export.
    Import {
        /// JSON file mapping paths to contents.
        file: PathBuf,
    },
    /// Write the project as JSON.
    Export,
    /// Write the project as a ZIP archive.
    ExportZip {
        /// Archive name without extension.
        #[arg(long)]
        name: Option<String>,
    },
    /// Replace the project with the server-held copy.
    Fetch,
}

/// `appgen files` subcommands.
#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// Attach files.
    Add {
        /// Files to attach.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Detach the file at a position shown by `files list`.
    Remove {
        /// Zero-based position.
        index: usize,
    },
    /// List attached files.
    List,
    /// Detach every file.
    Clear,
}

/// `appgen chat` subcommands.
#[derive(Debug, Subcommand)]
pub enum ChatCommand {
    /// Send a message.
    Send {
        /// Message text.
        message: String,
    },
    /// Print the transcript.
    History {
        /// Reconcile with the server first.
        #[arg(long)]
        sync: bool,
        /// Reconcile even if this project was already synced.
        #[arg(long, requires = "sync")]
        force: bool,
    },
    /// Write the transcript as JSON.
    Export {
        /// Project id; the current project by default.
        #[arg(long)]
        project: Option<String>,
    },
    /// Delete a transcript.
    Clear {
        /// Delete every transcript and forget the chat session.
        #[arg(long, conflicts_with = "project")]
        all: bool,
        /// Project id; the current project by default.
        #[arg(long)]
        project: Option<String>,
    },
    /// List projects with a stored transcript.
    Projects,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::parse_from(["appgen", "generate", "-d", "todo app", "-f", "dark mode"]);
        let Command::Generate { description, features } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(description.as_deref(), Some("todo app"));
        assert_eq!(features.as_deref(), Some("dark mode"));
    }

    #[test]
    fn parses_nested_subcommands_and_global_config() {
        let cli = Cli::parse_from([
            "appgen", "project", "export-zip", "--name", "demo", "--config", "c.yaml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        assert!(matches!(
            cli.command,
            Command::Project(ProjectCommand::ExportZip { name: Some(ref n) }) if n == "demo"
        ));
    }

    #[test]
    fn files_add_requires_a_path() {
        assert!(Cli::try_parse_from(["appgen", "files", "add"]).is_err());
    }

    #[test]
    fn force_requires_sync() {
        assert!(Cli::try_parse_from(["appgen", "chat", "history", "--force"]).is_err());
        let cli = Cli::parse_from(["appgen", "chat", "history", "--sync", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Chat(ChatCommand::History { sync: true, force: true })
        ));
    }

    #[test]
    fn clear_all_conflicts_with_project() {
        let parsed = Cli::try_parse_from(["appgen", "chat", "clear", "--all", "--project", "p"]);
        assert!(parsed.is_err());
    }
}
