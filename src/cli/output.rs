//! CLI output: error mapping and the command-name contract used in logs.

use crate::cli::parse::Commands;
use crate::error::ApiError;
use owo_colors::OwoColorize;

/// Map an error to the line printed on stderr. Storage details stay in the logs.
pub fn map_error(e: &ApiError) -> String {
    format!("{} {}", "error:".red().bold(), e.public_message())
}

/// Command name for logging (e.g. "list.events", "config").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::List { kind, .. } => format!("list.{}", kind),
        Commands::Create { kind, .. } => format!("create.{}", kind),
        Commands::Update { kind, .. } => format!("update.{}", kind),
        Commands::Delete { kind, .. } => format!("delete.{}", kind),
        Commands::Upload { kind, .. } => format!("upload.{}", kind),
        Commands::Orphans { kind } => format!("orphans.{}", kind),
        Commands::Config => "config".to_string(),
    }
}
