//! CLI command implementations

pub mod account;
pub mod bookmarks;
pub mod config;
pub mod dump;
pub mod favorites;
pub mod learnings;
pub mod logs;
pub mod search;
pub mod status;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use shelf_core::services::{EntryPoint, LogEvent, LoggingService};
use shelf_core::{Session, ShelfContext};

/// Environment variable pointing at the data directory
pub const SHELF_DIR_ENV: &str = "SHELF_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let shelf_dir = get_shelf_dir().ok()?;
    LoggingService::new(&shelf_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the shelf directory from environment or default
pub fn get_shelf_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(SHELF_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".shelf"))
        .context("Could not find home directory; set SHELF_DIR")
}

/// Open the shelf context for the data directory
pub fn get_context() -> Result<ShelfContext> {
    let shelf_dir = get_shelf_dir()?;
    ShelfContext::new(&shelf_dir).context("Failed to initialize shelf")
}

/// The current session, or an error asking the user to log in
pub fn require_session(ctx: &ShelfContext) -> Result<Session> {
    Ok(ctx.session_service.require()?)
}

/// Read values from piped stdin, one per line or comma-separated
///
/// Returns an empty list when stdin is a terminal.
pub fn read_stdin_list() -> Result<Vec<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(Vec::new());
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(split_list(&buffer))
}

/// Split on newlines when present, otherwise on commas
pub fn split_list(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    let parts: Vec<&str> = if trimmed.contains('\n') {
        trimmed.lines().collect()
    } else {
        trimmed.split(',').collect()
    };
    parts
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c"), vec!["a", "b", "c"]);
        assert_eq!(split_list("a,b\nc\n\n"), vec!["a,b", "c"]);
        assert!(split_list("  ").is_empty());
    }
}
