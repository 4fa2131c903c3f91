//! Shelf CLI - your personal library in the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelf_core::services::LogEvent;

mod commands;
mod output;

use commands::{account, bookmarks, config, dump, favorites, learnings, logs, search, status};

/// Shelf - find books, keep favorites, track what you read
#[derive(Parser)]
#[command(name = "shelf", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(short, long)]
        username: Option<String>,
        /// Password (or set SHELF_PASSWORD; prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Password (or set SHELF_PASSWORD; prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show who is signed in
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the book catalog by field of interest
    Search {
        /// Field of interest (catalog subject)
        category: String,
        /// Narrow the search to a specific topic
        #[arg(short, long)]
        topic: Option<String>,
        /// Add results to favorites by their number in the listing
        #[arg(long, value_delimiter = ',')]
        add: Vec<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        command: favorites::FavoritesCommands,
    },

    /// Show the current page of every favorite
    Bookmarks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show saved notes for every favorite
    Learnings {
        /// Print notes in full instead of a table
        #[arg(long)]
        full: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the raw favorites document
    Dump,

    /// Show library summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Command name for the event log
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout { .. } => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Search { .. } => "search",
            Commands::Favorites { .. } => "favorites",
            Commands::Bookmarks { .. } => "bookmarks",
            Commands::Learnings { .. } => "learnings",
            Commands::Dump => "dump",
            Commands::Status { .. } => "status",
            Commands::Config { .. } => "config",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let logger = commands::get_logger();
            commands::log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(name)
                    .with_error(error_kind(&e)),
            );
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Error category for the event log; messages may carry user data
fn error_kind(e: &anyhow::Error) -> String {
    match e.downcast_ref::<shelf_core::Error>() {
        Some(core) => core.category(),
        None => "command error".to_string(),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register {
            username,
            password,
            json,
        } => account::register(username, password, json),
        Commands::Login {
            username,
            password,
            json,
        } => account::login(username, password, json),
        Commands::Logout { json } => account::logout(json),
        Commands::Whoami { json } => account::whoami(json),
        Commands::Search {
            category,
            topic,
            add,
            json,
        } => search::run(&category, topic.as_deref(), add, json),
        Commands::Favorites { command } => favorites::run(command),
        Commands::Bookmarks { json } => bookmarks::run(json),
        Commands::Learnings { full, json } => learnings::run(full, json),
        Commands::Dump => dump::run(),
        Commands::Status { json } => status::run(json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
