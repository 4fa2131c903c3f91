//! Config command - show and change settings.json

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use shelf_core::config::Config;

use super::get_shelf_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a value, e.g. `shelf config set catalog.timeoutSecs 5`
    Set { key: String, value: String },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let shelf_dir = get_shelf_dir()?;
    let mut config = Config::load(&shelf_dir)?;

    match command {
        ConfigCommands::Show { json } => {
            let mut catalog = config.catalog.clone();
            if catalog.api_key.is_some() {
                catalog.api_key = Some("********".to_string());
            }

            if json {
                println!("{}", serde_json::json!({"catalog": catalog}));
                return Ok(());
            }

            println!("{}", "Catalog".bold());
            let mut table = output::create_table();
            table.add_row(vec!["baseUrl", &catalog.base_url]);
            table.add_row(vec![
                "apiKey",
                catalog.api_key.as_deref().unwrap_or("(none)"),
            ]);
            table.add_row(vec!["timeoutSecs", &catalog.timeout_secs.to_string()]);
            table.add_row(vec!["maxResults", &catalog.max_results.to_string()]);
            println!("{}", table);
            println!("{}", format!("Data directory: {}", shelf_dir.display()).dimmed());
        }
        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            std::fs::create_dir_all(&shelf_dir)?;
            config.save(&shelf_dir)?;
            output::success(&format!("Set {}", key));
        }
    }
    Ok(())
}
