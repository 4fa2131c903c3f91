//! Status command - library summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status(&ctx.session_service)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Shelf Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Users", &status.total_users.to_string()]);
    table.add_row(vec![
        "Users with favorites",
        &status.users_with_favorites.to_string(),
    ]);
    table.add_row(vec!["Favorites (all users)", &status.total_favorites.to_string()]);
    if let Some(mine) = status.my_favorites {
        table.add_row(vec!["Your favorites", &mine.to_string()]);
    }
    println!("{}", table);
    println!();

    match &status.logged_in_as {
        Some(name) => println!("Logged in as {}", name.green()),
        None => println!("{}", "Not logged in".dimmed()),
    }
    println!("{}", format!("Favorites file: {}", status.favorites_path).dimmed());

    Ok(())
}
