//! Dump command - print the raw favorites document

use anyhow::Result;
use shelf_core::FavoritesStore;

use super::get_context;

pub fn run() -> Result<()> {
    let ctx = get_context()?;
    let document = ctx.favorites.load_all()?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
