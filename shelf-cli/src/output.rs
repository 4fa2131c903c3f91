//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use shelf_core::{BookSummary, FavoriteBook};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Numbered table of search results
pub fn search_table(books: &[BookSummary]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["#", "Title", "Author", "Year", "ISBN"]);
    for (i, book) in books.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            book.title.clone(),
            book.author.clone(),
            book.publication_year.clone(),
            book.isbn.clone(),
        ]);
    }
    table
}

/// Table of favorites with reading progress
pub fn favorites_table(books: &[FavoriteBook]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ISBN", "Title", "Author", "Year", "Category", "Page"]);
    for book in books {
        table.add_row(vec![
            book.isbn.clone(),
            book.title.clone(),
            book.author.clone(),
            book.publication_year.clone(),
            book.category.clone(),
            book.current_page.to_string(),
        ]);
    }
    table
}

/// Shorten long text for table cells
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
