//! Search service - validated catalog searches

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::BookSummary;
use crate::ports::BookCatalog;

pub struct SearchService {
    catalog: Arc<dyn BookCatalog>,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn BookCatalog>) -> Self {
        Self { catalog }
    }

    /// Search a category, optionally narrowed by a topic
    ///
    /// A blank category is rejected before the catalog is called. Catalog
    /// failures surface as `Error::Catalog`, never as an empty list.
    pub fn search(&self, category: &str, topic: &str) -> Result<Vec<BookSummary>> {
        if category.trim().is_empty() {
            return Err(Error::validation("a field of interest (category) is required"));
        }
        Ok(self.catalog.search(category.trim(), topic.trim())?)
    }

    pub fn provider_name(&self) -> &str {
        self.catalog.name()
    }
}
