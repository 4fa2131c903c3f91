//! Google Books API client
//!
//! Searches the public volumes endpoint by subject, optionally narrowed by a
//! free-text topic.
//!
//! API Documentation: https://developers.google.com/books/docs/v1/using

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::config::CatalogSettings;
use crate::domain::BookSummary;
use crate::ports::{BookCatalog, CatalogError};

// =============================================================================
// API Response Models
// =============================================================================

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    /// Absent entirely when nothing matched
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

// =============================================================================
// Google Books HTTP Client
// =============================================================================

/// Default production API URL
pub const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1";

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_TITLE: &str = "Untitled";
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Google Books API client
#[derive(Debug)]
pub struct GoogleBooksClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    max_results: u32,
    timeout: Duration,
}

impl GoogleBooksClient {
    /// Create a client from catalog settings
    pub fn from_settings(settings: &CatalogSettings) -> Result<Self> {
        Self::new(
            &settings.base_url,
            settings.api_key.as_deref(),
            Duration::from_secs(settings.timeout_secs),
            settings.max_results,
        )
    }

    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
        max_results: u32,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid catalog base URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
            max_results: max_results.clamp(1, 40),
            timeout,
        })
    }

    /// Build the volumes search URL
    fn search_url(&self, category: &str, topic: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/volumes", url.path().trim_end_matches('/'));
        url.set_path(&path);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("q", &build_query(category, topic));
            query.append_pair("maxResults", &self.max_results.to_string());
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }
        url
    }

    fn map_request_error(&self, error: reqwest::Error) -> CatalogError {
        if error.is_timeout() {
            CatalogError::Timeout
        } else if error.is_connect() {
            CatalogError::Unreachable
        } else {
            // The URL carries the query and the api key
            CatalogError::Request(error.without_url().to_string())
        }
    }

    /// Anything but 200 is a failure; the body is not trusted to be volumes
    fn check_response_status(
        &self,
        response: &reqwest::blocking::Response,
    ) -> std::result::Result<(), CatalogError> {
        match response.status().as_u16() {
            200 => Ok(()),
            status => Err(CatalogError::Http { status }),
        }
    }

    /// Configured request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// `subject:<category>`, prefixed by the topic when one is given
fn build_query(category: &str, topic: &str) -> String {
    let category = category.trim();
    let topic = topic.trim();
    if topic.is_empty() {
        format!("subject:{}", category)
    } else {
        format!("{} subject:{}", topic, category)
    }
}

/// ISBN_13, then ISBN_10, then whatever identifier the volume has
fn pick_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    let usable = identifiers
        .iter()
        .filter(|id| !id.identifier.trim().is_empty());
    ["ISBN_13", "ISBN_10"]
        .iter()
        .find_map(|kind| usable.clone().find(|id| id.kind == *kind))
        .or_else(|| usable.clone().next())
        .map(|id| id.identifier.trim().to_string())
}

fn publication_year(published_date: Option<&str>) -> String {
    match published_date.map(str::trim) {
        Some(date) if date.len() >= 4 && date.is_char_boundary(4) => date[..4].to_string(),
        Some(date) if !date.is_empty() => date.to_string(),
        _ => UNKNOWN_YEAR.to_string(),
    }
}

/// Map a volume to a summary; volumes without an identifier are dropped
fn map_volume(volume: Volume, category: &str) -> Option<BookSummary> {
    let info = volume.volume_info;
    let isbn = pick_isbn(&info.industry_identifiers)?;

    let author = if info.authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        info.authors.join(", ")
    };

    Some(BookSummary {
        title: info
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        author,
        isbn,
        publication_year: publication_year(info.published_date.as_deref()),
        category: category.trim().to_string(),
    })
}

impl BookCatalog for GoogleBooksClient {
    fn name(&self) -> &str {
        "google_books"
    }

    fn search(
        &self,
        category: &str,
        topic: &str,
    ) -> std::result::Result<Vec<BookSummary>, CatalogError> {
        if category.trim().is_empty() {
            return Err(CatalogError::Request("a category is required".to_string()));
        }

        let response = self
            .client
            .get(self.search_url(category, topic))
            .send()
            .map_err(|e| self.map_request_error(e))?;

        self.check_response_status(&response)?;

        let body: VolumesResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout
            } else {
                CatalogError::Decode(e.without_url().to_string())
            }
        })?;

        Ok(body
            .items
            .into_iter()
            .filter_map(|volume| map_volume(volume, category))
            .collect())
    }
}
