//! External book catalog abstraction
//!
//! The catalog is a black box that can search and fetch volumes. Results come
//! back as [`BookDraft`]s, the normalized but unpersisted shape of a Book.
//! Implementations live outside the domain (see `google_books`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;

/// Normalized catalog record prior to storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookDraft {
    pub google_books_id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub page_count: Option<i32>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub language: String,
}

impl BookDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.google_books_id.trim().is_empty() {
            return Err(DomainError::validation(
                "google_books_id",
                "This field may not be blank.",
            ));
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "This field may not be blank."));
        }
        if let Some(pages) = self.page_count
            && pages < 0
        {
            return Err(DomainError::validation(
                "page_count",
                "Ensure this value is greater than or equal to 0.",
            ));
        }
        Ok(())
    }
}

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Search the catalog. Upstream failures yield an empty list.
    async fn search(&self, query: &str, max_results: u32) -> Vec<BookDraft>;

    /// Fetch a single volume by its catalog id
    async fn fetch(&self, external_id: &str) -> Result<BookDraft, DomainError>;
}
