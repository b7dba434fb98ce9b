//! Google Books volumes API, normalized into [`BookDraft`]s

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::domain::{BookDraft, CatalogLookup, DomainError};

/// Upper bound accepted by the volumes endpoint
pub const MAX_RESULTS_LIMIT: u32 = 40;

#[derive(Debug, Deserialize)]
struct GoogleBooksResponse {
    items: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct GoogleBookItem {
    id: String,
    #[serde(rename = "volumeInfo", default)]
    volume_info: GoogleVolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GoogleVolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    published_date: Option<String>,
    description: Option<String>,
    page_count: Option<i32>,
    categories: Option<Vec<String>>,
    image_links: Option<GoogleImageLinks>,
    language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GoogleImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

/// Normalize one raw volume. Returns `None` for items that are not volumes.
pub fn parse_volume(item: Value) -> Option<BookDraft> {
    let item: GoogleBookItem = match serde_json::from_value(item) {
        Ok(item) => item,
        Err(e) => {
            tracing::warn!("Skipping unparseable Google Books item: {}", e);
            return None;
        }
    };
    let info = item.volume_info;

    let thumbnail_url = info
        .image_links
        .and_then(|links| links.thumbnail.or(links.small_thumbnail))
        .unwrap_or_default();

    Some(BookDraft {
        google_books_id: item.id,
        title: info.title.unwrap_or_default(),
        authors: info.authors.unwrap_or_default(),
        published_date: info.published_date,
        description: info.description.unwrap_or_default(),
        page_count: info.page_count,
        categories: info.categories.unwrap_or_default(),
        thumbnail_url,
        language: info.language.unwrap_or_default(),
    })
}

pub struct GoogleBooksClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn try_search(&self, query: &str, max_results: u32) -> Result<Vec<BookDraft>, String> {
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT).to_string();
        let request = self
            .client
            .get(format!("{}/volumes", self.base_url))
            .query(&[("q", query), ("maxResults", max_results.as_str())]);

        let resp = self
            .with_key(request)
            .send()
            .await
            .map_err(|e| format!("Failed to send request: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("Google Books returned status: {}", resp.status()));
        }

        let parsed: GoogleBooksResponse = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        Ok(parsed
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(parse_volume)
            .collect())
    }
}

#[async_trait]
impl CatalogLookup for GoogleBooksClient {
    async fn search(&self, query: &str, max_results: u32) -> Vec<BookDraft> {
        match self.try_search(query, max_results).await {
            Ok(books) => {
                tracing::debug!("Google Books search '{}' returned {} items", query, books.len());
                books
            }
            Err(e) => {
                tracing::warn!("Google Books search '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, external_id: &str) -> Result<BookDraft, DomainError> {
        let request = self
            .client
            .get(format!(
                "{}/volumes/{}",
                self.base_url,
                urlencoding::encode(external_id)
            ));

        let resp = self.with_key(request).send().await.map_err(|e| {
            tracing::warn!("Google Books fetch '{}' failed: {}", external_id, e);
            DomainError::External(e.to_string())
        })?;

        match resp.status() {
            reqwest::StatusCode::NOT_FOUND => return Err(DomainError::NotFound),
            status if !status.is_success() => {
                tracing::warn!("Google Books fetch '{}' returned {}", external_id, status);
                return Err(DomainError::External(format!(
                    "Google Books returned status: {}",
                    status
                )));
            }
            _ => {}
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| DomainError::External(format!("Failed to parse JSON: {}", e)))?;

        parse_volume(body).ok_or(DomainError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_a_full_volume() {
        let draft = parse_volume(json!({
            "id": "abc123",
            "volumeInfo": {
                "title": "Test Book",
                "authors": ["Test Author"],
                "publishedDate": "2023-01-01",
                "description": "Test description",
                "pageCount": 200,
                "categories": ["Fiction"],
                "imageLinks": { "thumbnail": "http://example.com/thumb.jpg" },
                "language": "en"
            }
        }))
        .expect("volume");

        assert_eq!(draft.google_books_id, "abc123");
        assert_eq!(draft.title, "Test Book");
        assert_eq!(draft.authors, vec!["Test Author".to_string()]);
        assert_eq!(draft.published_date.as_deref(), Some("2023-01-01"));
        assert_eq!(draft.page_count, Some(200));
        assert_eq!(draft.thumbnail_url, "http://example.com/thumb.jpg");
        assert_eq!(draft.language, "en");
    }

    #[test]
    fn sparse_volume_gets_defaults() {
        let draft = parse_volume(json!({
            "id": "sparse",
            "volumeInfo": {
                "title": "Only A Title",
                "imageLinks": { "smallThumbnail": "http://example.com/small.jpg" }
            }
        }))
        .expect("volume");

        assert!(draft.authors.is_empty());
        assert!(draft.categories.is_empty());
        assert_eq!(draft.description, "");
        assert_eq!(draft.page_count, None);
        assert_eq!(draft.thumbnail_url, "http://example.com/small.jpg");
    }

    #[test]
    fn item_without_id_is_skipped() {
        assert!(parse_volume(json!({ "volumeInfo": { "title": "x" } })).is_none());
    }
}
