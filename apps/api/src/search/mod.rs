//! Search provider seam.
//!
//! The pipeline only sees `SearchProvider`; `TavilyClient` is the production
//! backend. Result documents are opaque: the fields the pipeline reads are
//! typed, everything else is carried through untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod query;
pub mod tavily;

pub use tavily::TavilyClient;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),
}

/// One document returned by the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
    /// Provider fields the pipeline does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The provider's response for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<RawProfile>,
}

/// The search provider trait. Carried in `AppState` as `Arc<dyn SearchProvider>`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;
}

/// Drops documents without a URL and repeated URLs, keeping first occurrences.
pub fn dedup_by_url(profiles: Vec<RawProfile>) -> Vec<RawProfile> {
    let mut seen = std::collections::HashSet::new();
    profiles
        .into_iter()
        .filter(|p| !p.url.is_empty() && seen.insert(p.url.clone()))
        .collect()
}
