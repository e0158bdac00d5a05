//! Tavily search backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::query::with_profile_details;
use super::{SearchError, SearchProvider, SearchResponse};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";
const MAX_RESULTS: u32 = 10;
const CHUNKS_PER_SOURCE: u32 = 2;
const SEARCH_DEPTH: &str = "advanced";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    topic: &'a str,
    search_depth: &'a str,
    chunks_per_source: u32,
    max_results: u32,
    include_answer: bool,
    include_raw_content: bool,
    include_images: bool,
    include_image_descriptions: bool,
}

impl<'a> TavilyRequest<'a> {
    fn new(query: &'a str, max_results: u32) -> Self {
        Self {
            query,
            topic: "general",
            search_depth: SEARCH_DEPTH,
            chunks_per_source: CHUNKS_PER_SOURCE,
            max_results,
            include_answer: true,
            include_raw_content: false,
            include_images: false,
            include_image_descriptions: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TavilyError {
    #[serde(alias = "error")]
    detail: Value,
}

/// Extracts a readable message from Tavily's error body, which nests it under
/// `detail.error` or puts a string directly under `detail`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<TavilyError>(body)
        .ok()
        .and_then(|e| match e.detail {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("error").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .unwrap_or_else(|| body.to_string())
}

#[derive(Clone)]
pub struct TavilyClient {
    client: Client,
    api_key: String,
    max_results: u32,
}

impl TavilyClient {
    pub fn new(api_key: String) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            max_results: MAX_RESULTS,
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "query must be a non-empty string".to_string(),
            ));
        }

        let query = with_profile_details(query);
        info!("Performing Tavily search: {query}");

        let response = self
            .client
            .post(TAVILY_API_URL)
            .bearer_auth(&self.api_key)
            .json(&TavilyRequest::new(&query, self.max_results))
            .send()
            .await?;

        let status = response.status();
        debug!("Tavily response status: {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let mut results: SearchResponse = response.json().await?;
        if results.query.is_empty() {
            results.query = query;
        }

        info!(
            "Tavily search returned {} results for: {}",
            results.results.len(),
            results.query
        );
        Ok(results)
    }
}
