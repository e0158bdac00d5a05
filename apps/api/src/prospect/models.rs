use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::errors::AppError;

pub const MAX_PROFILES_LIMIT: u32 = 50;

/// Body of `POST /prospect/search` and `POST /prospect/jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProspectRequest {
    pub company: Option<String>,
    pub search_term: Option<String>,
    pub max_profiles: Option<u32>,
    #[serde(default)]
    pub expand_titles: bool,
}

/// A request with configuration defaults applied and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub company: String,
    pub search_term: String,
    pub max_profiles: u32,
    pub expand_titles: bool,
}

impl ProspectRequest {
    pub fn resolve(self, config: &Config) -> Result<SearchQuery, AppError> {
        let company = non_blank(self.company)
            .or_else(|| config.default_company.clone())
            .ok_or_else(|| {
                AppError::Validation(
                    "company is required (no DEFAULT_COMPANY configured)".to_string(),
                )
            })?;
        let search_term =
            non_blank(self.search_term).unwrap_or_else(|| config.default_search_term.clone());
        if search_term.trim().is_empty() {
            return Err(AppError::Validation("search_term cannot be empty".to_string()));
        }

        let max_profiles = self.max_profiles.unwrap_or(config.desired_profiles);
        if !(1..=MAX_PROFILES_LIMIT).contains(&max_profiles) {
            return Err(AppError::Validation(format!(
                "max_profiles must be between 1 and {MAX_PROFILES_LIMIT}, got {max_profiles}"
            )));
        }

        Ok(SearchQuery {
            company,
            search_term,
            max_profiles,
            expand_titles: self.expand_titles,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One candidate as scored by the ranking model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProfile {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub experience: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// Models sometimes send `null` for a list they have nothing to put in.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
