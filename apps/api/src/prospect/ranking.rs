//! Ranking stage: hand the candidate documents to the model with the ranking
//! template, then hold its reply to the `ScoredProfile` schema.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::json_only;
use crate::llm_client::{strip_json_fences, CompletionProvider, LlmError};
use crate::prospect::models::{ScoredProfile, SearchQuery};
use crate::prospect::prompts::{ranking_request, PromptTemplate};
use crate::search::RawProfile;

/// Candidate content is cut to this many characters before it reaches the model.
pub const MAX_CONTENT_CHARS: usize = 1000;
const TRUNCATION_MARKER: &str = "... (content truncated)";

#[derive(Debug, Error)]
pub enum RankingError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("model reply is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to encode candidates for the model: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("model reply is empty")]
    Empty,

    #[error("model reply is neither a JSON array nor an object with a `profiles` array")]
    NotAnArray,

    #[error("profile #{index} does not match the expected schema: {reason}")]
    InvalidProfile { index: usize, reason: String },
}

/// Scores `candidates` for `query`. Returns at most `query.max_profiles`
/// profiles, best first, unique by URL.
pub async fn rank_profiles(
    llm: &dyn CompletionProvider,
    template: &PromptTemplate,
    query: &SearchQuery,
    candidates: &[RawProfile],
) -> Result<Vec<ScoredProfile>, RankingError> {
    if candidates.is_empty() {
        info!("No candidates to rank for {}", query.company);
        return Ok(Vec::new());
    }

    let system = json_only(&template.render(
        &query.company,
        &query.search_term,
        query.max_profiles,
    ));
    let listing = candidates_json(candidates).map_err(RankingError::Encode)?;
    let prompt = ranking_request(query.max_profiles, &listing);

    let reply = llm.complete(&prompt, &system).await?;
    let profiles = parse_scored_profiles(&reply)?;
    let shortlist = shape_shortlist(profiles, query.max_profiles);

    info!(
        "Ranked {} candidates into {} profiles for {} ({})",
        candidates.len(),
        shortlist.len(),
        query.company,
        query.search_term
    );
    Ok(shortlist)
}

/// Serialises candidates for the prompt with oversized content truncated.
fn candidates_json(candidates: &[RawProfile]) -> Result<String, serde_json::Error> {
    let trimmed: Vec<RawProfile> = candidates
        .iter()
        .cloned()
        .map(|mut c| {
            c.content = truncate_content(&c.content);
            c
        })
        .collect();
    serde_json::to_string_pretty(&trimmed)
}

pub fn truncate_content(content: &str) -> String {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => format!("{}{}", &content[..cut], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}

/// Parses and validates the model's reply.
///
/// Accepts a bare array or `{"profiles": [...]}`. Every element must carry a
/// title, a non-empty url and a finite score in `0.0..=1.0`.
pub fn parse_scored_profiles(reply: &str) -> Result<Vec<ScoredProfile>, RankingError> {
    let text = strip_json_fences(reply);
    if text.is_empty() {
        return Err(RankingError::Empty);
    }

    let items = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("profiles") {
            Some(Value::Array(items)) => items,
            _ => return Err(RankingError::NotAnArray),
        },
        _ => return Err(RankingError::NotAnArray),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let profile: ScoredProfile =
                serde_json::from_value(item).map_err(|e| RankingError::InvalidProfile {
                    index,
                    reason: e.to_string(),
                })?;
            validate_profile(&profile).map_err(|reason| RankingError::InvalidProfile {
                index,
                reason,
            })?;
            Ok::<_, RankingError>(profile)
        })
        .collect()
}

fn validate_profile(profile: &ScoredProfile) -> Result<(), String> {
    if profile.url.trim().is_empty() {
        return Err("url is empty".to_string());
    }
    if !profile.score.is_finite() || !(0.0..=1.0).contains(&profile.score) {
        return Err(format!("score {} is outside 0.0..=1.0", profile.score));
    }
    Ok(())
}

/// Drops repeated URLs, orders by score (stable for ties), caps at `max`.
pub fn shape_shortlist(profiles: Vec<ScoredProfile>, max: u32) -> Vec<ScoredProfile> {
    let mut seen = HashSet::new();
    let mut unique: Vec<ScoredProfile> = profiles
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.url.clone());
            if !fresh {
                warn!("Model returned duplicate url {}; keeping first", p.url);
            }
            fresh
        })
        .collect();

    unique.sort_by(|a, b| b.score.total_cmp(&a.score));
    unique.truncate(max as usize);
    unique
}
