//! Position-title expansion: ask the model which titles the company uses for
//! a role, and parse whatever it sends back.

use serde_json::Value;
use tracing::{info, warn};

use crate::llm_client::prompts::json_only;
use crate::llm_client::{strip_json_fences, CompletionProvider, LlmError};
use crate::prospect::prompts::title_expansion_system;

/// Used when the model's reply yields no titles.
pub const FALLBACK_TITLES: &[&str] = &[
    "VP of R&D",
    "Head of R&D",
    "CTO",
    "CIO",
    "Director of Innovation",
    "Head of Digital Transformation",
    "VP Engineering",
    "Chief Innovation Officer",
];

/// Returns the title list to search for. The requested term always comes first.
pub async fn expand_titles(
    llm: &dyn CompletionProvider,
    company: &str,
    search_term: &str,
) -> Result<Vec<String>, LlmError> {
    let reply = llm
        .complete(search_term, &json_only(&title_expansion_system(company)))
        .await?;

    let mut titles = parse_position_titles(&reply);
    if titles.is_empty() {
        warn!("No position titles found in model output; using fallback titles");
        titles = FALLBACK_TITLES.iter().map(|t| t.to_string()).collect();
    }

    titles.retain(|t| !t.eq_ignore_ascii_case(search_term));
    titles.insert(0, search_term.to_string());
    info!("Searching {} position titles: {:?}", titles.len(), titles);
    Ok(titles)
}

/// Extracts titles from model output.
///
/// Tries a JSON array of strings first (fenced or embedded in prose), then
/// falls back to one title per line with list markers stripped.
pub fn parse_position_titles(output: &str) -> Vec<String> {
    let text = strip_json_fences(output);

    if let Some(titles) = embedded_json_array(text) {
        return dedup(titles);
    }

    let titles = text
        .lines()
        .map(str::trim)
        .filter(|line| line.len() > 3 && !line.starts_with('#'))
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    dedup(titles)
}

/// Finds the outermost `[...]` span and reads it as an array of strings.
fn embedded_json_array(text: &str) -> Option<Vec<String>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]).ok()? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        _ => None,
    }
}

/// Strips "1.", "2)", "-", "*" and similar prefixes, plus surrounding quotes.
fn strip_list_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_ascii_digit() || matches!(c, '-' | '*' | '.' | ')' | '•') || c.is_whitespace()
    })
    .trim_matches('"')
    .trim()
}

fn dedup(titles: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(titles.len());
    for title in titles {
        if !out.iter().any(|t| t.eq_ignore_ascii_case(&title)) {
            out.push(title);
        }
    }
    out
}
