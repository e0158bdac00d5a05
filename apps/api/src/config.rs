use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DEFAULT_DESIRED_PROFILES: u32 = 10;
pub const DEFAULT_SEARCH_TERM: &str = "R&D";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub tavily_api_key: String,
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub default_company: Option<String>,
    pub default_search_term: String,
    pub desired_profiles: u32,
    pub prompt_path: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub environment: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let desired_profiles = parse_desired_profiles(
            optional_env("DESIRED_PROFILES"),
            optional_env("desired_profile"),
        )?;

        Ok(Config {
            tavily_api_key: require_env("TAVILY_API_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: optional_env("LLM_MODEL")
                .unwrap_or_else(|| crate::llm_client::DEFAULT_MODEL.to_string()),
            default_company: optional_env("DEFAULT_COMPANY"),
            default_search_term: optional_env("DEFAULT_SEARCH_TERM")
                .unwrap_or_else(|| DEFAULT_SEARCH_TERM.to_string()),
            desired_profiles,
            prompt_path: optional_env("PROMPT_PATH").map(PathBuf::from),
            results_dir: optional_env("RESULTS_DIR").map(PathBuf::from),
            environment: optional_env("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// `desired_profile` is the legacy spelling still found in older .env files;
/// `DESIRED_PROFILES` wins when both are set.
fn parse_desired_profiles(primary: Option<String>, legacy: Option<String>) -> Result<u32> {
    let Some(raw) = primary.or(legacy) else {
        return Ok(DEFAULT_DESIRED_PROFILES);
    };
    let value = raw
        .parse::<u32>()
        .with_context(|| format!("DESIRED_PROFILES must be a positive integer, got '{raw}'"))?;
    if value == 0 {
        bail!("DESIRED_PROFILES must be a positive integer, got '0'");
    }
    Ok(value)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns the variable's value, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    /// Configuration used by handler and pipeline tests. Never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            tavily_api_key: "tvly-test".to_string(),
            anthropic_api_key: "sk-test".to_string(),
            llm_model: crate::llm_client::DEFAULT_MODEL.to_string(),
            default_company: None,
            default_search_term: DEFAULT_SEARCH_TERM.to_string(),
            desired_profiles: DEFAULT_DESIRED_PROFILES,
            prompt_path: None,
            results_dir: None,
            environment: "test".to_string(),
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}
