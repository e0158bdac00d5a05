// Prompt assets for the prospect pipeline.
// The ranking template is an external text file; the title-expansion prompt
// is small enough to live here.

use std::path::Path;

use anyhow::{bail, Context, Result};

/// Ranking template shipped with the service. Overridden by `PROMPT_PATH`.
pub const DEFAULT_RANKING_TEMPLATE: &str = include_str!("../../prompts/prompt.txt");

pub const COMPANY_PLACEHOLDER: &str = "{company}";
pub const SEARCH_TERM_PLACEHOLDER: &str = "{search_term}";
pub const DESIRED_PROFILES_PLACEHOLDER: &str = "{DESIRED_PROFILES}";

const REQUIRED_PLACEHOLDERS: [&str; 3] = [
    COMPANY_PLACEHOLDER,
    SEARCH_TERM_PLACEHOLDER,
    DESIRED_PROFILES_PLACEHOLDER,
];

/// The ranking instruction text with its three placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let missing: Vec<&str> = REQUIRED_PLACEHOLDERS
            .iter()
            .copied()
            .filter(|p| !text.contains(p))
            .collect();
        if !missing.is_empty() {
            bail!("prompt template is missing placeholders: {}", missing.join(", "));
        }
        Ok(Self { text })
    }

    /// Reads the template from `path`, or uses the built-in one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read prompt template {}", path.display()))?;
                Self::new(text)
            }
            None => Self::new(DEFAULT_RANKING_TEMPLATE),
        }
    }

    /// Verbatim substitution. No escaping is applied to the values.
    pub fn render(&self, company: &str, search_term: &str, desired_profiles: u32) -> String {
        self.text
            .replace(COMPANY_PLACEHOLDER, company)
            .replace(SEARCH_TERM_PLACEHOLDER, search_term)
            .replace(DESIRED_PROFILES_PLACEHOLDER, &desired_profiles.to_string())
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_RANKING_TEMPLATE.to_string(),
        }
    }
}

/// User message that carries the candidate list to the ranking model.
pub fn ranking_request(desired_profiles: u32, candidates_json: &str) -> String {
    format!(
        "Select the {desired_profiles} best profiles from this list (as a JSON array): {candidates_json}"
    )
}

/// System prompt for title expansion. Replace `{company}` before sending.
pub const TITLE_EXPANSION_SYSTEM: &str = "I will give you a position title in an organization \
    named {company}. Generate only relevant titles used for similar posts at {company}. \
    Some companies say \"Software Engineer\" and others \"Member of Technical Staff\"; \
    list the variants {company} is likely to use, including the title you were given. \
    Return a JSON array of strings.";

pub fn title_expansion_system(company: &str) -> String {
    TITLE_EXPANSION_SYSTEM.replace(COMPANY_PLACEHOLDER, company)
}
