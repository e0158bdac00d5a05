// Prospect research: turn (company, role) into a ranked shortlist of people.
// Search goes through `search::SearchProvider`, scoring through
// `llm_client::CompletionProvider`; nothing here talks HTTP to a provider.

pub mod archive;
pub mod handlers;
pub mod jobs;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod ranking;
pub mod titles;

#[cfg(test)]
pub mod test_support;
