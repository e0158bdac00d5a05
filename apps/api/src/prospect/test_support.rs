//! Stub providers shared by the prospect tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map};

use crate::llm_client::{CompletionProvider, LlmError};
use crate::search::{RawProfile, SearchError, SearchProvider, SearchResponse};

pub fn raw_profile(url: &str) -> RawProfile {
    let handle = url.rsplit('/').next().unwrap_or(url);
    RawProfile {
        title: format!("{handle} - Research Lead - OpenAI | LinkedIn"),
        url: url.to_string(),
        content: format!("{handle} leads applied research at OpenAI. Previously at DeepMind."),
        score: 0.75,
        extra: Map::new(),
    }
}

/// A ranking reply that scores every candidate, highest first.
pub fn scored_reply(candidates: &[RawProfile]) -> String {
    let profiles: Vec<_> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            json!({
                "title": c.title,
                "url": c.url,
                "content": c.content,
                "score": 0.9 - (i as f64) * 0.05,
                "name": format!("Person {i}"),
                "position": "Research Lead",
                "current_company": "OpenAI",
                "experience": [{"company": "DeepMind", "position": "Research Scientist", "years": 3}],
                "analysis": "Leads R&D work at OpenAI"
            })
        })
        .collect();
    serde_json::Value::Array(profiles).to_string()
}

pub struct StubSearch {
    results: Option<Vec<RawProfile>>,
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn returning(results: Vec<RawProfile>) -> Self {
        Self {
            results: Some(results),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            results: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.results {
            Some(results) => Ok(SearchResponse {
                query: query.to_string(),
                answer: None,
                results: results.clone(),
            }),
            None => Err(SearchError::Api {
                status: 432,
                message: "usage limit exceeded".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub prompt: String,
    pub system: String,
}

/// Replies from a queue; once one reply is left it is repeated forever.
pub struct StubCompletion {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<CompletionCall>>,
}

impl StubCompletion {
    pub fn sequence(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(reply: &str) -> Self {
        Self::sequence(vec![Ok(reply.to_string())])
    }

    pub fn failing() -> Self {
        Self::sequence(vec![Err("overloaded".to_string())])
    }

    pub fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for StubCompletion {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(CompletionCall {
            prompt: prompt.to_string(),
            system: system.to_string(),
        });

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Api {
                status: 529,
                message,
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}
