//! The search-then-rank pipeline behind every prospect endpoint.
//!
//! Plain requests make one search call and one completion call. With
//! `expand_titles` the search stage fans out over model-suggested titles and
//! falls back to LinkedIn-only queries when the pool is too small.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::CompletionProvider;
use crate::prospect::models::{ScoredProfile, SearchQuery};
use crate::prospect::prompts::PromptTemplate;
use crate::prospect::ranking::rank_profiles;
use crate::prospect::titles::expand_titles;
use crate::search::query::{build_linkedin_instruction, build_search_instruction};
use crate::search::{dedup_by_url, RawProfile, SearchError, SearchProvider};

#[derive(Clone)]
pub struct ProspectPipeline {
    search: Arc<dyn SearchProvider>,
    llm: Arc<dyn CompletionProvider>,
    template: Arc<PromptTemplate>,
}

impl ProspectPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        llm: Arc<dyn CompletionProvider>,
        template: PromptTemplate,
    ) -> Self {
        Self {
            search,
            llm,
            template: Arc::new(template),
        }
    }

    pub async fn run(&self, query: &SearchQuery) -> Result<Vec<ScoredProfile>, AppError> {
        info!(
            "Prospect search: company={}, search_term={}, max_profiles={}, expand_titles={}",
            query.company, query.search_term, query.max_profiles, query.expand_titles
        );

        let candidates = if query.expand_titles {
            self.expanded_candidates(query).await?
        } else {
            self.direct_candidates(query).await?
        };
        info!("Collected {} unique candidates", candidates.len());

        let profiles =
            rank_profiles(self.llm.as_ref(), &self.template, query, &candidates).await?;
        Ok(profiles)
    }

    async fn direct_candidates(&self, query: &SearchQuery) -> Result<Vec<RawProfile>, AppError> {
        let instruction = build_search_instruction(&query.company, &query.search_term);
        let response = self.search.search(&instruction).await?;
        Ok(dedup_by_url(response.results))
    }

    /// Web-wide search per title until the pool holds twice the target, then
    /// LinkedIn-only searches (skipping the first title) until it holds the target.
    async fn expanded_candidates(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<RawProfile>, AppError> {
        let titles = expand_titles(self.llm.as_ref(), &query.company, &query.search_term).await?;
        let target = query.max_profiles as usize;

        let mut pool = Vec::new();
        let mut succeeded = 0usize;
        let mut last_error: Option<SearchError> = None;

        for title in &titles {
            let instruction = build_search_instruction(&query.company, title);
            match self.search.search(&instruction).await {
                Ok(response) => {
                    succeeded += 1;
                    pool = dedup_by_url(pool.into_iter().chain(response.results).collect());
                    if pool.len() > 2 * target {
                        info!("Found {} candidates, stopping web-wide search early", pool.len());
                        break;
                    }
                }
                Err(e) => {
                    warn!("Web-wide search failed for {title}: {e}");
                    last_error = Some(e);
                }
            }
        }

        if pool.len() < target {
            info!(
                "Need {} more candidates, searching LinkedIn",
                target - pool.len()
            );
            for title in titles.iter().skip(1) {
                let instruction = build_linkedin_instruction(&query.company, title);
                match self.search.search(&instruction).await {
                    Ok(response) => {
                        succeeded += 1;
                        pool = dedup_by_url(pool.into_iter().chain(response.results).collect());
                        if pool.len() >= target {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("LinkedIn search failed for {title}: {e}");
                        last_error = Some(e);
                    }
                }
            }
        }

        if succeeded == 0 {
            if let Some(e) = last_error {
                return Err(e.into());
            }
        }
        Ok(pool)
    }
}
