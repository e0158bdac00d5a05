//! In-memory table of background prospect searches. Lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::prospect::models::ScoredProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub request_id: Uuid,
    pub company: String,
    pub status: JobStatus,
    pub message: String,
    pub profiles: Vec<ScoredProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Row of `GET /prospect/list`.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub request_id: Uuid,
    pub company: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
}

impl JobStore {
    pub async fn create(&self, company: &str) -> Job {
        let job = Job {
            request_id: Uuid::new_v4(),
            company: company.to_string(),
            status: JobStatus::Processing,
            message: "Searching for prospects...".to_string(),
            profiles: Vec::new(),
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.jobs.write().await.insert(job.request_id, job.clone());
        job
    }

    pub async fn get(&self, id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Newest first.
    pub async fn list(&self) -> Vec<JobSummary> {
        let mut rows: Vec<JobSummary> = self
            .jobs
            .read()
            .await
            .values()
            .map(|job| JobSummary {
                request_id: job.request_id,
                company: job.company.clone(),
                status: job.status,
                created_at: job.created_at,
                completed_at: job.completed_at,
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub async fn remove(&self, id: Uuid) -> Option<Job> {
        self.jobs.write().await.remove(&id)
    }

    /// No-op if the job was deleted while it ran.
    pub async fn complete(&self, id: Uuid, profiles: Vec<ScoredProfile>) {
        if let Some(job) = self.jobs.write().await.get_mut(&id) {
            job.status = JobStatus::Completed;
            job.message = format!("Search completed with {} profiles.", profiles.len());
            job.profiles = profiles;
            job.completed_at = Some(Utc::now());
        }
    }

    pub async fn fail(&self, id: Uuid, error: String) {
        if let Some(job) = self.jobs.write().await.get_mut(&id) {
            job.status = JobStatus::Error;
            job.message = format!("Search failed: {error}");
            job.error = Some(error);
            job.completed_at = Some(Utc::now());
        }
    }
}
