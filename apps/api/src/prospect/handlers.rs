//! Axum route handlers for the Prospect API.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::prospect::archive::append_results;
use crate::prospect::jobs::{Job, JobStatus, JobSummary};
use crate::prospect::models::{ProspectRequest, ScoredProfile, SearchQuery};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JobAccepted {
    pub request_id: Uuid,
    pub status: JobStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct JobList {
    pub searches: Vec<JobSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct JobDeleted {
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /prospect/search
///
/// Runs the pipeline inline and returns the ranked shortlist.
pub async fn handle_search(
    State(state): State<AppState>,
    payload: Result<Json<ProspectRequest>, JsonRejection>,
) -> Result<Json<Vec<ScoredProfile>>, AppError> {
    let Json(request) = payload?;
    let query = request.resolve(&state.config)?;
    let profiles = run_search(&state, &query).await?;
    Ok(Json(profiles))
}

/// POST /prospect/jobs
///
/// Validates the request, then runs the pipeline on a background task.
pub async fn handle_create_job(
    State(state): State<AppState>,
    payload: Result<Json<ProspectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobAccepted>), AppError> {
    let Json(request) = payload?;
    let query = request.resolve(&state.config)?;
    let job = state.jobs.create(&query.company).await;
    let id = job.request_id;
    info!("Queued prospect search {id} for {}", query.company);

    let task_state = state.clone();
    tokio::spawn(async move {
        match run_search(&task_state, &query).await {
            Ok(profiles) => task_state.jobs.complete(id, profiles).await,
            Err(e) => {
                error!("Prospect search {id} failed: {e}");
                task_state.jobs.fail(id, e.to_string()).await;
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(JobAccepted {
            request_id: id,
            status: job.status,
            message: format!(
                "Search initiated. Use GET /prospect/status/{id} to check progress."
            ),
            created_at: job.created_at,
        }),
    ))
}

/// GET /prospect/status/:id
pub async fn handle_job_status(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Job>, AppError> {
    let Path(id) = id?;
    state
        .jobs
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Request {id} not found")))
}

/// GET /prospect/list
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<JobList> {
    let searches = state.jobs.list().await;
    Json(JobList {
        total: searches.len(),
        searches,
    })
}

/// DELETE /prospect/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<JobDeleted>, AppError> {
    let Path(id) = id?;
    state
        .jobs
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Request {id} not found")))?;
    Ok(Json(JobDeleted {
        message: format!("Search request {id} deleted successfully"),
    }))
}

/// Runs the pipeline and archives the result when `RESULTS_DIR` is set.
/// Archive failures are logged, never returned.
async fn run_search(state: &AppState, query: &SearchQuery) -> Result<Vec<ScoredProfile>, AppError> {
    let profiles = state.pipeline.run(query).await?;

    if let Some(dir) = &state.config.results_dir {
        if let Err(e) = append_results(dir, &query.company, &profiles).await {
            warn!("Failed to archive results for {}: {e:#}", query.company);
        }
    }

    Ok(profiles)
}
