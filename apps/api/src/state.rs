use crate::config::Config;
use crate::prospect::jobs::JobStore;
use crate::prospect::pipeline::ProspectPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Search and completion providers plus the ranking template.
    pub pipeline: ProspectPipeline,
    pub jobs: JobStore,
    pub config: Config,
}
