pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/nexus/score", post(analysis::handle_nexus_score))
        .route("/api/v1/chameleon", post(analysis::handle_chameleon))
        .route("/api/v1/archetypes", get(analysis::handle_list_archetypes))
        // Job Tracking API
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/stats", get(jobs::handle_job_stats))
        .route(
            "/api/v1/jobs/status/:status",
            get(jobs::handle_jobs_by_status),
        )
        .route(
            "/api/v1/jobs/:id",
            patch(jobs::handle_update_job).delete(jobs::handle_delete_job),
        )
        .route(
            "/api/v1/jobs/:id/status",
            patch(jobs::handle_update_job_status),
        )
        .with_state(state)
}
