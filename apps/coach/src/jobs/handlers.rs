//! Axum route handlers for the Job Tracking API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::models::{JobApplication, JobStats, JobStatus, JobUpdate, NewJob};
use crate::jobs::JobBoard;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub success: bool,
    pub jobs: Vec<JobApplication>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub success: bool,
    pub job: JobApplication,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: JobStats,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: JobStatus,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Job {id} not found"))
}

/// Applies `change` to a draft of the board and persists it. The shared board
/// is replaced only after the save succeeds, so a failed write leaves it intact.
async fn commit<T>(
    state: &AppState,
    change: impl FnOnce(&mut JobBoard) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut board = state.jobs.write().await;
    let mut draft = board.clone();
    let out = change(&mut draft)?;
    state.job_store.save(draft.jobs()).await?;
    *board = draft;
    Ok(out)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<JobsResponse> {
    let board = state.jobs.read().await;
    Json(JobsResponse {
        success: true,
        jobs: board.jobs().to_vec(),
    })
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<NewJob>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.company.trim().is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }

    let job = commit(&state, |board| Ok(board.add(request, Utc::now()))).await?;

    info!("Job {} added ({} at {})", job.id, job.title, job.company);
    Ok((
        StatusCode::CREATED,
        Json(JobResponse { success: true, job }),
    ))
}

/// GET /api/v1/jobs/stats
pub async fn handle_job_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let board = state.jobs.read().await;
    Json(StatsResponse {
        success: true,
        stats: board.stats(),
    })
}

/// GET /api/v1/jobs/status/:status
pub async fn handle_jobs_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<JobsResponse>, AppError> {
    let status = status.parse::<JobStatus>().map_err(AppError::Validation)?;
    let board = state.jobs.read().await;
    Ok(Json(JobsResponse {
        success: true,
        jobs: board.by_status(status),
    }))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobUpdate>,
) -> Result<Json<JobResponse>, AppError> {
    let job = commit(&state, |board| {
        board
            .update(id, request, Utc::now())
            .cloned()
            .ok_or_else(|| not_found(id))
    })
    .await?;

    Ok(Json(JobResponse { success: true, job }))
}

/// PATCH /api/v1/jobs/:id/status
pub async fn handle_update_job_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let job = commit(&state, |board| {
        board
            .update_status(id, request.status, Utc::now())
            .cloned()
            .ok_or_else(|| not_found(id))
    })
    .await?;

    info!("Job {id} moved to {}", job.status);
    Ok(Json(JobResponse { success: true, job }))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    commit(&state, |board| {
        if board.delete(id) {
            Ok(())
        } else {
            Err(not_found(id))
        }
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
