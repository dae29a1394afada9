//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::{run_analysis, score_resume_blocking, AnalysisResult, AnalyzeRequest};
use crate::chameleon::{
    generate_chameleon_metrics, get_all_archetypes, Archetype, ArchetypeEntry, ChameleonMetric,
};
use crate::errors::AppError;
use crate::nexus::NexusAnalysis;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub result: AnalysisResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NexusScoreRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChameleonRequest {
    #[serde(default)]
    pub resume_text: String,
    pub archetype: String,
}

#[derive(Debug, Serialize)]
pub struct ChameleonResponse {
    pub archetype: Archetype,
    pub metrics: Vec<ChameleonMetric>,
}

#[derive(Debug, Serialize)]
pub struct ArchetypesResponse {
    pub archetypes: Vec<ArchetypeEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Full pipeline: Nexus scoring, hiring committee, optional archetype rewrite.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request = request.validate()?;
    let result = run_analysis(&state.committee, request).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        result,
    }))
}

/// POST /api/v1/nexus/score
///
/// Deterministic Nexus analysis only; no model calls.
pub async fn handle_nexus_score(
    Json(request): Json<NexusScoreRequest>,
) -> Result<Json<NexusAnalysis>, AppError> {
    let analysis = score_resume_blocking(request.resume_text, request.job_description).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/chameleon
pub async fn handle_chameleon(
    Json(request): Json<ChameleonRequest>,
) -> Result<Json<ChameleonResponse>, AppError> {
    let archetype = request
        .archetype
        .parse::<Archetype>()
        .map_err(AppError::Validation)?;

    Ok(Json(ChameleonResponse {
        archetype,
        metrics: generate_chameleon_metrics(&request.resume_text, archetype),
    }))
}

/// GET /api/v1/archetypes
pub async fn handle_list_archetypes() -> Json<ArchetypesResponse> {
    Json(ArchetypesResponse {
        archetypes: get_all_archetypes(),
    })
}
