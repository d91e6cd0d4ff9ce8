//! Axum route handlers for the Optimization API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::handlers::{extract_upload, read_upload, JOB_DESCRIPTION_FIELD};
use crate::models::resume::ResumeProfile;
use crate::optimization::jd_analyzer::{analyze, JobAnalysis};
use crate::optimization::orchestrator::{ConnectionCheck, ProviderAttempt};
use crate::providers::ProviderSummary;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeTextRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub request_id: Uuid,
    pub provider: String,
    pub generated_at: DateTime<Utc>,
    pub profile: ResumeProfile,
    pub attempts: Vec<ProviderAttempt>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/providers
///
/// Registry in priority order with per-provider configuration status. Never
/// exposes credentials.
pub async fn handle_list_providers(State(state): State<AppState>) -> Json<Vec<ProviderSummary>> {
    Json(state.registry.summaries())
}

/// POST /api/v1/providers/:name/test
///
/// Sends a one-line prompt to a single provider and reports the outcome. Unconfigured
/// providers come back as `skipped` without a network call.
pub async fn handle_test_provider(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ConnectionCheck>, AppError> {
    let check = state
        .optimizer
        .check_provider(&name)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Provider {name} not found")))?;

    Ok(Json(check))
}

/// POST /api/v1/jobs/analyze
///
/// Runs the local job-description analysis only. No provider is contacted.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<JobAnalysis>, AppError> {
    let job_text = validate_job_description(
        &request.job_description,
        state.config.max_job_description_chars,
    )?;

    Ok(Json(analyze(job_text)))
}

/// POST /api/v1/resumes/optimize
///
/// Multipart upload: `resume` (PDF) and `job_description` (text). Extracts the PDF
/// text and runs the full provider chain.
pub async fn handle_optimize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OptimizeResponse>, AppError> {
    let mut upload = read_upload(multipart).await?;
    let job_description = upload.job_description.take().ok_or_else(|| {
        AppError::Validation(format!("missing '{JOB_DESCRIPTION_FIELD}' field"))
    })?;
    let job_text =
        validate_job_description(&job_description, state.config.max_job_description_chars)?;
    let bytes = upload.require_resume()?;

    let request_id = Uuid::new_v4();
    async move {
        let extracted = extract_upload(bytes).await?;
        optimize(&state, request_id, &extracted.text, job_text).await
    }
    .instrument(info_span!("optimize", %request_id))
    .await
    .map(Json)
}

/// POST /api/v1/resumes/optimize/text
///
/// Same pipeline as the upload route for callers that already hold the résumé text.
pub async fn handle_optimize_text(
    State(state): State<AppState>,
    Json(request): Json<OptimizeTextRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let job_text = validate_job_description(
        &request.job_description,
        state.config.max_job_description_chars,
    )?;

    let request_id = Uuid::new_v4();
    optimize(&state, request_id, &request.resume_text, job_text)
        .instrument(info_span!("optimize", %request_id))
        .await
        .map(Json)
}

/// GET /api/v1/resumes/demo
///
/// The labeled demonstration profile, for UIs that prefer an example over an error.
pub async fn handle_demo() -> Json<ResumeProfile> {
    Json(ResumeProfile::demonstration())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn optimize(
    state: &AppState,
    request_id: Uuid,
    resume_text: &str,
    job_text: &str,
) -> Result<OptimizeResponse, AppError> {
    if resume_text.trim().is_empty() {
        warn!("Résumé text is empty; optimizing from the job description alone");
    }
    info!(
        "Optimizing résumé ({} chars) for job description ({} chars)",
        resume_text.chars().count(),
        job_text.chars().count()
    );

    let optimization = state.optimizer.optimize(resume_text, job_text).await?;

    Ok(OptimizeResponse {
        request_id,
        provider: optimization.provider,
        generated_at: Utc::now(),
        profile: optimization.profile,
        attempts: optimization.attempts,
    })
}

fn validate_job_description(raw: &str, max_chars: usize) -> Result<&str, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "job_description exceeds {max_chars} characters"
        )));
    }
    Ok(trimmed)
}
