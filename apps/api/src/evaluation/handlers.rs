//! Axum route handlers for the ATS API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::evaluation::models::AtsEvaluation;
use crate::evaluation::pipeline::{EvaluationPipeline, Upload};
use crate::screening::extraction::PdfDocument;
use crate::screening::job_role::{validate_job_role, JobRoleValidation};
use crate::state::AppState;

/// Multipart field carrying the résumé file.
const RESUME_FIELD: &str = "resume";
/// Multipart field carrying the target role.
const JOB_ROLE_FIELD: &str = "job_role";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AtsTextRequest {
    #[serde(default, alias = "jobRole")]
    pub job_role: Option<String>,
    #[serde(default, alias = "resumeText")]
    pub resume_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRoleRequest {
    #[serde(default, alias = "jobRole")]
    pub job_role: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats
///
/// Multipart upload: `resume` (PDF file) + `job_role` (text).
/// Runs the full screening pipeline, then scores the résumé with the LLM.
pub async fn handle_ats_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AtsEvaluation>, AppError> {
    let mut job_role: Option<String> = None;
    let mut upload: Option<Upload<PdfDocument>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Invalid file upload", e))?;
                upload = Some(Upload {
                    file_name,
                    document: PdfDocument::new(data),
                });
            }
            Some(JOB_ROLE_FIELD) | Some("jobRole") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Invalid job role field", e))?;
                job_role = Some(text);
            }
            _ => {}
        }
    }

    let pipeline = EvaluationPipeline::new(state.generator.as_ref(), &state.vocabulary);
    let evaluation = pipeline
        .evaluate_document(job_role.as_deref(), upload)
        .await?;
    Ok(Json(evaluation))
}

/// A body cut off by the upload limit is 413; anything else is a bad request.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}

/// POST /api/v1/ats/text
///
/// Same evaluation for résumé text the client already extracted.
pub async fn handle_ats_text(
    State(state): State<AppState>,
    Json(request): Json<AtsTextRequest>,
) -> Result<Json<AtsEvaluation>, AppError> {
    let pipeline = EvaluationPipeline::new(state.generator.as_ref(), &state.vocabulary);
    let evaluation = pipeline
        .evaluate_text(request.job_role.as_deref(), request.resume_text.as_deref())
        .await?;
    Ok(Json(evaluation))
}

/// POST /api/v1/job-role/validate
///
/// Pre-checks a job role without uploading anything. Always 200; the verdict
/// is in the body.
pub async fn handle_validate_role(
    State(state): State<AppState>,
    Json(request): Json<ValidateRoleRequest>,
) -> Json<JobRoleValidation> {
    Json(validate_job_role(&request.job_role, &state.vocabulary))
}
