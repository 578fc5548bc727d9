use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::screening::job_role::RoleReason;

/// Every way an ATS evaluation can stop. The first six are user-correctable
/// input problems; the last two are upstream/service failures.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Both a resume file and a job role are required")]
    MissingInput,

    #[error("Invalid job role ({}): {message}", .reason.code())]
    InvalidJobRole { reason: RoleReason, message: String },

    #[error("Unsupported file type: '{file_name}'")]
    UnsupportedFileType { file_name: String },

    #[error("No extractable text in document ({})", .detail.as_deref().unwrap_or("no text on any page"))]
    UnextractableDocument { detail: Option<String> },

    #[error("Document too short: {char_count} characters (minimum {min_chars})")]
    DocumentTooShort { char_count: usize, min_chars: usize },

    #[error("Document does not look like a resume")]
    NotResumeLike,

    #[error("Upstream generation failed: {0}")]
    UpstreamGenerationFailure(String),

    #[error("Unparseable AI response: {0}")]
    UnparseableGenerationResponse(String),
}

impl EvaluationError {
    pub fn code(&self) -> &'static str {
        match self {
            EvaluationError::MissingInput => "missing-input",
            EvaluationError::InvalidJobRole { .. } => "invalid-job-role",
            EvaluationError::UnsupportedFileType { .. } => "unsupported-file-type",
            EvaluationError::UnextractableDocument { .. } => "no-extractable-text",
            EvaluationError::DocumentTooShort { .. } => "too-short",
            EvaluationError::NotResumeLike => "not-resume-like",
            EvaluationError::UpstreamGenerationFailure(_) => "upstream-failure",
            EvaluationError::UnparseableGenerationResponse(_) => "unparseable-ai-response",
        }
    }

    /// True for conditions the user can fix by changing their request.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            EvaluationError::UpstreamGenerationFailure(_)
                | EvaluationError::UnparseableGenerationResponse(_)
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            EvaluationError::MissingInput | EvaluationError::InvalidJobRole { .. } => {
                StatusCode::BAD_REQUEST
            }
            EvaluationError::UnsupportedFileType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            EvaluationError::UnextractableDocument { .. }
            | EvaluationError::DocumentTooShort { .. }
            | EvaluationError::NotResumeLike => StatusCode::UNPROCESSABLE_ENTITY,
            EvaluationError::UpstreamGenerationFailure(_)
            | EvaluationError::UnparseableGenerationResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn to_body(&self) -> Value {
        let (error, detail) = match self {
            EvaluationError::MissingInput => (
                "Invalid input",
                "Upload a PDF resume and enter the job role you are targeting.".to_string(),
            ),
            EvaluationError::InvalidJobRole { message, .. } => ("Invalid job role", message.clone()),
            EvaluationError::UnsupportedFileType { .. } => (
                "Unsupported file type",
                "Only PDF resumes are supported.".to_string(),
            ),
            EvaluationError::UnextractableDocument { .. } => (
                "No readable text found",
                "The PDF appears to be scanned or image-only. Export a text-based PDF and try again."
                    .to_string(),
            ),
            EvaluationError::DocumentTooShort { min_chars, .. } => (
                "Resume too short",
                format!("The resume must contain at least {min_chars} characters of text."),
            ),
            EvaluationError::NotResumeLike => (
                "Not a resume",
                "The document does not look like a resume. Include sections such as Experience, Education or Skills."
                    .to_string(),
            ),
            EvaluationError::UpstreamGenerationFailure(_) => (
                "AI failure",
                "The AI service is unavailable. Please try again later.".to_string(),
            ),
            EvaluationError::UnparseableGenerationResponse(_) => (
                "AI failure",
                "The AI service returned an unreadable response. Please try again.".to_string(),
            ),
        };

        json!({
            "error": error,
            "code": self.code(),
            "detail": detail,
        })
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Evaluation(e) => {
                if e.is_input_error() {
                    tracing::info!("Rejected ATS request: {e}");
                } else {
                    tracing::error!("ATS evaluation failed: {e}");
                }
                (e.status(), e.to_body())
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid input", "code": "validation", "detail": msg }),
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": "Upload too large", "code": "payload-too-large", "detail": msg }),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred", "code": "internal" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
