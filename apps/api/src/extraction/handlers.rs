//! Axum route handlers for résumé upload and text extraction.

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::extraction::{extract_resume, ExtractedResume, ExtractionError};

/// Multipart field carrying the PDF.
pub const RESUME_FIELD: &str = "resume";
/// Multipart field carrying the job description text.
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// Fields of interest pulled from a multipart upload.
#[derive(Debug, Default)]
pub struct ResumeUpload {
    pub resume: Option<Bytes>,
    pub job_description: Option<String>,
}

impl ResumeUpload {
    pub fn require_resume(&mut self) -> Result<Bytes, AppError> {
        self.resume
            .take()
            .ok_or_else(|| AppError::Validation(format!("missing '{RESUME_FIELD}' file field")))
    }
}

/// Reads the whole multipart body, keeping only the known fields.
pub async fn read_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut upload = ResumeUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                upload.resume = Some(field.bytes().await.map_err(multipart_error)?);
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                upload.job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(upload)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}

/// Runs PDF extraction on the blocking pool.
pub async fn extract_upload(bytes: Bytes) -> Result<ExtractedResume, AppError> {
    let size = bytes.len();
    let extracted = tokio::task::spawn_blocking(move || extract_resume(&bytes))
        .await
        .map_err(extraction_join_error)??;

    if extracted.text.is_empty() {
        warn!("No text could be extracted from a {} byte PDF", size);
    } else {
        info!(
            "Extracted {} characters from a {} byte PDF",
            extracted.text.chars().count(),
            size
        );
    }

    Ok(extracted)
}

/// A panic inside the PDF parser is a property of the uploaded file, not of the server.
fn extraction_join_error(e: JoinError) -> AppError {
    if e.is_panic() {
        warn!("PDF parser panicked on an uploaded file");
        ExtractionError::Pdf("the PDF parser could not read this file".to_string()).into()
    } else {
        AppError::Internal(e.into())
    }
}

/// POST /api/v1/resumes/extract
///
/// Returns the résumé text and its heading-based section split.
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractedResume>, AppError> {
    let mut upload = read_upload(multipart).await?;
    let bytes = upload.require_resume()?;

    Ok(Json(extract_upload(bytes).await?))
}
