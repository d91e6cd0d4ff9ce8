//! Axum route handler for the Render API.

use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeProfile;
use crate::render::{file_name, typst::to_typst, RenderDocument};

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub file_name: String,
    pub document: RenderDocument,
    pub typst_source: String,
}

/// POST /api/v1/resumes/render
///
/// Lays out an optimized profile for export and returns the Typst source alongside
/// the structured document. Rasterizing to PDF is left to the caller.
pub async fn handle_render(
    Json(profile): Json<ResumeProfile>,
) -> Result<Json<RenderResponse>, AppError> {
    let document = RenderDocument::from_profile(&profile)?;
    let typst_source = to_typst(&document);
    let file_name = file_name(&profile.name);
    info!("Rendered {} ({} sections)", file_name, document.sections.len());

    Ok(Json(RenderResponse {
        file_name,
        document,
        typst_source,
    }))
}
