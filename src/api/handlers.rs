//! Request handlers for the status and summarization routes.

use crate::api::error::ApiError;
use crate::output::{StatusResponse, SummaryResponse};
use crate::pipeline::input::UploadedDocument;
use crate::summarize::DocumentPipeline;
use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;
use tracing::info;

/// Liveness probe.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Nyaya Document Intelligence API is running.".to_string(),
    })
}

/// Summarise an uploaded PDF.
///
/// # Request
///
/// - **Method**: POST
/// - **Content-Type**: multipart/form-data
/// - **Body**: the PDF in field `file`
///
/// # Response
///
/// - **200**: `{"text": "<summary>"}`
/// - **400**: not a `.pdf` filename, empty body, or no `file` field
/// - **500**: the document could not be processed
/// - **502**: summarization failed and the server propagates upstream errors
///
/// ```bash
/// curl -X POST http://localhost:8000/extract-text/ -F "file=@judgment.pdf"
/// ```
pub async fn extract_text(
    State(pipeline): State<Arc<DocumentPipeline>>,
    mut multipart: Multipart,
) -> Result<Json<SummaryResponse>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("No file provided in upload".into()))?;

    info!("Received upload '{}' ({} bytes)", filename, bytes.len());
    let document = UploadedDocument::validate(&filename, bytes)?;

    let summary = pipeline.summarize(document.into_bytes()).await?;
    Ok(Json(SummaryResponse { text: summary }))
}
