use std::path::Path;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use bytes::Bytes;

use crate::analysis::pipeline::{AnalysisPipeline, ResumeUpload, UploadOutcome};
use crate::auth::SessionIdentity;
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field names accepted for the document.
const FILE_FIELDS: [&str; 2] = ["file", "resume"];
const DEFAULT_FILE_NAME: &str = "resume.pdf";

/// POST /api/v1/resumes
pub async fn handle_upload(
    State(state): State<AppState>,
    identity: SessionIdentity,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Response, AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;

    let pipeline = AnalysisPipeline::new(
        state.generator.as_ref(),
        state.store.as_ref(),
        state.config.min_resume_chars,
    );
    match pipeline.process_upload(&identity, upload).await {
        Ok(resume) => Ok((StatusCode::CREATED, Json(UploadOutcome::created(resume))).into_response()),
        Err(e) => Ok(e.into_response()),
    }
}

/// Pulls the first document field out of the form. Other fields are drained
/// and ignored.
async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<ResumeUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, max_bytes))? {
        let is_file = field
            .name()
            .map(|n| FILE_FIELDS.contains(&n))
            .unwrap_or(false);
        if !is_file {
            field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        if !looks_like_pdf(field.content_type(), &file_name) {
            return Err(AppError::Validation("Only PDF files are allowed".to_string()));
        }

        let data: Bytes = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;
        if data.is_empty() {
            return Err(AppError::Validation("The uploaded file is empty".to_string()));
        }
        if data.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        return Ok(ResumeUpload { file_name, data });
    }
    Err(AppError::Validation("No resume file provided".to_string()))
}

fn looks_like_pdf(content_type: Option<&str>, file_name: &str) -> bool {
    let by_type = content_type
        .map(|ct| ct.trim().eq_ignore_ascii_case("application/pdf"))
        .unwrap_or(false);
    let by_extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    by_type || by_extension
}

fn multipart_error(e: MultipartError, max_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_bytes)
    } else {
        AppError::Validation(format!("Invalid upload: {}", e.body_text()))
    }
}

fn too_large(max_bytes: usize) -> AppError {
    const MIB: usize = 1024 * 1024;
    let limit = if max_bytes % MIB == 0 {
        format!("{}MB", max_bytes / MIB)
    } else {
        format!("{max_bytes} bytes")
    };
    AppError::UploadTooLarge(format!("File too large. Maximum size is {limit}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detected_by_content_type_or_extension() {
        assert!(looks_like_pdf(Some("application/pdf"), "upload"));
        assert!(looks_like_pdf(Some("Application/PDF"), "upload.bin"));
        assert!(looks_like_pdf(None, "Jane_Doe.PDF"));
        assert!(looks_like_pdf(Some("application/octet-stream"), "cv.pdf"));
    }

    #[test]
    fn test_non_pdf_rejected() {
        assert!(!looks_like_pdf(Some("image/png"), "scan.png"));
        assert!(!looks_like_pdf(None, "resume.docx"));
        assert!(!looks_like_pdf(None, "pdf"));
    }

    #[test]
    fn test_too_large_message_names_limit() {
        let AppError::UploadTooLarge(message) = too_large(10 * 1024 * 1024) else {
            panic!("expected UploadTooLarge");
        };
        assert_eq!(message, "File too large. Maximum size is 10MB");

        let AppError::UploadTooLarge(message) = too_large(1500) else {
            panic!("expected UploadTooLarge");
        };
        assert_eq!(message, "File too large. Maximum size is 1500 bytes");
    }
}
