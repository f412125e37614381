//! The upload pipeline: extract -> gate -> prompt -> model -> parse -> validate -> store.
//!
//! Strictly sequential. Every failure is terminal for the request and nothing
//! is written unless the analysis validated.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::analysis::extract::{
    classification_gate, extract_pdf_text, ExtractionError, GateDecision, TOO_LITTLE_TEXT_MESSAGE,
};
use crate::analysis::locate::LocateError;
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::analysis::validation::{interpret_completion, Analysis};
use crate::auth::SessionIdentity;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::resume::{NewResume, ResumeRow};
use crate::store::{ResumeStore, StoreError};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Resume uploaded & processed successfully!";
pub const NO_JSON_MESSAGE: &str = "Failed to parse analysis from the model.";
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse analysis JSON.";
pub const INCOMPLETE_MESSAGE: &str =
    "The analysis response was incomplete. Please try again with a clearer resume PDF.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process resume";

/// An uploaded document as received from the client.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Not a resume: {message}")]
    NotAResume { message: String },

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("Analysis could not be parsed: {0}")]
    ParseFailure(LocateError),

    #[error("Analysis is missing fields: {missing:?}")]
    IncompleteAnalysis { missing: Vec<&'static str> },

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl PipelineError {
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::NotAResume { .. } | PipelineError::Extraction(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PipelineError::Model(_)
            | PipelineError::ParseFailure(_)
            | PipelineError::IncompleteAnalysis { .. } => StatusCode::BAD_GATEWAY,
            PipelineError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the user. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::NotAResume { message } => message.clone(),
            PipelineError::ParseFailure(LocateError::NoJson) => NO_JSON_MESSAGE.to_string(),
            PipelineError::ParseFailure(_) => PARSE_FAILURE_MESSAGE.to_string(),
            PipelineError::IncompleteAnalysis { .. } => INCOMPLETE_MESSAGE.to_string(),
            PipelineError::Extraction(_)
            | PipelineError::Model(_)
            | PipelineError::Persistence(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Structured result of an upload, success or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_resume: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeRow>,
}

impl UploadOutcome {
    pub fn created(resume: ResumeRow) -> Self {
        Self {
            success: true,
            not_resume: false,
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            resume: Some(resume),
        }
    }

    pub fn failed(error: &PipelineError) -> Self {
        Self {
            success: false,
            not_resume: matches!(error, PipelineError::NotAResume { .. }),
            message: error.user_message(),
            resume: None,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        match &self {
            PipelineError::NotAResume { .. } | PipelineError::IncompleteAnalysis { .. } => {
                warn!("Resume rejected: {self}")
            }
            PipelineError::ParseFailure(_) => warn!("Resume analysis unusable: {self}"),
            PipelineError::Extraction(_) | PipelineError::Model(_) | PipelineError::Persistence(_) => {
                error!("Error processing resume: {self}")
            }
        }
        (self.status(), Json(UploadOutcome::failed(&self))).into_response()
    }
}

/// One run of the pipeline, borrowing its collaborators from `AppState`.
pub struct AnalysisPipeline<'a> {
    generator: &'a dyn TextGenerator,
    store: &'a dyn ResumeStore,
    min_resume_chars: usize,
}

impl<'a> AnalysisPipeline<'a> {
    pub fn new(
        generator: &'a dyn TextGenerator,
        store: &'a dyn ResumeStore,
        min_resume_chars: usize,
    ) -> Self {
        Self {
            generator,
            store,
            min_resume_chars,
        }
    }

    pub async fn process_upload(
        &self,
        identity: &SessionIdentity,
        upload: ResumeUpload,
    ) -> Result<ResumeRow, PipelineError> {
        info!(
            user_id = %identity.user_id,
            file_name = %upload.file_name,
            bytes = upload.data.len(),
            "Processing resume"
        );
        let text = extract_pdf_text(upload.data).await?;
        self.analyze_text(identity, &upload.file_name, &text).await
    }

    /// Everything after extraction. The model is only called for text that
    /// passes the classification gate.
    pub async fn analyze_text(
        &self,
        identity: &SessionIdentity,
        name: &str,
        text: &str,
    ) -> Result<ResumeRow, PipelineError> {
        let text = match classification_gate(text, self.min_resume_chars) {
            GateDecision::Proceed(text) => text,
            GateDecision::TooShort { .. } => {
                return Err(PipelineError::NotAResume {
                    message: TOO_LITTLE_TEXT_MESSAGE.to_string(),
                })
            }
        };

        let prompt = build_analysis_prompt(&text);
        let completion = self.generator.generate(&prompt, ANALYSIS_SYSTEM).await?;
        debug!(
            model = self.generator.model_name(),
            chars = completion.len(),
            "Model completion received"
        );

        let analysis = match interpret_completion(&completion) {
            Analysis::Valid(analysis) => analysis,
            Analysis::NotResume { message } => return Err(PipelineError::NotAResume { message }),
            Analysis::Malformed(e) => return Err(PipelineError::ParseFailure(e)),
            Analysis::Incomplete { missing } => {
                return Err(PipelineError::IncompleteAnalysis { missing })
            }
        };

        let latex = analysis.latex_json();
        let resume = self
            .store
            .create(NewResume {
                user_id: identity.user_id.clone(),
                name: name.to_string(),
                score: analysis.score,
                issues: analysis.issues,
                improvements: analysis.improvements,
                latex,
            })
            .await?;

        info!(
            resume_id = %resume.id,
            user_id = %resume.user_id,
            score = %resume.score,
            "Resume analysis stored"
        );
        Ok(resume)
    }
}
