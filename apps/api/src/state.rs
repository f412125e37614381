use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::store::{ResumeStore, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is constructed once in `main` and passed in explicitly.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResumeStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// Generative model behind the analysis pipeline. Default: Gemini `LlmClient`.
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}
