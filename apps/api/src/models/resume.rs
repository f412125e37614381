use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One analyzed resume. Rows are inserted once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub score: String,
    pub issues: String,
    pub improvements: String,
    /// JSON object text: section name -> LaTeX snippet.
    pub latex: String,
}

/// Insert payload for a validated analysis.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: String,
    pub name: String,
    pub score: String,
    pub issues: String,
    pub improvements: String,
    pub latex: String,
}
