//! In-memory stores backing the pipeline and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeRow};
use crate::models::session::SessionRow;
use crate::store::{ResumeStore, SessionStore, StoreError};

#[derive(Default)]
pub struct MemoryResumeStore {
    rows: Mutex<Vec<ResumeRow>>,
    fail_writes: bool,
}

impl MemoryResumeStore {
    /// A store whose inserts fail like a lost database connection.
    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn rows(&self) -> Vec<ResumeRow> {
        self.rows.lock().unwrap().clone()
    }

    /// Inserts a row with an explicit upload time.
    pub fn seed(&self, user_id: &str, name: &str, score: &str, uploaded_at: DateTime<Utc>) -> ResumeRow {
        let row = ResumeRow {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            uploaded_at,
            score: score.to_string(),
            issues: "- Vague bullets".to_string(),
            improvements: "- Quantify results".to_string(),
            latex: r#"{"skills":"\\section{Skills}"}"#.to_string(),
        };
        self.rows.lock().unwrap().push(row.clone());
        row
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn create(&self, resume: NewResume) -> Result<ResumeRow, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        let mut rows = self.rows.lock().unwrap();
        // Keep uploaded_at strictly increasing so ordering is deterministic.
        let uploaded_at = rows
            .iter()
            .map(|r| r.uploaded_at + Duration::milliseconds(1))
            .max()
            .unwrap_or_else(Utc::now)
            .max(Utc::now());
        let row = ResumeRow {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            name: resume.name,
            uploaded_at,
            score: resume.score,
            issues: resume.issues,
            improvements: resume.improvements,
            latex: resume.latex,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_recent(&self, user_id: &str, limit: i64) -> Result<Vec<ResumeRow>, StoreError> {
        let mut owned: Vec<ResumeRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        owned.truncate(limit.max(0) as usize);
        Ok(owned)
    }

    async fn find_owned(&self, id: Uuid, user_id: &str) -> Result<Option<ResumeRow>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionRow>>,
}

impl MemorySessionStore {
    pub fn with_session(self, token: &str, user_id: &str) -> Self {
        self.insert(token, user_id, Utc::now() + Duration::hours(1));
        self
    }

    pub fn with_expired_session(self, token: &str, user_id: &str) -> Self {
        self.insert(token, user_id, Utc::now() - Duration::hours(1));
        self
    }

    fn insert(&self, token: &str, user_id: &str, expires: DateTime<Utc>) {
        self.sessions.lock().unwrap().insert(
            token.to_string(),
            SessionRow {
                session_token: token.to_string(),
                user_id: user_id.to_string(),
                expires,
            },
        );
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn resolve(&self, session_token: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(session_token)
            .filter(|s| s.is_live_at(Utc::now()))
            .map(|s| s.user_id.clone()))
    }
}
