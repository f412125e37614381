use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeRow};
use crate::models::session::SessionRow;
use crate::store::{ResumeStore, SessionStore, StoreError};

#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn create(&self, resume: NewResume) -> Result<ResumeRow, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, user_id, name, score, issues, improvements, latex)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, name, uploaded_at, score, issues, improvements, latex
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&resume.user_id)
        .bind(&resume.name)
        .bind(&resume.score)
        .bind(&resume.issues)
        .bind(&resume.improvements)
        .bind(&resume.latex)
        .fetch_one(&self.pool)
        .await?;

        info!(resume_id = %row.id, user_id = %row.user_id, "Inserted resume record");
        Ok(row)
    }

    async fn list_recent(&self, user_id: &str, limit: i64) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, user_id, name, uploaded_at, score, issues, improvements, latex
            FROM resumes
            WHERE user_id = $1
            ORDER BY uploaded_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_owned(&self, id: Uuid, user_id: &str) -> Result<Option<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, user_id, name, uploaded_at, score, issues, improvements, latex
            FROM resumes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn resolve(&self, session_token: &str) -> Result<Option<String>, StoreError> {
        let session: Option<SessionRow> = sqlx::query_as(
            "SELECT session_token, user_id, expires FROM sessions WHERE session_token = $1",
        )
        .bind(session_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session
            .filter(|s| s.is_live_at(chrono::Utc::now()))
            .map(|s| s.user_id))
    }
}
