//! Data access for resume records and provider sessions.
//!
//! Handlers never touch a global client: `AppState` carries these traits as
//! `Arc<dyn ...>`, constructed once at startup.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeRow};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::{PgResumeStore, PgSessionStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Append-only access to resume records, always scoped by owner.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Inserts one record and returns it as stored.
    async fn create(&self, resume: NewResume) -> Result<ResumeRow, StoreError>;

    /// The owner's most recent records, newest first.
    async fn list_recent(&self, user_id: &str, limit: i64) -> Result<Vec<ResumeRow>, StoreError>;

    /// A record by id, only if `user_id` owns it.
    async fn find_owned(&self, id: Uuid, user_id: &str) -> Result<Option<ResumeRow>, StoreError>;
}

/// Resolves an auth-provider session token to the opaque user identifier.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// `None` for unknown or expired tokens.
    async fn resolve(&self, session_token: &str) -> Result<Option<String>, StoreError>;
}
