use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A session written by the external auth provider. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRow {
    pub session_token: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
}

impl SessionRow {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }
}
