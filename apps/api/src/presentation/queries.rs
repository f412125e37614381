//! Session-scoped reads. Every query filters on the caller's user id; a record
//! owned by someone else is indistinguishable from a missing one.

use tracing::warn;
use uuid::Uuid;

use crate::auth::SessionIdentity;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::store::ResumeStore;

pub const RECENT_LIMIT: i64 = 5;

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(RECENT_LIMIT).clamp(1, RECENT_LIMIT)
}

/// Newest first, at most `RECENT_LIMIT` rows.
pub async fn fetch_recent_resumes(
    store: &dyn ResumeStore,
    identity: &SessionIdentity,
    limit: Option<i64>,
) -> Result<Vec<ResumeRow>, AppError> {
    Ok(store
        .list_recent(&identity.user_id, clamp_limit(limit))
        .await?)
}

pub async fn fetch_resume_by_id(
    store: &dyn ResumeStore,
    identity: &SessionIdentity,
    id: &str,
) -> Result<ResumeRow, AppError> {
    let Ok(id) = Uuid::parse_str(id.trim()) else {
        warn!(user_id = %identity.user_id, "Malformed resume id requested");
        return Err(AppError::access_denied());
    };
    match store.find_owned(id, &identity.user_id).await? {
        Some(row) => Ok(row),
        None => {
            warn!(user_id = %identity.user_id, resume_id = %id, "Resume not found for caller");
            Err(AppError::access_denied())
        }
    }
}
