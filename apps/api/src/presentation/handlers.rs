use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::auth::SessionIdentity;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::presentation::queries::{fetch_recent_resumes, fetch_resume_by_id, RECENT_LIMIT};
use crate::presentation::views::{DashboardView, ResumeDetailResponse};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeRow>,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    identity: SessionIdentity,
    WithRejection(Query(params), _): WithRejection<Query<ListQuery>, AppError>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = fetch_recent_resumes(state.store.as_ref(), &identity, params.limit).await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    identity: SessionIdentity,
    Path(id): Path<String>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let row = fetch_resume_by_id(state.store.as_ref(), &identity, &id).await?;
    Ok(Json(ResumeDetailResponse::from_row(row)))
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    identity: SessionIdentity,
) -> Result<Json<DashboardView>, AppError> {
    let rows = fetch_recent_resumes(state.store.as_ref(), &identity, Some(RECENT_LIMIT)).await?;
    Ok(Json(DashboardView::from_recent(&rows)))
}
