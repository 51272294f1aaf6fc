//! Axum route handlers for the Session API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::report::{normalize_report, AnalysisView, CategoryKey, RawReport};
use crate::session::navigation::RegistryState;
use crate::session::Anchor;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub key: CategoryKey,
    pub registered: usize,
    pub state: RegistryState,
}

#[derive(Debug, Serialize)]
pub struct ScrollResponse {
    pub key: CategoryKey,
    /// `None` when nothing is registered for the key.
    pub anchor: Option<Anchor>,
}

fn parse_key(raw: &str) -> Result<CategoryKey, AppError> {
    raw.parse::<CategoryKey>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>), AppError> {
    let session_id = state.sessions.create().await?;
    Ok((StatusCode::CREATED, Json(SessionCreated { session_id })))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/report
///
/// Replaces the session's view. Anchors registered for the previous view are
/// dropped even when the new report turns out to have no result. Normalization
/// runs before the store lock is taken.
pub async fn handle_present_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(report): Json<RawReport>,
) -> Result<Json<AnalysisView>, AppError> {
    let view = normalize_report(report);
    state
        .sessions
        .update(id, |session| session.install(view).cloned())
        .await?
        .map(Json)
        .ok_or(AppError::NoResult)
}

/// GET /api/v1/sessions/:id/view
pub async fn handle_get_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisView>, AppError> {
    state
        .sessions
        .read(id, |session| session.view().cloned())
        .await?
        .map(Json)
        .ok_or(AppError::NoResult)
}

/// PUT /api/v1/sessions/:id/anchors/:key
pub async fn handle_register_anchor(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
    Json(anchor): Json<Anchor>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let key = parse_key(&key)?;
    let response = state
        .sessions
        .update(id, |session| {
            session.register(key, anchor);
            RegistrationResponse {
                key,
                registered: session.navigation().len(),
                state: session.navigation().state(),
            }
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/scroll/:key
pub async fn handle_scroll(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
) -> Result<Json<ScrollResponse>, AppError> {
    let key = parse_key(&key)?;
    let anchor = state
        .sessions
        .read(id, |session| session.scroll_to(key).cloned())
        .await?;
    Ok(Json(ScrollResponse { key, anchor }))
}

/// DELETE /api/v1/sessions/:id/anchors
pub async fn handle_clear_anchors(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .update(id, |session| session.unregister_all())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
