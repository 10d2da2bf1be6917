use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::handlers::{run_analysis, AnalyzeResponse};
use crate::editor::command::EditorCommand;
use crate::editor::registry::SessionView;
use crate::errors::AppError;
use crate::models::cv::CvDocument;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub cv_id: String,
    pub content: CvDocument,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStatusRequest {
    pub is_saving: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalyzeRequest {
    pub target_role: Option<String>,
}

/// POST /api/v1/editor/sessions
pub async fn handle_open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    if req.cv_id.trim().is_empty() {
        return Err(AppError::Validation("cvId must not be empty".into()));
    }
    let view = state.editor.open(req.cv_id, req.content).await;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/editor/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.editor.view(id).await?))
}

/// DELETE /api/v1/editor/sessions/:id
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.editor.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/editor/sessions/:id/commands
pub async fn handle_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(command): Json<EditorCommand>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.editor.apply(id, command).await?))
}

/// PUT /api/v1/editor/sessions/:id/save-status
pub async fn handle_save_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveStatusRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .editor
        .update_save_status(id, req.is_saving, req.last_saved_at)
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/editor/sessions/:id/analyze
pub async fn handle_analyze_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SessionAnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let cv = state.editor.current_cv(id).await?;
    let response = run_analysis(&state, &cv, req.target_role.as_deref()).await?;
    Ok(Json(response))
}
