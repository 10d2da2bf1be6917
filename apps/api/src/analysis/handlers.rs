use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::coach::{coach, CoachingFeedback};
use crate::analysis::report::AnalysisReport;
use crate::analysis::validation::{check_consistency, ConsistencyWarning};
use crate::errors::AppError;
use crate::models::cv::CvDocument;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub cv_content: CvDocument,
    pub target_role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: AnalysisReport,
    pub warnings: Vec<ConsistencyWarning>,
    pub backend: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachResponse {
    pub analysis: AnalysisReport,
    pub coaching: CoachingFeedback,
}

/// Scores `cv` with the configured analyzer and attaches consistency warnings.
pub async fn run_analysis(
    state: &AppState,
    cv: &CvDocument,
    target_role: Option<&str>,
) -> Result<AnalyzeResponse, AppError> {
    let analysis = state.analyzer.analyze(cv, target_role).await?;
    Ok(AnalyzeResponse {
        analysis,
        warnings: check_consistency(cv),
        backend: state.analyzer.backend(),
    })
}

/// POST /api/v1/cv/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = run_analysis(&state, &req.cv_content, req.target_role.as_deref()).await?;
    Ok(Json(response))
}

/// POST /api/v1/cv/coach
pub async fn handle_coach(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<CoachResponse>, AppError> {
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::LlmUnavailable("Coaching requires ANTHROPIC_API_KEY to be configured".into())
    })?;
    let target_role = req.target_role.as_deref();
    let analysis = state.analyzer.analyze(&req.cv_content, target_role).await?;
    let coaching = coach(llm, &req.cv_content, target_role, &analysis).await?;
    Ok(Json(CoachResponse { analysis, coaching }))
}
