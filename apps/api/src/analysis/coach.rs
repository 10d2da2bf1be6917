use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::{build_coach_prompt, COACH_SYSTEM};
use crate::analysis::report::AnalysisReport;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::cv::CvDocument;

/// Prose feedback layered on top of a heuristic report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingFeedback {
    pub headline: String,
    pub priorities: Vec<String>,
    #[serde(default)]
    pub keyword_advice: Vec<String>,
    pub encouragement: String,
}

pub async fn coach(
    llm: &LlmClient,
    cv: &CvDocument,
    target_role: Option<&str>,
    report: &AnalysisReport,
) -> Result<CoachingFeedback, LlmError> {
    let cv_json = serde_json::to_string_pretty(cv)?;
    let analysis_json = serde_json::to_string_pretty(report)?;
    let prompt = build_coach_prompt(&cv_json, &analysis_json, target_role);
    let system = format!("{COACH_SYSTEM}\n\n{JSON_ONLY_SYSTEM}");

    let feedback: CoachingFeedback = llm.call_json(&prompt, &system).await?;
    info!(
        "Coaching generated: {} priorities, overall score {}",
        feedback.priorities.len(),
        report.overall_score
    );
    Ok(feedback)
}
