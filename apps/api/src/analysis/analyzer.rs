//! CV analysis: a pluggable, trait-based analyzer producing a scored report.
//!
//! Default: `HeuristicAnalyzer` (pure Rust, deterministic, no I/O).
//! `AppState` holds an `Arc<dyn CvAnalyzer>` so other backends can be swapped in
//! without touching handlers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::keywords::{analyze_keywords, KeywordPolicy};
use crate::analysis::report::{AnalysisReport, SectionAnalysis, SectionScores};
use crate::analysis::sections::{
    analyze_education, analyze_experience, analyze_personal_info, analyze_projects,
    analyze_skills, analyze_summary,
};
use crate::errors::AppError;
use crate::models::cv::CvDocument;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionWeights {
    pub personal_info: f64,
    pub summary: f64,
    pub experience: f64,
    pub education: f64,
    pub skills: f64,
    pub projects: f64,
}

impl Default for SectionWeights {
    fn default() -> Self {
        Self {
            personal_info: 0.10,
            summary: 0.15,
            experience: 0.30,
            education: 0.15,
            skills: 0.15,
            projects: 0.15,
        }
    }
}

/// Weighted composite of the six section scores, rounded to an integer.
pub fn compute_overall_score(scores: &SectionScores, weights: &SectionWeights) -> u32 {
    let weighted = scores.personal_info as f64 * weights.personal_info
        + scores.summary as f64 * weights.summary
        + scores.experience as f64 * weights.experience
        + scores.education as f64 * weights.education
        + scores.skills as f64 * weights.skills
        + scores.projects as f64 * weights.projects;
    weighted.round().clamp(0.0, 100.0) as u32
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalyzerConfig {
    pub weights: SectionWeights,
    pub keyword_policy: KeywordPolicy,
}

/// Analyzes a CV with the default weights and keyword policy.
pub fn analyze_cv(cv: &CvDocument, target_role: Option<&str>) -> AnalysisReport {
    analyze_with(cv, target_role, &AnalyzerConfig::default())
}

pub fn analyze_with(
    cv: &CvDocument,
    target_role: Option<&str>,
    config: &AnalyzerConfig,
) -> AnalysisReport {
    let personal_info = analyze_personal_info(&cv.personal_info);
    let summary = analyze_summary(cv.summary.as_deref());
    let experience = analyze_experience(&cv.experience);
    let education = analyze_education(&cv.education);
    let skills = analyze_skills(&cv.skills);
    let projects = analyze_projects(&cv.projects);

    let section_scores = SectionScores {
        personal_info: personal_info.score,
        summary: summary.score,
        experience: experience.score,
        education: education.score,
        skills: skills.score,
        projects: projects.score,
    };
    let overall_score = compute_overall_score(&section_scores, &config.weights);

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut suggestions = Vec::new();
    for section in [personal_info, summary, experience, education, skills, projects] {
        let SectionAnalysis {
            strengths: s,
            weaknesses: w,
            suggestions: g,
            ..
        } = section;
        strengths.extend(s);
        weaknesses.extend(w);
        suggestions.extend(g);
    }

    let keyword_optimization = analyze_keywords(cv, target_role, config.keyword_policy);

    debug!(
        "CV analysis complete: overall={overall_score}, {} strengths, {} weaknesses",
        strengths.len(),
        weaknesses.len()
    );

    AnalysisReport {
        overall_score,
        strengths,
        weaknesses,
        suggestions,
        keyword_optimization,
        section_scores,
    }
}

/// The analyzer trait. Implement this to swap backends without touching
/// handlers or callers.
///
/// Carried in `AppState` as `Arc<dyn CvAnalyzer>`.
#[async_trait]
pub trait CvAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        cv: &CvDocument,
        target_role: Option<&str>,
    ) -> Result<AnalysisReport, AppError>;

    /// Short label reported alongside results ("heuristic", ...).
    fn backend(&self) -> &'static str;
}

/// Rule-based analyzer. Fast, deterministic, no LLM call.
#[derive(Debug, Clone, Default)]
pub struct HeuristicAnalyzer {
    pub config: AnalyzerConfig,
}

impl HeuristicAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CvAnalyzer for HeuristicAnalyzer {
    async fn analyze(
        &self,
        cv: &CvDocument,
        target_role: Option<&str>,
    ) -> Result<AnalysisReport, AppError> {
        Ok(analyze_with(cv, target_role, &self.config))
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}
