use serde::{Deserialize, Serialize};

/// Upper bound for every section score and the overall score.
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionScores {
    pub personal_info: u32,
    pub summary: u32,
    pub experience: u32,
    pub education: u32,
    pub skills: u32,
    pub projects: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordOptimization {
    pub missing_keywords: Vec<String>,
    pub present_keywords: Vec<String>,
}

/// Scored feedback for one CV. Recomputed on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub overall_score: u32, // 0 – 100
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub keyword_optimization: KeywordOptimization,
    pub section_scores: SectionScores,
}

/// Result of a single section analyzer. Each analyzer owns its feedback lists;
/// the caller concatenates them in section order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionAnalysis {
    pub score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

impl SectionAnalysis {
    pub fn with_base(score: u32) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }

    pub fn add(&mut self, points: u32) {
        self.score += points;
    }

    pub fn strength(&mut self, text: impl Into<String>) {
        self.strengths.push(text.into());
    }

    pub fn weakness(&mut self, text: impl Into<String>) {
        self.weaknesses.push(text.into());
    }

    pub fn suggestion(&mut self, text: impl Into<String>) {
        self.suggestions.push(text.into());
    }

    /// Clamps the accumulated score to `MAX_SCORE`.
    pub fn finish(mut self) -> Self {
        self.score = self.score.min(MAX_SCORE);
        self
    }
}
