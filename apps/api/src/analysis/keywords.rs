//! ATS keyword coverage: which well-known keywords appear anywhere in the CV,
//! and which are missing, optionally biased toward a target role.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::report::KeywordOptimization;
use crate::models::cv::CvDocument;

const COMMON_KEYWORDS: &[&str] = &[
    "leadership",
    "team",
    "project management",
    "agile",
    "collaboration",
    "communication",
    "problem solving",
    "analysis",
    "strategy",
    "innovation",
];

const TECHNICAL_KEYWORDS: &[&str] = &[
    "javascript",
    "typescript",
    "react",
    "node.js",
    "python",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "api",
    "testing",
];

pub const MAX_PRESENT_KEYWORDS: usize = 10;
pub const MAX_MISSING_KEYWORDS: usize = 8;

/// Role families recognised in a free-text target role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFamily {
    Frontend,
    Backend,
    Fullstack,
    DevOps,
    Data,
}

impl RoleFamily {
    /// Matches the first family whose marker appears in `role` (case-insensitive).
    /// Checked in order: frontend, backend, fullstack, devops, data.
    pub fn detect(role: &str) -> Option<Self> {
        let role = role.to_lowercase();
        if role.contains("frontend") || role.contains("front-end") {
            Some(Self::Frontend)
        } else if role.contains("backend") || role.contains("back-end") {
            Some(Self::Backend)
        } else if role.contains("fullstack") || role.contains("full-stack") {
            Some(Self::Fullstack)
        } else if role.contains("devops") {
            Some(Self::DevOps)
        } else if role.contains("data") {
            Some(Self::Data)
        } else {
            None
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Frontend => &["react", "vue", "angular", "css", "responsive design", "webpack"],
            Self::Backend => &[
                "api",
                "database",
                "microservices",
                "rest",
                "graphql",
                "authentication",
            ],
            Self::Fullstack => &["react", "node.js", "database", "api", "deployment", "ci/cd"],
            Self::DevOps => &["kubernetes", "docker", "ci/cd", "aws", "terraform", "monitoring"],
            Self::Data => &[
                "python",
                "sql",
                "machine learning",
                "analytics",
                "visualization",
                "etl",
            ],
        }
    }
}

/// How role-specific gaps are merged with generic gaps before truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordPolicy {
    /// Generic gaps first, role gaps appended, then truncated. Role gaps only
    /// survive when few generic keywords are missing.
    #[default]
    GenericFirst,
    /// Role gaps first, generic gaps after (without duplicates), then truncated.
    RoleFirst,
}

impl KeywordPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "generic_first" => Some(Self::GenericFirst),
            "role_first" => Some(Self::RoleFirst),
            _ => None,
        }
    }
}

pub fn analyze_keywords(
    cv: &CvDocument,
    target_role: Option<&str>,
    policy: KeywordPolicy,
) -> KeywordOptimization {
    let text = cv_text(cv);

    let (present, mut missing): (Vec<&str>, Vec<&str>) = COMMON_KEYWORDS
        .iter()
        .chain(TECHNICAL_KEYWORDS)
        .copied()
        .partition(|kw| text.contains(kw));

    if let Some(family) = target_role.and_then(RoleFamily::detect) {
        let role_gaps: Vec<&str> = family
            .keywords()
            .iter()
            .copied()
            .filter(|kw| !text.contains(kw))
            .collect();
        debug!("Target role {family:?}: {} role keywords missing", role_gaps.len());

        missing = match policy {
            KeywordPolicy::GenericFirst => {
                missing.extend(role_gaps);
                missing
            }
            KeywordPolicy::RoleFirst => {
                let generic = missing.into_iter().filter(|kw| !role_gaps.contains(kw));
                role_gaps.iter().copied().chain(generic).collect()
            }
        };
    }

    KeywordOptimization {
        present_keywords: present
            .into_iter()
            .take(MAX_PRESENT_KEYWORDS)
            .map(str::to_string)
            .collect(),
        missing_keywords: missing
            .into_iter()
            .take(MAX_MISSING_KEYWORDS)
            .map(str::to_string)
            .collect(),
    }
}

/// Lowercased full-text view of the document: its JSON serialization, which
/// covers every string field in the CV.
fn cv_text(cv: &CvDocument) -> String {
    serde_json::to_string(cv)
        .unwrap_or_default()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{basic_cv, experience, skills};

    #[test]
    fn test_detect_role_family_order() {
        assert_eq!(RoleFamily::detect("Senior Front-End Engineer"), Some(RoleFamily::Frontend));
        assert_eq!(RoleFamily::detect("BACKEND developer"), Some(RoleFamily::Backend));
        assert_eq!(RoleFamily::detect("full-stack dev"), Some(RoleFamily::Fullstack));
        assert_eq!(RoleFamily::detect("DevOps / SRE"), Some(RoleFamily::DevOps));
        assert_eq!(RoleFamily::detect("Data Scientist"), Some(RoleFamily::Data));
        // frontend wins over data when both appear
        assert_eq!(RoleFamily::detect("frontend data viz"), Some(RoleFamily::Frontend));
        assert_eq!(RoleFamily::detect("Product Designer"), None);
    }

    #[test]
    fn test_present_keywords_follow_list_order() {
        let mut cv = basic_cv();
        cv.skills = skills(&["Python", "Docker", "React", "Agile"]);
        cv.summary = Some("Team player with leadership experience".to_string());

        let kw = analyze_keywords(&cv, None, KeywordPolicy::GenericFirst);
        assert_eq!(
            kw.present_keywords,
            vec!["leadership", "team", "agile", "react", "python", "docker"]
        );
        assert_eq!(kw.missing_keywords.len(), MAX_MISSING_KEYWORDS);
        assert_eq!(kw.missing_keywords[0], "project management");
    }

    #[test]
    fn test_present_keywords_truncated_to_ten() {
        let mut cv = basic_cv();
        cv.skills = skills(&[
            "leadership",
            "team",
            "project management",
            "agile",
            "collaboration",
            "communication",
            "problem solving",
            "analysis",
            "strategy",
            "innovation",
            "javascript",
            "typescript",
        ]);
        let kw = analyze_keywords(&cv, None, KeywordPolicy::GenericFirst);
        assert_eq!(kw.present_keywords.len(), MAX_PRESENT_KEYWORDS);
        assert_eq!(kw.present_keywords[9], "innovation");
    }

    #[test]
    fn test_generic_first_crowds_out_role_gaps() {
        let cv = basic_cv();
        let kw = analyze_keywords(&cv, Some("DevOps Engineer"), KeywordPolicy::GenericFirst);
        assert_eq!(kw.missing_keywords.len(), MAX_MISSING_KEYWORDS);
        assert!(!kw.missing_keywords.contains(&"terraform".to_string()));
        assert_eq!(kw.missing_keywords[0], "leadership");
    }

    #[test]
    fn test_role_first_keeps_role_gaps_visible() {
        let cv = basic_cv();
        let kw = analyze_keywords(&cv, Some("DevOps Engineer"), KeywordPolicy::RoleFirst);
        assert_eq!(
            &kw.missing_keywords[..6],
            &["kubernetes", "docker", "ci/cd", "aws", "terraform", "monitoring"]
        );
        assert_eq!(kw.missing_keywords[6], "leadership");
        let unique: std::collections::HashSet<_> = kw.missing_keywords.iter().collect();
        assert_eq!(unique.len(), kw.missing_keywords.len());
    }

    #[test]
    fn test_role_gaps_appended_when_generic_gaps_are_few() {
        let mut cv = basic_cv();
        cv.skills = skills(&[
            "leadership",
            "team",
            "project management",
            "agile",
            "collaboration",
            "communication",
            "problem solving",
            "analysis",
            "strategy",
            "innovation",
            "javascript",
            "typescript",
            "react",
            "node.js",
            "python",
            "sql",
            "aws",
            "docker",
            "kubernetes",
            "git",
        ]);
        let kw = analyze_keywords(&cv, Some("frontend"), KeywordPolicy::GenericFirst);
        assert_eq!(
            kw.missing_keywords,
            vec!["api", "testing", "vue", "angular", "css", "responsive design", "webpack"]
        );
    }

    #[test]
    fn test_keywords_found_in_experience_bullets() {
        let mut cv = basic_cv();
        cv.experience = vec![experience("exp-1", &["Migrated services to Kubernetes"])];
        let kw = analyze_keywords(&cv, None, KeywordPolicy::GenericFirst);
        assert!(kw.present_keywords.contains(&"kubernetes".to_string()));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(KeywordPolicy::parse("role_first"), Some(KeywordPolicy::RoleFirst));
        assert_eq!(KeywordPolicy::parse(" Generic_First "), Some(KeywordPolicy::GenericFirst));
        assert_eq!(KeywordPolicy::parse("random"), None);
    }
}
