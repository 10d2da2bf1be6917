//! Section analyzers. Each scores one part of the CV on a 0–100 scale and
//! returns its own feedback; nothing is shared between them.

use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::report::SectionAnalysis;
use crate::models::cv::{is_present, EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry};

/// A bullet counts as quantified when it carries a number, percentage or amount.
static RE_QUANTIFIED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+%?|\$\d+").expect("quantification pattern is valid"));

const ACTION_VERBS: &[&str] = &[
    "led",
    "developed",
    "managed",
    "created",
    "implemented",
    "achieved",
    "improved",
];

const SUMMARY_MIN_WORDS: usize = 30;
const SUMMARY_MAX_WORDS: usize = 80;
const BULLETS_PER_ROLE: usize = 3;
const SKILLS_MIN: usize = 5;
const SKILLS_MAX: usize = 15;
const SKILLS_CATEGORIZE_ABOVE: usize = 8;

pub fn analyze_personal_info(info: &PersonalInfo) -> SectionAnalysis {
    let mut section = SectionAnalysis::with_base(50);

    if !info.email.is_empty() {
        section.add(15);
    }
    if is_present(&info.phone) {
        section.add(10);
    }
    if is_present(&info.location) {
        section.add(10);
    }
    if is_present(&info.linkedin) {
        section.add(10);
        section.strength("LinkedIn profile included");
    } else {
        section.weakness("Missing LinkedIn profile");
        section.suggestion("Add your LinkedIn profile URL to increase professional credibility");
    }
    if is_present(&info.website) {
        section.add(5);
        section.strength("Personal website/portfolio included");
    }

    section.finish()
}

pub fn analyze_summary(summary: Option<&str>) -> SectionAnalysis {
    let summary = match summary {
        Some(s) if !s.trim().is_empty() => s,
        _ => {
            let mut section = SectionAnalysis::with_base(0);
            section.weakness("Missing professional summary");
            section.suggestion(
                "Add a compelling 2-3 sentence summary highlighting your key strengths and career goals",
            );
            return section;
        }
    };

    let mut section = SectionAnalysis::with_base(40);
    let word_count = summary.split_whitespace().count();

    if (SUMMARY_MIN_WORDS..=SUMMARY_MAX_WORDS).contains(&word_count) {
        section.add(40);
        section.strength("Well-balanced summary length");
    } else if word_count < SUMMARY_MIN_WORDS {
        section.weakness("Summary is too brief");
        section.suggestion("Expand your summary to 30-80 words for better impact");
    } else {
        section.weakness("Summary is too long");
        section.suggestion("Condense your summary to 30-80 words to maintain reader attention");
    }

    let lower = summary.to_lowercase();
    if ACTION_VERBS.iter().any(|verb| lower.contains(verb)) {
        section.add(20);
        section.strength("Summary uses strong action verbs");
    } else {
        section.suggestion(
            "Use action verbs like \"led\", \"developed\", or \"achieved\" to make your summary more impactful",
        );
    }

    section.finish()
}

pub fn analyze_experience(experience: &[ExperienceEntry]) -> SectionAnalysis {
    if experience.is_empty() {
        let mut section = SectionAnalysis::with_base(0);
        section.weakness("No work experience listed");
        section.suggestion("Add your work experience, including internships or relevant projects");
        return section;
    }

    let mut section = SectionAnalysis::with_base(30);

    if experience.len() >= 2 {
        section.add(20);
        section.strength(format!("{} work experiences listed", experience.len()));
    }

    let total_bullets: usize = experience.iter().map(|e| e.bullets.len()).sum();
    let quantified_bullets = experience
        .iter()
        .flat_map(|e| e.bullets.iter())
        .filter(|b| is_quantified(b))
        .count();

    if total_bullets >= experience.len() * BULLETS_PER_ROLE {
        section.add(20);
        section.strength("Good number of achievement bullets per position");
    } else {
        section.weakness("Few achievement bullets per position");
        section.suggestion("Add 3-5 achievement bullets per position highlighting your impact");
    }

    let quantified_pct = if total_bullets > 0 {
        quantified_bullets as f64 / total_bullets as f64 * 100.0
    } else {
        0.0
    };

    if quantified_pct >= 50.0 {
        section.add(30);
        section.strength("Achievements are well-quantified with metrics");
    } else if quantified_pct > 0.0 {
        section.add(15);
        section.suggestion(
            "Add more quantifiable metrics (numbers, percentages, dollar amounts) to your achievements",
        );
    } else {
        section.weakness("Achievements lack quantifiable metrics");
        section.suggestion("Quantify your achievements with specific numbers, percentages, or results");
    }

    section.finish()
}

pub fn analyze_education(education: &[EducationEntry]) -> SectionAnalysis {
    if education.is_empty() {
        let mut section = SectionAnalysis::with_base(0);
        section.weakness("No education listed");
        section.suggestion("Add your educational background");
        return section;
    }

    let mut section = SectionAnalysis::with_base(60);

    // Bonuses accumulate per entry; only the final score is clamped.
    for entry in education {
        if is_present(&entry.gpa) {
            section.add(10);
            section.strength("GPA included in education");
        }
        if !entry.achievements.is_empty() {
            section.add(15);
            section.strength("Academic achievements highlighted");
        }
    }

    if !education.iter().any(|e| is_present(&e.gpa)) {
        section.suggestion("Consider adding GPA if it's 3.5 or higher");
    }

    section.finish()
}

pub fn analyze_skills(skills: &[String]) -> SectionAnalysis {
    if skills.is_empty() {
        let mut section = SectionAnalysis::with_base(0);
        section.weakness("No skills listed");
        section.suggestion("Add relevant technical and soft skills");
        return section;
    }

    let mut section = SectionAnalysis::with_base(40);
    let count = skills.len();

    if (SKILLS_MIN..=SKILLS_MAX).contains(&count) {
        section.add(40);
        section.strength("Good number of skills listed");
    } else if count < SKILLS_MIN {
        section.weakness("Too few skills listed");
        section.suggestion("Add more relevant skills (aim for 5-15 skills)");
    } else {
        section.weakness("Too many skills listed");
        section.suggestion("Focus on your strongest 10-15 skills to avoid overwhelming readers");
    }

    if count > SKILLS_CATEGORIZE_ABOVE {
        section.add(20);
        section.suggestion(
            "Consider organizing skills into categories (e.g., Programming Languages, Frameworks, Tools)",
        );
    }

    section.finish()
}

pub fn analyze_projects(projects: &[ProjectEntry]) -> SectionAnalysis {
    if projects.is_empty() {
        // Projects are optional, so an empty section keeps a neutral score.
        let mut section = SectionAnalysis::with_base(60);
        section.suggestion("Add relevant projects to showcase your practical skills");
        return section;
    }

    let mut section = SectionAnalysis::with_base(70);

    if projects.len() >= 2 {
        section.add(15);
        section.strength("Multiple projects showcased");
    }

    for project in projects {
        if is_present(&project.url) {
            section.add(5);
        }
        if !project.technologies.is_empty() {
            section.add(5);
        }
        if !project.highlights.is_empty() {
            section.add(5);
        }
    }

    if !projects.iter().any(|p| is_present(&p.url)) {
        section.suggestion("Add URLs or GitHub links to your projects");
    }

    section.finish()
}

fn is_quantified(bullet: &str) -> bool {
    RE_QUANTIFIED.is_match(bullet)
}
