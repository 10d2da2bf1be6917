//! Builders shared by unit tests across modules.

use crate::models::cv::{CvDocument, EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry};

pub fn personal_info(name: &str, email: &str) -> PersonalInfo {
    PersonalInfo {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        location: None,
        linkedin: None,
        website: None,
    }
}

pub fn empty_cv() -> CvDocument {
    CvDocument {
        personal_info: personal_info("", ""),
        summary: None,
        experience: vec![],
        education: vec![],
        skills: vec![],
        projects: vec![],
    }
}

pub fn basic_cv() -> CvDocument {
    CvDocument {
        personal_info: personal_info("John Doe", "john@example.com"),
        ..empty_cv()
    }
}

pub fn experience(id: &str, bullets: &[&str]) -> ExperienceEntry {
    ExperienceEntry {
        id: id.to_string(),
        company: "Acme Corp".to_string(),
        role: "Engineer".to_string(),
        location: None,
        start_date: "2020-01-01".to_string(),
        end_date: None,
        current: true,
        bullets: bullets.iter().map(|b| b.to_string()).collect(),
    }
}

pub fn education(id: &str, gpa: Option<&str>, achievements: &[&str]) -> EducationEntry {
    EducationEntry {
        id: id.to_string(),
        institution: "State University".to_string(),
        degree: "BSc".to_string(),
        field: "Computer Science".to_string(),
        location: None,
        start_date: "2015-09-01".to_string(),
        end_date: Some("2019-05-31".to_string()),
        gpa: gpa.map(str::to_string),
        achievements: achievements.iter().map(|a| a.to_string()).collect(),
    }
}

pub fn project(id: &str, url: Option<&str>, technologies: &[&str], highlights: &[&str]) -> ProjectEntry {
    ProjectEntry {
        id: id.to_string(),
        name: format!("Project {id}"),
        description: "A side project".to_string(),
        technologies: technologies.iter().map(|t| t.to_string()).collect(),
        url: url.map(str::to_string),
        start_date: None,
        end_date: None,
        highlights: highlights.iter().map(|h| h.to_string()).collect(),
    }
}

pub fn skills(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
