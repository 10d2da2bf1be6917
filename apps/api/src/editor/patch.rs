//! Partial updates for CV sections. A patch overwrites only the fields it
//! sets; entry ids are not patchable so identity survives every edit.

use serde::{Deserialize, Serialize};

use crate::models::cv::{EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
}

impl PersonalInfoPatch {
    pub fn apply_to(self, info: &mut PersonalInfo) {
        if let Some(name) = self.name {
            info.name = name;
        }
        if let Some(email) = self.email {
            info.email = email;
        }
        merge_optional(&mut info.phone, self.phone);
        merge_optional(&mut info.location, self.location);
        merge_optional(&mut info.linkedin, self.linkedin);
        merge_optional(&mut info.website, self.website);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub bullets: Option<Vec<String>>,
}

impl ExperiencePatch {
    pub fn apply_to(self, entry: &mut ExperienceEntry) {
        if let Some(company) = self.company {
            entry.company = company;
        }
        if let Some(role) = self.role {
            entry.role = role;
        }
        merge_optional(&mut entry.location, self.location);
        if let Some(start_date) = self.start_date {
            entry.start_date = start_date;
        }
        merge_optional(&mut entry.end_date, self.end_date);
        if let Some(current) = self.current {
            entry.current = current;
        }
        if let Some(bullets) = self.bullets {
            entry.bullets = bullets;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationPatch {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
    pub achievements: Option<Vec<String>>,
}

impl EducationPatch {
    pub fn apply_to(self, entry: &mut EducationEntry) {
        if let Some(institution) = self.institution {
            entry.institution = institution;
        }
        if let Some(degree) = self.degree {
            entry.degree = degree;
        }
        if let Some(field) = self.field {
            entry.field = field;
        }
        merge_optional(&mut entry.location, self.location);
        if let Some(start_date) = self.start_date {
            entry.start_date = start_date;
        }
        merge_optional(&mut entry.end_date, self.end_date);
        merge_optional(&mut entry.gpa, self.gpa);
        if let Some(achievements) = self.achievements {
            entry.achievements = achievements;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub highlights: Option<Vec<String>>,
}

impl ProjectPatch {
    pub fn apply_to(self, entry: &mut ProjectEntry) {
        if let Some(name) = self.name {
            entry.name = name;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
        if let Some(technologies) = self.technologies {
            entry.technologies = technologies;
        }
        merge_optional(&mut entry.url, self.url);
        merge_optional(&mut entry.start_date, self.start_date);
        merge_optional(&mut entry.end_date, self.end_date);
        if let Some(highlights) = self.highlights {
            entry.highlights = highlights;
        }
    }
}

/// Optional fields are set by the patch; an empty string clears the field.
fn merge_optional(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *target = if value.is_empty() { None } else { Some(value) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{experience, personal_info};
    use serde_json::json;

    #[test]
    fn test_personal_info_patch_merges_only_set_fields() {
        let mut info = personal_info("John Doe", "john@example.com");
        let patch: PersonalInfoPatch =
            serde_json::from_value(json!({ "name": "Jane Doe", "phone": "555-1234" })).unwrap();
        patch.apply_to(&mut info);

        assert_eq!(info.name, "Jane Doe");
        assert_eq!(info.phone.as_deref(), Some("555-1234"));
        assert_eq!(info.email, "john@example.com");
        assert!(info.linkedin.is_none());
    }

    #[test]
    fn test_empty_string_clears_optional_field() {
        let mut info = personal_info("John", "john@example.com");
        info.website = Some("john.dev".to_string());
        PersonalInfoPatch {
            website: Some(String::new()),
            ..Default::default()
        }
        .apply_to(&mut info);
        assert!(info.website.is_none());
    }

    #[test]
    fn test_experience_patch_keeps_id() {
        let mut entry = experience("exp-1", &["Built stuff"]);
        ExperiencePatch {
            role: Some("Senior Engineer".to_string()),
            current: Some(false),
            end_date: Some("2024-06-30".to_string()),
            ..Default::default()
        }
        .apply_to(&mut entry);

        assert_eq!(entry.id, "exp-1");
        assert_eq!(entry.role, "Senior Engineer");
        assert_eq!(entry.company, "Acme Corp");
        assert!(!entry.current);
        assert_eq!(entry.end_date.as_deref(), Some("2024-06-30"));
        assert_eq!(entry.bullets, vec!["Built stuff"]);
    }

    #[test]
    fn test_patch_ignores_unknown_id_field() {
        let patch: ExperiencePatch =
            serde_json::from_value(json!({ "id": "hijack", "company": "Tech Co" })).unwrap();
        let mut entry = experience("exp-1", &[]);
        patch.apply_to(&mut entry);
        assert_eq!(entry.id, "exp-1");
        assert_eq!(entry.company, "Tech Co");
    }
}
