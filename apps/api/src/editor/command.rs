use serde::{Deserialize, Serialize};

use crate::editor::patch::{EducationPatch, ExperiencePatch, PersonalInfoPatch, ProjectPatch};
use crate::editor::session::EditorSession;
use crate::models::cv::{CvDocument, EducationEntry, ExperienceEntry, ProjectEntry};

/// A single editor action as sent over the wire, e.g.
/// `{"action": "updateExperience", "index": 0, "updates": {"role": "Lead"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum EditorCommand {
    #[serde(rename_all = "camelCase")]
    LoadCv { cv_id: String, content: CvDocument },
    ClearCv,
    UpdatePersonalInfo { updates: PersonalInfoPatch },
    UpdateSummary { summary: String },

    AddExperience { item: ExperienceEntry },
    UpdateExperience { index: usize, updates: ExperiencePatch },
    DeleteExperience { index: usize },
    #[serde(rename_all = "camelCase")]
    ReorderExperience { from_index: usize, to_index: usize },

    AddEducation { item: EducationEntry },
    UpdateEducation { index: usize, updates: EducationPatch },
    DeleteEducation { index: usize },
    #[serde(rename_all = "camelCase")]
    ReorderEducation { from_index: usize, to_index: usize },

    AddSkill { skill: String },
    UpdateSkill { index: usize, skill: String },
    DeleteSkill { index: usize },

    AddProject { item: ProjectEntry },
    UpdateProject { index: usize, updates: ProjectPatch },
    DeleteProject { index: usize },
    #[serde(rename_all = "camelCase")]
    ReorderProject { from_index: usize, to_index: usize },

    Undo,
    Redo,
    ClearHistory,
}

impl EditorCommand {
    /// Applies the command. Returns whether the session changed.
    pub fn apply(self, session: &mut EditorSession) -> bool {
        match self {
            Self::LoadCv { cv_id, content } => {
                session.load_cv(cv_id, content);
                true
            }
            Self::ClearCv => {
                let had_cv = session.cv().is_some();
                session.clear_cv();
                had_cv
            }
            Self::UpdatePersonalInfo { updates } => session.update_personal_info(updates),
            Self::UpdateSummary { summary } => session.update_summary(summary),

            Self::AddExperience { item } => session.add_experience(item),
            Self::UpdateExperience { index, updates } => session.update_experience(index, updates),
            Self::DeleteExperience { index } => session.delete_experience(index),
            Self::ReorderExperience {
                from_index,
                to_index,
            } => session.reorder_experience(from_index, to_index),

            Self::AddEducation { item } => session.add_education(item),
            Self::UpdateEducation { index, updates } => session.update_education(index, updates),
            Self::DeleteEducation { index } => session.delete_education(index),
            Self::ReorderEducation {
                from_index,
                to_index,
            } => session.reorder_education(from_index, to_index),

            Self::AddSkill { skill } => session.add_skill(skill),
            Self::UpdateSkill { index, skill } => session.update_skill(index, skill),
            Self::DeleteSkill { index } => session.delete_skill(index),

            Self::AddProject { item } => session.add_project(item),
            Self::UpdateProject { index, updates } => session.update_project(index, updates),
            Self::DeleteProject { index } => session.delete_project(index),
            Self::ReorderProject {
                from_index,
                to_index,
            } => session.reorder_project(from_index, to_index),

            Self::Undo => session.undo(),
            Self::Redo => session.redo(),
            Self::ClearHistory => {
                let had_history = session.history().len() > 1;
                session.clear_history();
                had_history
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadCv { .. } => "loadCv",
            Self::ClearCv => "clearCv",
            Self::UpdatePersonalInfo { .. } => "updatePersonalInfo",
            Self::UpdateSummary { .. } => "updateSummary",
            Self::AddExperience { .. } => "addExperience",
            Self::UpdateExperience { .. } => "updateExperience",
            Self::DeleteExperience { .. } => "deleteExperience",
            Self::ReorderExperience { .. } => "reorderExperience",
            Self::AddEducation { .. } => "addEducation",
            Self::UpdateEducation { .. } => "updateEducation",
            Self::DeleteEducation { .. } => "deleteEducation",
            Self::ReorderEducation { .. } => "reorderEducation",
            Self::AddSkill { .. } => "addSkill",
            Self::UpdateSkill { .. } => "updateSkill",
            Self::DeleteSkill { .. } => "deleteSkill",
            Self::AddProject { .. } => "addProject",
            Self::UpdateProject { .. } => "updateProject",
            Self::DeleteProject { .. } => "deleteProject",
            Self::ReorderProject { .. } => "reorderProject",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::ClearHistory => "clearHistory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::basic_cv;
    use serde_json::json;

    fn loaded() -> EditorSession {
        let mut session = EditorSession::new();
        session.load_cv("cv-1", basic_cv());
        session
    }

    fn parse(value: serde_json::Value) -> EditorCommand {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parses_tagged_commands() {
        assert_eq!(parse(json!({ "action": "undo" })), EditorCommand::Undo);
        assert_eq!(
            parse(json!({ "action": "reorderExperience", "fromIndex": 2, "toIndex": 0 })),
            EditorCommand::ReorderExperience {
                from_index: 2,
                to_index: 0
            }
        );
        assert_eq!(
            parse(json!({ "action": "updateSkill", "index": 1, "skill": "Rust" })),
            EditorCommand::UpdateSkill {
                index: 1,
                skill: "Rust".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result: Result<EditorCommand, _> =
            serde_json::from_value(json!({ "action": "formatDisk" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_update_then_undo() {
        let mut session = loaded();
        let applied = parse(json!({
            "action": "updatePersonalInfo",
            "updates": { "name": "Jane Doe" }
        }))
        .apply(&mut session);
        assert!(applied);
        assert_eq!(session.cv().unwrap().personal_info.name, "Jane Doe");

        assert!(EditorCommand::Undo.apply(&mut session));
        assert_eq!(session.cv().unwrap().personal_info.name, "John Doe");
        assert!(!EditorCommand::Undo.apply(&mut session));
    }

    #[test]
    fn test_apply_add_experience_from_json() {
        let mut session = loaded();
        let applied = parse(json!({
            "action": "addExperience",
            "item": {
                "id": "exp-1",
                "company": "Tech Co",
                "role": "Developer",
                "startDate": "2021-03-01",
                "current": true,
                "bullets": ["Shipped v2"]
            }
        }))
        .apply(&mut session);
        assert!(applied);
        assert_eq!(session.cv().unwrap().experience[0].company, "Tech Co");
    }

    #[test]
    fn test_load_cv_command_resets_history() {
        let mut session = loaded();
        session.update_summary("edited");
        let mut other = basic_cv();
        other.personal_info.name = "Other".to_string();

        assert!(EditorCommand::LoadCv {
            cv_id: "cv-2".to_string(),
            content: other,
        }
        .apply(&mut session));
        assert_eq!(session.cv_id(), Some("cv-2"));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.cv().unwrap().personal_info.name, "Other");
    }

    #[test]
    fn test_clear_history_reports_change() {
        let mut session = loaded();
        assert!(!EditorCommand::ClearHistory.apply(&mut session));
        session.update_summary("edited");
        assert!(EditorCommand::ClearHistory.apply(&mut session));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_name_matches_wire_tag() {
        let cmd = EditorCommand::DeleteProject { index: 0 };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["action"], cmd.name());
    }
}
