use chrono::{DateTime, Utc};
use tracing::debug;

use crate::editor::history::History;
use crate::editor::patch::{EducationPatch, ExperiencePatch, PersonalInfoPatch, ProjectPatch};
use crate::models::cv::{CvDocument, EducationEntry, ExperienceEntry, ProjectEntry};

/// One open editor: the CV being edited, its undo/redo history and save status.
///
/// The current document is the history entry under the cursor, so
/// `history[historyIndex] == cv` holds after every load, edit, undo and redo.
/// Every mutator returns `true` when it recorded a new snapshot; with no CV
/// loaded, or with an out-of-range index, it does nothing and returns `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorSession {
    pub(crate) cv_id: Option<String>,
    pub(crate) history: History<CvDocument>,
    pub(crate) is_loading: bool,
    pub(crate) is_saving: bool,
    pub(crate) last_saved_at: Option<DateTime<Utc>>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cv(&self) -> Option<&CvDocument> {
        self.history.current()
    }

    pub fn cv_id(&self) -> Option<&str> {
        self.cv_id.as_deref()
    }

    pub fn history(&self) -> &History<CvDocument> {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────

    pub fn load_cv(&mut self, cv_id: impl Into<String>, content: CvDocument) {
        self.cv_id = Some(cv_id.into());
        self.history.reset(content);
        self.is_loading = false;
    }

    pub fn clear_cv(&mut self) {
        self.cv_id = None;
        self.history.clear();
        self.last_saved_at = None;
    }

    // ── Personal info & summary ────────────────────────────────────────────

    pub fn update_personal_info(&mut self, updates: PersonalInfoPatch) -> bool {
        self.commit(|cv| {
            updates.apply_to(&mut cv.personal_info);
            true
        })
    }

    pub fn update_summary(&mut self, summary: impl Into<String>) -> bool {
        let summary = summary.into();
        self.commit(|cv| {
            cv.summary = Some(summary);
            true
        })
    }

    // ── Experience ─────────────────────────────────────────────────────────

    pub fn add_experience(&mut self, item: ExperienceEntry) -> bool {
        self.commit(|cv| {
            cv.experience.push(item);
            true
        })
    }

    pub fn update_experience(&mut self, index: usize, updates: ExperiencePatch) -> bool {
        self.commit(|cv| match cv.experience.get_mut(index) {
            Some(entry) => {
                updates.apply_to(entry);
                true
            }
            None => false,
        })
    }

    pub fn delete_experience(&mut self, index: usize) -> bool {
        self.commit(|cv| remove_at(&mut cv.experience, index))
    }

    pub fn reorder_experience(&mut self, from: usize, to: usize) -> bool {
        self.commit(|cv| move_item(&mut cv.experience, from, to))
    }

    // ── Education ──────────────────────────────────────────────────────────

    pub fn add_education(&mut self, item: EducationEntry) -> bool {
        self.commit(|cv| {
            cv.education.push(item);
            true
        })
    }

    pub fn update_education(&mut self, index: usize, updates: EducationPatch) -> bool {
        self.commit(|cv| match cv.education.get_mut(index) {
            Some(entry) => {
                updates.apply_to(entry);
                true
            }
            None => false,
        })
    }

    pub fn delete_education(&mut self, index: usize) -> bool {
        self.commit(|cv| remove_at(&mut cv.education, index))
    }

    pub fn reorder_education(&mut self, from: usize, to: usize) -> bool {
        self.commit(|cv| move_item(&mut cv.education, from, to))
    }

    // ── Skills ─────────────────────────────────────────────────────────────

    pub fn add_skill(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        self.commit(|cv| {
            cv.skills.push(skill);
            true
        })
    }

    pub fn update_skill(&mut self, index: usize, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        self.commit(|cv| match cv.skills.get_mut(index) {
            Some(slot) => {
                *slot = skill;
                true
            }
            None => false,
        })
    }

    pub fn delete_skill(&mut self, index: usize) -> bool {
        self.commit(|cv| remove_at(&mut cv.skills, index))
    }

    // ── Projects ───────────────────────────────────────────────────────────

    pub fn add_project(&mut self, item: ProjectEntry) -> bool {
        self.commit(|cv| {
            cv.projects.push(item);
            true
        })
    }

    pub fn update_project(&mut self, index: usize, updates: ProjectPatch) -> bool {
        self.commit(|cv| match cv.projects.get_mut(index) {
            Some(entry) => {
                updates.apply_to(entry);
                true
            }
            None => false,
        })
    }

    pub fn delete_project(&mut self, index: usize) -> bool {
        self.commit(|cv| remove_at(&mut cv.projects, index))
    }

    pub fn reorder_project(&mut self, from: usize, to: usize) -> bool {
        self.commit(|cv| move_item(&mut cv.projects, from, to))
    }

    // ── History ────────────────────────────────────────────────────────────

    /// Steps back one snapshot. No-op at the oldest retained snapshot.
    pub fn undo(&mut self) -> bool {
        self.history.undo().is_some()
    }

    /// Steps forward one snapshot. No-op at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        self.history.redo().is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drops all undo/redo state, keeping the current document.
    pub fn clear_history(&mut self) {
        self.history.collapse();
    }

    // ── Save status ────────────────────────────────────────────────────────

    pub fn set_saving(&mut self, is_saving: bool) {
        self.is_saving = is_saving;
    }

    pub fn set_last_saved_at(&mut self, at: DateTime<Utc>) {
        self.last_saved_at = Some(at);
    }

    /// Clones the current document, lets `edit` change it, and records the
    /// result as a new snapshot if `edit` reports a change.
    fn commit(&mut self, edit: impl FnOnce(&mut CvDocument) -> bool) -> bool {
        let Some(mut next) = self.cv().cloned() else {
            debug!("Editor mutation ignored: no CV loaded");
            return false;
        };
        if !edit(&mut next) {
            debug!("Editor mutation ignored: index out of range");
            return false;
        }
        self.history.push(next);
        true
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        false
    }
}

/// Moves the item at `from` to position `to`, shifting the items in between.
/// `to` past the end moves the item to the end.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}
