/// Maximum number of snapshots retained for undo/redo.
pub const MAX_HISTORY_SIZE: usize = 50;

/// Bounded linear undo/redo history of whole-document snapshots.
///
/// The entry under the cursor is always the current document. Pushing after an
/// undo discards the redoable tail; once full, the oldest snapshot is evicted.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }
}

impl<T> History<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Rebuilds a history from persisted parts. Returns `None` when the cursor
    /// does not point into `entries` (or is set on an empty history).
    pub fn from_parts(entries: Vec<T>, cursor: Option<usize>, capacity: usize) -> Option<Self> {
        let valid = match cursor {
            Some(i) => i < entries.len(),
            None => entries.is_empty(),
        };
        if !valid || entries.len() > capacity.max(1) {
            return None;
        }
        Some(Self {
            entries,
            cursor,
            capacity: capacity.max(1),
        })
    }

    pub fn reset(&mut self, initial: T) {
        self.entries = vec![initial];
        self.cursor = Some(0);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn push(&mut self, snapshot: T) {
        let keep = self.cursor.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            let overflow = self.entries.len() - self.capacity;
            self.entries.drain(..overflow);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn undo(&mut self) -> Option<&T> {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                self.entries.get(i - 1)
            }
            _ => None,
        }
    }

    pub fn redo(&mut self) -> Option<&T> {
        match self.cursor {
            Some(i) if i + 1 < self.entries.len() => {
                self.cursor = Some(i + 1);
                self.entries.get(i + 1)
            }
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 < self.entries.len())
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Cursor as exposed to clients: `-1` when empty.
    pub fn index(&self) -> i64 {
        self.cursor.map_or(-1, |i| i as i64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

impl<T: Clone> History<T> {
    /// Collapses the history to just the current entry.
    pub fn collapse(&mut self) {
        if let Some(current) = self.current().cloned() {
            self.reset(current);
        }
    }
}
