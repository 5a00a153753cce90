use crate::replace::InstructionKind;
use chrono::{DateTime, Utc};

/// What was decided, kept so the decision can be shown and reversed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: InstructionKind,
    /// Snippet for removed entries, otherwise the anchor (or empty)
    pub original: String,
    /// Snippet for added entries, otherwise empty
    pub formatted: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Replacement map key of the decision
    pub key: String,
    /// Position of the decided entry among the session's actionable entries
    pub entry_index: usize,
    pub entry: HistoryEntry,
}

/// Undo stack of accepted decisions.
///
/// Only tracks order. Dropping the map entry and resetting the decision state
/// of an undone record is up to the owner.
#[derive(Debug, Default)]
pub struct ReplacementHistory {
    records: Vec<HistoryRecord>,
}

impl ReplacementHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    /// Pop the most recent record, `None` when nothing is left to undo
    pub fn undo(&mut self) -> Option<HistoryRecord> {
        self.records.pop()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.records.is_empty()
    }

    /// Records in the order they were pushed
    pub fn entries(&self) -> &[HistoryRecord] {
        &self.records
    }
}
