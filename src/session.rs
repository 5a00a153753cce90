//! Decision session over one comparison.
//!
//! Walks the actionable entries of a diff, turns accepted ones into stored
//! replacement instructions, keeps the undo history and finally writes the
//! reconciled target.

use crate::diff::{Comparison, DiffEntry};
use crate::error::Result;
use crate::file::{fingerprint, read_text};
use crate::history::{HistoryEntry, HistoryRecord, ReplacementHistory};
use crate::replace::{
    AnchorPosition, InstructionKind, ReplacementInstruction, ReplacementMap, apply_replacements,
    apply_replacements_to_file, build_instruction, entry_key,
};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Pending,
    Accepted,
    Skipped,
}

/// An added or removed entry and its index in the diff
#[derive(Debug, Clone, Copy)]
struct Actionable {
    entry_index: usize,
    kind: InstructionKind,
}

pub struct Session {
    id: Uuid,
    comparison: Comparison,
    target_fingerprint: String,
    anchor_position: AnchorPosition,
    actionable: Vec<Actionable>,
    states: Vec<DecisionState>,
    cursor: Option<usize>,
    replacements: ReplacementMap,
    history: ReplacementHistory,
}

impl Session {
    pub fn new(comparison: Comparison) -> Self {
        let actionable: Vec<Actionable> = comparison
            .diffs
            .entries
            .iter()
            .enumerate()
            .filter_map(|(entry_index, entry)| {
                InstructionKind::from_diff_type(entry.diff_type)
                    .map(|kind| Actionable { entry_index, kind })
            })
            .collect();

        let id = Uuid::new_v4();
        info!(session = %id, actionable = actionable.len(), "Started replacement session");

        Self {
            id,
            target_fingerprint: fingerprint(&comparison.target),
            anchor_position: AnchorPosition::default(),
            states: vec![DecisionState::Pending; actionable.len()],
            cursor: if actionable.is_empty() { None } else { Some(0) },
            actionable,
            comparison,
            replacements: ReplacementMap::new(),
            history: ReplacementHistory::new(),
        }
    }

    pub fn with_anchor_position(mut self, anchor_position: AnchorPosition) -> Self {
        self.anchor_position = anchor_position;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    /// Number of actionable entries
    pub fn total(&self) -> usize {
        self.actionable.len()
    }

    pub fn completed_count(&self) -> usize {
        self.states
            .iter()
            .filter(|state| **state != DecisionState::Pending)
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn state(&self, position: usize) -> Option<DecisionState> {
        self.states.get(position).copied()
    }

    /// Position of the current entry among the actionable ones
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    /// The entry awaiting a decision
    pub fn current(&self) -> Option<&DiffEntry> {
        let actionable = self.actionable.get(self.cursor?)?;
        self.comparison.diffs.entries.get(actionable.entry_index)
    }

    pub fn replacements(&self) -> &ReplacementMap {
        &self.replacements
    }

    pub fn history(&self) -> &ReplacementHistory {
        &self.history
    }

    /// Accept the current entry. Returns its replacement key, or `None` when
    /// the session is already complete.
    pub fn accept(&mut self) -> Result<Option<String>> {
        let Some(position) = self.cursor else {
            return Ok(None);
        };
        let key = self.record_acceptance(position)?;
        self.cursor = self.next_pending(position + 1);
        Ok(Some(key))
    }

    /// Skip the current entry; returns false when there was nothing to skip
    pub fn skip(&mut self) -> bool {
        let Some(position) = self.cursor else {
            return false;
        };
        self.states[position] = DecisionState::Skipped;
        self.cursor = self.next_pending(position + 1);
        debug!(session = %self.id, position, "Skipped entry");
        true
    }

    /// Accept every actionable entry, discarding earlier decisions
    pub fn accept_all(&mut self) -> Result<usize> {
        self.history.clear();
        self.replacements.clear();
        for position in 0..self.actionable.len() {
            self.record_acceptance(position)?;
        }
        self.cursor = None;
        info!(session = %self.id, accepted = self.actionable.len(), "Accepted all entries");
        Ok(self.actionable.len())
    }

    /// Reverse the most recent acceptance and return to that entry
    pub fn undo(&mut self) -> Option<HistoryRecord> {
        let record = self.history.undo()?;
        self.replacements.remove(&record.key);
        if let Some(state) = self.states.get_mut(record.entry_index) {
            *state = DecisionState::Pending;
        }
        self.cursor = Some(record.entry_index);
        debug!(session = %self.id, key = %record.key, "Undid replacement");
        Some(record)
    }

    /// The target text with every accepted replacement applied
    pub fn apply(&self) -> Result<String> {
        apply_replacements(
            &self.comparison.target,
            &self.comparison.source,
            &self.replacements,
        )
    }

    /// Apply the accepted replacements to the target file on disk
    pub fn save(&self, source_path: &Path, target_path: &Path) -> Result<String> {
        let on_disk = read_text(target_path)?;
        if fingerprint(&on_disk) != self.target_fingerprint {
            warn!(
                session = %self.id,
                "Target {:?} changed since it was compared; anchors will be searched in the new text",
                target_path
            );
        }
        apply_replacements_to_file(source_path, target_path, &self.replacements)
    }

    fn record_acceptance(&mut self, position: usize) -> Result<String> {
        let actionable = self.actionable[position];
        let instruction = self.instruction_for(actionable);
        let key = entry_key(actionable.kind, actionable.entry_index);
        self.replacements.insert(key.clone(), instruction.to_payload()?);

        let anchor = instruction.anchor.clone().unwrap_or_default();
        let (original, formatted) = match actionable.kind {
            InstructionKind::Removed => (instruction.snippet, String::new()),
            InstructionKind::Added => (anchor, instruction.snippet),
        };
        self.history.push(HistoryRecord {
            key: key.clone(),
            entry_index: position,
            entry: HistoryEntry {
                kind: actionable.kind,
                original,
                formatted,
                timestamp: Utc::now(),
            },
        });
        self.states[position] = DecisionState::Accepted;

        debug!(session = %self.id, key = %key, "Accepted replacement");
        Ok(key)
    }

    fn instruction_for(&self, actionable: Actionable) -> ReplacementInstruction {
        let entries = &self.comparison.diffs.entries;
        build_instruction(
            entries,
            actionable.entry_index,
            &self.comparison.source,
            &self.comparison.target,
            self.anchor_position,
        )
        .unwrap_or_else(|| ReplacementInstruction {
            kind: actionable.kind,
            snippet: entries[actionable.entry_index].content.clone(),
            anchor: None,
            anchor_position: self.anchor_position,
        })
    }

    fn next_pending(&self, start: usize) -> Option<usize> {
        (start..self.states.len()).find(|&idx| self.states[idx] == DecisionState::Pending)
    }
}
