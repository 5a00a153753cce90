use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffType {
    Added,
    Removed,
    Unchanged,
}

impl DiffType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffType::Added => "added",
            DiffType::Removed => "removed",
            DiffType::Unchanged => "unchanged",
        }
    }

    /// Whether a decision can be taken on entries of this type
    pub fn is_actionable(&self) -> bool {
        matches!(self, DiffType::Added | DiffType::Removed)
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub content: String,
    /// 1-based line in the source (unchanged, removed) or target (added)
    #[serde(rename = "lineNumber")]
    pub line_number: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total: usize,
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn from_entries(entries: &[DiffEntry]) -> Self {
        let mut summary = DiffSummary {
            total: entries.len(),
            ..Default::default()
        };
        for entry in entries {
            match entry.diff_type {
                DiffType::Added => summary.added += 1,
                DiffType::Removed => summary.removed += 1,
                DiffType::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub entries: Vec<DiffEntry>,
    pub summary: DiffSummary,
}

impl DiffResult {
    pub fn new(entries: Vec<DiffEntry>) -> Self {
        let summary = DiffSummary::from_entries(&entries);
        Self { entries, summary }
    }
}

/// Both documents of a comparison together with their hydrated diff
#[derive(Debug, Clone)]
pub struct Comparison {
    pub source: String,
    pub target: String,
    pub diffs: DiffResult,
}
