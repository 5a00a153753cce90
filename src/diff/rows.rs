use super::types::{DiffEntry, DiffType};
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone)]
pub enum DiffRow {
    Unchanged(String),
    /// Removed entries on the left, added entries on the right; either side may be empty
    Pair(Vec<DiffEntry>, Vec<DiffEntry>),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added_chars: usize,
    pub removed_chars: usize,
}

/// Group entries into rows where unchanged entries are single rows,
/// and contiguous removed/added blocks become paired rows.
pub fn group_into_rows(entries: &[DiffEntry]) -> Vec<DiffRow> {
    let mut rows = Vec::new();
    let mut i = 0usize;

    while i < entries.len() {
        match entries[i].diff_type {
            DiffType::Unchanged => {
                rows.push(DiffRow::Unchanged(entries[i].content.clone()));
                i += 1;
            }
            DiffType::Removed => {
                let start = i;
                while i < entries.len() && entries[i].diff_type == DiffType::Removed {
                    i += 1;
                }
                let removed_block = entries[start..i].to_vec();

                // a following added block (if any) pairs with the removals
                let added_start = i;
                while i < entries.len() && entries[i].diff_type == DiffType::Added {
                    i += 1;
                }
                let added_block = entries[added_start..i].to_vec();

                rows.push(DiffRow::Pair(removed_block, added_block));
            }
            DiffType::Added => {
                // added without preceding removal -> right-only
                rows.push(DiffRow::Pair(Vec::new(), vec![entries[i].clone()]));
                i += 1;
            }
        }
    }

    rows
}

fn joined(side: &[DiffEntry]) -> String {
    side.iter().map(|e| e.content.as_str()).collect()
}

/// Calculate character-level statistics from diff rows
pub fn calculate_stats(rows: &[DiffRow]) -> DiffStats {
    let mut stats = DiffStats::default();

    for row in rows {
        if let DiffRow::Pair(left, right) = row {
            let (left_str, right_str) = (joined(left), joined(right));
            let diff = TextDiff::from_chars(&left_str, &right_str);
            for change in diff.iter_all_changes() {
                match change.tag() {
                    ChangeTag::Insert => stats.added_chars += change.value().chars().count(),
                    ChangeTag::Delete => stats.removed_chars += change.value().chars().count(),
                    ChangeTag::Equal => {}
                }
            }
        }
    }

    stats
}

/// Indices of pair rows whose two sides look like a rewrite of each other.
///
/// Purely informational: the edit script is never changed by this.
pub fn likely_rewrites(rows: &[DiffRow], threshold: f32) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| match row {
            DiffRow::Pair(left, right) if !left.is_empty() && !right.is_empty() => {
                let (left_str, right_str) = (joined(left), joined(right));
                let ratio = TextDiff::from_chars(&left_str, &right_str).ratio();
                (ratio >= threshold).then_some(idx)
            }
            _ => None,
        })
        .collect()
}

/// Check if entries contain meaningful changes (non-empty added or removed content)
pub fn has_meaningful_changes(entries: &[DiffEntry]) -> bool {
    entries
        .iter()
        .any(|e| e.diff_type.is_actionable() && !e.content.trim().is_empty())
}
