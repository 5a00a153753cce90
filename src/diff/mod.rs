//! Paragraph-aware comparison of two documents.
//!
//! Both documents are normalized into paragraphs, the joined normalized texts
//! are aligned grapheme by grapheme with Myers' algorithm, the edit script is
//! cut into line entries, and finally every entry is hydrated back to the
//! display form of its paragraph where one exists.

mod align;
mod hydrate;
mod rows;
mod types;

pub use hydrate::hydrate_entries;
pub use rows::{
    DiffRow, DiffStats, calculate_stats, group_into_rows, has_meaningful_changes, likely_rewrites,
};
pub use types::{Comparison, DiffEntry, DiffResult, DiffSummary, DiffType};

use crate::error::Result;
use crate::file::read_text;
use crate::normalize::{NormalizeOptions, extract_paragraph_mappings_with, join_normalized};
use similar::DiffTag;
use std::path::Path;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

/// Diff two already normalized texts.
///
/// Every run of the edit script is split on newlines and each non-blank piece
/// becomes one entry, so entries never straddle a line break and blank lines
/// produce no entries at all.
pub fn diff_texts(source: &str, target: &str) -> DiffResult {
    let old: Vec<&str> = source.graphemes(true).collect();
    let new: Vec<&str> = target.graphemes(true).collect();
    let runs = align::align(&old, &new);
    debug!(
        "Aligned {} and {} graphemes into {} runs",
        old.len(),
        new.len(),
        runs.len()
    );

    let mut lines = LineCursor::default();
    for run in runs {
        let old_text = old[run.old].concat();
        let new_text = new[run.new].concat();
        match run.tag {
            DiffTag::Equal => lines.push(&old_text, DiffType::Unchanged),
            DiffTag::Delete => lines.push(&old_text, DiffType::Removed),
            DiffTag::Insert => lines.push(&new_text, DiffType::Added),
            DiffTag::Replace => {
                lines.push(&old_text, DiffType::Removed);
                lines.push(&new_text, DiffType::Added);
            }
        }
    }

    DiffResult::new(lines.entries)
}

/// Cuts edit runs into line entries while tracking the 1-based line of each
/// document
struct LineCursor {
    source_line: usize,
    target_line: usize,
    entries: Vec<DiffEntry>,
}

impl Default for LineCursor {
    fn default() -> Self {
        Self {
            source_line: 1,
            target_line: 1,
            entries: Vec::new(),
        }
    }
}

impl LineCursor {
    fn push(&mut self, text: &str, diff_type: DiffType) {
        let start_line = match diff_type {
            DiffType::Added => self.target_line,
            DiffType::Removed | DiffType::Unchanged => self.source_line,
        };
        for (offset, piece) in text.split('\n').enumerate() {
            if piece.trim().is_empty() {
                continue;
            }
            self.entries.push(DiffEntry {
                diff_type,
                content: piece.to_string(),
                line_number: start_line + offset,
            });
        }

        let newlines = text.matches('\n').count();
        match diff_type {
            DiffType::Unchanged => {
                self.source_line += newlines;
                self.target_line += newlines;
            }
            DiffType::Removed => self.source_line += newlines,
            DiffType::Added => self.target_line += newlines,
        }
    }
}

/// Compare two raw documents: normalize, diff, then hydrate display text.
///
/// The summary counts are those of the raw diff; hydration only rewrites
/// entry contents.
pub fn compare_texts(source: &str, target: &str, options: NormalizeOptions) -> Comparison {
    let source_blocks = extract_paragraph_mappings_with(source, options);
    let target_blocks = extract_paragraph_mappings_with(target, options);

    let raw = diff_texts(&join_normalized(&source_blocks), &join_normalized(&target_blocks));
    let entries = hydrate_entries(raw.entries, &source_blocks, &target_blocks);
    debug!(
        "Compared {} source and {} target paragraphs: {:?}",
        source_blocks.len(),
        target_blocks.len(),
        raw.summary
    );

    Comparison {
        source: source.to_string(),
        target: target.to_string(),
        diffs: DiffResult {
            entries,
            summary: raw.summary,
        },
    }
}

/// Read and compare two documents
pub fn compare_files(
    source_path: &Path,
    target_path: &Path,
    options: NormalizeOptions,
) -> Result<Comparison> {
    let source = read_text(source_path)?;
    let target = read_text(target_path)?;
    Ok(compare_texts(&source, &target, options))
}
