use super::types::{DiffEntry, DiffType};
use crate::normalize::ParagraphBlock;
use std::collections::{HashMap, VecDeque};

/// Normalized paragraph text to the display forms carrying it, in document order
type ParagraphIndex = HashMap<String, VecDeque<String>>;

fn index_paragraphs(blocks: &[ParagraphBlock]) -> ParagraphIndex {
    let mut index = ParagraphIndex::new();
    for block in blocks {
        if block.normalized.is_empty() {
            continue;
        }
        let display = if block.display.is_empty() {
            block.normalized.clone()
        } else {
            block.display.clone()
        };
        index
            .entry(block.normalized.clone())
            .or_default()
            .push_back(display);
    }
    index
}

fn take_display(index: &mut ParagraphIndex, key: &str) -> Option<String> {
    index.get_mut(key)?.pop_front()
}

/// Replace each entry's normalized content with the display text of the
/// paragraph it came from.
///
/// Repeated paragraphs resolve in document order. Entries with no matching
/// paragraph (partial-line changes, exhausted queues) keep their content.
pub fn hydrate_entries(
    entries: Vec<DiffEntry>,
    source_blocks: &[ParagraphBlock],
    target_blocks: &[ParagraphBlock],
) -> Vec<DiffEntry> {
    let mut source_index = index_paragraphs(source_blocks);
    let mut target_index = index_paragraphs(target_blocks);

    entries
        .into_iter()
        .map(|mut entry| {
            let key = entry.content.as_str();
            let display = match entry.diff_type {
                DiffType::Added => take_display(&mut target_index, key),
                DiffType::Removed => take_display(&mut source_index, key),
                DiffType::Unchanged => take_display(&mut target_index, key)
                    .or_else(|| take_display(&mut source_index, key)),
            };
            if let Some(display) = display.filter(|d| !d.is_empty()) {
                entry.content = display;
            }
            entry
        })
        .collect()
}
