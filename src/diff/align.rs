//! Grapheme alignment on top of `similar`'s Myers implementation.

use similar::DiffTag;
use similar::algorithms::{Algorithm, Capture, diff_slices};
use std::ops::Range;

/// A run of one kind of edit. Runs come out in order, cover both sequences
/// exactly, and no two neighbours share a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Run {
    pub tag: DiffTag,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

/// Minimal edit script between two grapheme sequences
pub(crate) fn align(old: &[&str], new: &[&str]) -> Vec<Run> {
    let mut capture = Capture::new();
    let Ok(()) = diff_slices(Algorithm::Myers, &mut capture, old, new);

    let mut runs: Vec<Run> = Vec::new();
    for op in capture.into_ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if let Some(last) = runs.last_mut()
            && last.tag == tag
            && last.old.end == old_range.start
            && last.new.end == new_range.start
        {
            last.old.end = old_range.end;
            last.new.end = new_range.end;
            continue;
        }
        runs.push(Run {
            tag,
            old: old_range,
            new: new_range,
        });
    }
    runs
}
