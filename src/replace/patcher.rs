//! Replays accepted decisions onto the target document.
//!
//! Instructions are applied one after another, each against the text left by
//! the previous one. Anchors and snippets are always searched in the current
//! text, never located through stored offsets, so earlier edits and drift in
//! the document do not invalidate later instructions. A snippet or anchor that
//! cannot be found is not an error.

use super::instruction::{AnchorPosition, InstructionKind, ReplacementInstruction};
use super::map::ReplacementMap;
use crate::error::{ReconcileError, Result};
use crate::file::{read_text, write_text};
use crate::normalize::normalize_line_endings;
use std::path::Path;
use tracing::{debug, info};

/// Apply instructions in order. CRLF line endings of the target are preserved.
pub fn apply<'a, I>(target: &str, source: &str, instructions: I) -> String
where
    I: IntoIterator<Item = &'a ReplacementInstruction>,
{
    let crlf = target.contains("\r\n");
    let source = normalize_line_endings(source);
    let mut result = normalize_line_endings(target);

    for instruction in instructions {
        result = apply_instruction(&result, instruction, &source);
    }

    if crlf { result.replace('\n', "\r\n") } else { result }
}

/// Apply a single instruction to text with `\n` line endings
pub fn apply_instruction(
    target: &str,
    instruction: &ReplacementInstruction,
    source: &str,
) -> String {
    match instruction.kind {
        InstructionKind::Added => remove_snippet(target, &instruction.snippet),
        InstructionKind::Removed => {
            let anchor = instruction.anchor.as_deref().filter(|a| !a.is_empty());
            let snippet = if instruction.snippet.is_empty() {
                anchor.and_then(|a| {
                    find_snippet_near_anchor(source, a, instruction.anchor_position)
                })
            } else {
                Some(instruction.snippet.clone())
            };
            match snippet {
                Some(snippet) => {
                    insert_snippet(target, &snippet, anchor, instruction.anchor_position)
                }
                None => {
                    debug!("No snippet recovered for removal next to {:?}", anchor);
                    target.to_string()
                }
            }
        }
    }
}

/// Deserialize every payload of the map and apply them to `target`.
///
/// A payload that fails to parse aborts the whole batch.
pub fn apply_replacements(
    target: &str,
    source: &str,
    replacements: &ReplacementMap,
) -> Result<String> {
    let instructions = replacements
        .iter()
        .map(|(key, payload)| {
            ReplacementInstruction::from_payload(payload)
                .map_err(|e| ReconcileError::for_key(key, e))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Applying {} replacements", instructions.len());
    Ok(apply(target, source, &instructions))
}

/// Apply the map to the target file and overwrite it.
///
/// Nothing is written when the map is empty.
pub fn apply_replacements_to_file(
    source_path: &Path,
    target_path: &Path,
    replacements: &ReplacementMap,
) -> Result<String> {
    let source = read_text(source_path)?;
    let target = read_text(target_path)?;

    if replacements.is_empty() {
        return Ok(target);
    }

    let result = apply_replacements(&target, &source, replacements)?;
    write_text(target_path, &result)?;
    info!("Wrote reconciled text to {:?}", target_path);
    Ok(result)
}

fn remove_snippet(target: &str, snippet: &str) -> String {
    let snippet = snippet.replace('\r', "");
    if snippet.is_empty() {
        return target.to_string();
    }

    let snippet_lines: Vec<&str> = snippet
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if !snippet_lines.is_empty() {
        let mut lines: Vec<&str> = target.split('\n').collect();
        let block = snippet_lines.len();
        if let Some(start) = (0..=lines.len().saturating_sub(block)).find(|&i| {
            lines.len() >= i + block
                && lines[i..i + block]
                    .iter()
                    .zip(&snippet_lines)
                    .all(|(line, wanted)| line.trim() == *wanted)
        }) {
            lines.drain(start..start + block);
            // removing a paragraph between two blank lines leaves one of them
            if start > 0
                && start < lines.len()
                && lines[start - 1].trim().is_empty()
                && lines[start].trim().is_empty()
            {
                lines.remove(start);
            }
            return lines.join("\n");
        }
    }

    let candidates = [snippet.clone(), format!("\n{}", snippet), format!("{}\n", snippet)];
    for needle in &candidates {
        if let Some(result) = remove_direct_match(target, needle) {
            return result;
        }
    }

    debug!("Snippet not found for removal: {:?}", snippet);
    target.to_string()
}

fn remove_direct_match(target: &str, needle: &str) -> Option<String> {
    let index = target.find(needle)?;
    let before = &target[..index];
    let after = &target[index + needle.len()..];
    if before.ends_with('\n') && after.starts_with('\n') {
        return Some(format!("{}{}", before, &after[1..]));
    }
    Some(format!("{}{}", before, after))
}

/// Look for the line next to an occurrence of `anchor` in `text`
fn find_snippet_near_anchor(text: &str, anchor: &str, position: AnchorPosition) -> Option<String> {
    let anchor = anchor.replace('\r', "");
    if anchor.is_empty() {
        return None;
    }

    let locations: Vec<usize> = text.match_indices(anchor.as_str()).map(|(idx, _)| idx).collect();
    let candidate = |location: &usize| match position {
        AnchorPosition::Before => line_before(text, *location),
        AnchorPosition::After => line_after(text, *location + anchor.len()),
    };

    match position {
        AnchorPosition::Before => locations.iter().rev().find_map(candidate),
        AnchorPosition::After => locations.iter().find_map(candidate),
    }
}

fn line_after(text: &str, start: usize) -> Option<String> {
    text[start..]
        .split('\n')
        .find(|segment| !segment.trim().is_empty())
        .map(str::to_string)
}

fn line_before(text: &str, end: usize) -> Option<String> {
    text[..end]
        .split('\n')
        .rev()
        .find(|segment| !segment.trim().is_empty())
        .map(str::to_string)
}

/// Place `snippet` on its own line next to the anchor, or at the end of the
/// text when the anchor is absent or cannot be found.
///
/// When the anchor is a paragraph of its own on the side the snippet goes, the
/// snippet is inserted as a paragraph too.
fn insert_snippet(
    target: &str,
    snippet: &str,
    anchor: Option<&str>,
    position: AnchorPosition,
) -> String {
    if snippet.is_empty() {
        return target.to_string();
    }

    let body = snippet.strip_suffix('\n').unwrap_or(snippet);

    let Some((anchor, index)) = anchor.and_then(|a| target.find(a).map(|idx| (a, idx))) else {
        debug!("Anchor not found, appending at end of document");
        return format!("{}\n{}\n", target.trim_end(), body);
    };

    let head = &target[..index];
    let tail = &target[index + anchor.len()..];
    let opens_paragraph = head.trim().is_empty() || head.ends_with("\n\n");
    let closes_paragraph = tail.trim().is_empty() || tail.starts_with("\n\n");

    match position {
        AnchorPosition::Before => {
            let separator = if head.ends_with("\n\n") || (opens_paragraph && closes_paragraph) {
                "\n\n"
            } else {
                "\n"
            };
            format!("{}{}{}{}", head, body, separator, &target[index..])
        }
        AnchorPosition::After => {
            let through_anchor = &target[..index + anchor.len()];
            if tail.starts_with("\n\n") {
                format!("{}\n\n{}{}", through_anchor, body, tail)
            } else {
                let rest = tail.strip_prefix('\n').unwrap_or(tail);
                let separator = if opens_paragraph && closes_paragraph {
                    "\n\n"
                } else {
                    "\n"
                };
                format!("{}{}{}\n{}", through_anchor, separator, body, rest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removal(snippet: &str) -> ReplacementInstruction {
        ReplacementInstruction {
            kind: InstructionKind::Added,
            snippet: snippet.to_string(),
            anchor: None,
            anchor_position: AnchorPosition::After,
        }
    }

    fn insertion(
        snippet: &str,
        anchor: Option<&str>,
        position: AnchorPosition,
    ) -> ReplacementInstruction {
        ReplacementInstruction {
            kind: InstructionKind::Removed,
            snippet: snippet.to_string(),
            anchor: anchor.map(str::to_string),
            anchor_position: position,
        }
    }

    #[test]
    fn removes_exactly_one_line() {
        let result = apply("A\nC\nB\nC", "", &[removal("C")]);
        assert_eq!(result, "A\nB\nC");
    }

    #[test]
    fn removal_leaves_no_double_blank_line() {
        let result = apply("A\n\nC\n\nB", "", &[removal("C")]);
        assert_eq!(result, "A\n\nB");
    }

    #[test]
    fn removes_multi_line_block_with_trimmed_match() {
        let result = apply("intro\n  one\ntwo  \noutro", "", &[removal("one\n\ntwo")]);
        assert_eq!(result, "intro\noutro");
    }

    #[test]
    fn removal_falls_back_to_substring() {
        let result = apply("keep this, drop that", "", &[removal(", drop that")]);
        assert_eq!(result, "keep this");
    }

    #[test]
    fn removal_miss_is_a_no_op() {
        assert_eq!(apply("A\nB", "", &[removal("Z")]), "A\nB");
        assert_eq!(apply("A\nB", "", &[removal("")]), "A\nB");
    }

    #[test]
    fn inserts_after_anchor() {
        let result = apply("A\nB", "", &[insertion("X", Some("A"), AnchorPosition::After)]);
        assert_eq!(result, "A\nX\nB");
    }

    #[test]
    fn inserts_before_anchor() {
        let result = apply("A\nB", "", &[insertion("X", Some("B"), AnchorPosition::Before)]);
        assert_eq!(result, "A\nX\nB");
    }

    #[test]
    fn inserts_as_paragraph_between_paragraphs() {
        let after = apply("P1\n\nP3", "", &[insertion("P2", Some("P1"), AnchorPosition::After)]);
        assert_eq!(after, "P1\n\nP2\n\nP3");
        let before = apply("P1\n\nP3", "", &[insertion("P2", Some("P3"), AnchorPosition::Before)]);
        assert_eq!(before, "P1\n\nP2\n\nP3");
    }

    #[test]
    fn inserts_as_paragraph_after_last_paragraph() {
        let result = apply("A\n\nB\n", "", &[insertion("C", Some("B"), AnchorPosition::After)]);
        assert_eq!(result, "A\n\nB\n\nC\n");
        let result = apply("A\n\nB", "", &[insertion("C", Some("B"), AnchorPosition::After)]);
        assert_eq!(result, "A\n\nB\n\nC\n");
    }

    #[test]
    fn inserts_as_paragraph_before_first_paragraph() {
        let result = apply("B\n\nC", "", &[insertion("A", Some("B"), AnchorPosition::Before)]);
        assert_eq!(result, "A\n\nB\n\nC");
    }

    #[test]
    fn soft_wrapped_last_line_stays_a_line() {
        let result = apply("A\nB\n", "", &[insertion("C", Some("B"), AnchorPosition::After)]);
        assert_eq!(result, "A\nB\nC\n");
    }

    #[test]
    fn missing_anchor_appends_at_end() {
        let stray = insertion("X", Some("nowhere"), AnchorPosition::After);
        let result = apply("A\nB\n\n", "", &[stray]);
        assert_eq!(result, "A\nB\nX\n");
        let result = apply("A", "", &[insertion("X", None, AnchorPosition::After)]);
        assert_eq!(result, "A\nX\n");
    }

    #[test]
    fn recovers_snippet_from_source() {
        let source = "Title\nlost line\n\nBody";
        let after_title = insertion("", Some("Title"), AnchorPosition::After);
        let after = apply("Title\nBody", source, &[after_title]);
        assert_eq!(after, "Title\nlost line\nBody");

        let before_body = insertion("", Some("Body"), AnchorPosition::Before);
        let before = apply("Title\nBody", source, &[before_body]);
        assert_eq!(before, "Title\nlost line\nBody");
    }

    #[test]
    fn unrecoverable_insertion_is_a_no_op() {
        let orphan = insertion("", Some("Title"), AnchorPosition::After);
        let result = apply("Title", "Other", &[orphan]);
        assert_eq!(result, "Title");
    }

    #[test]
    fn instructions_see_previous_edits() {
        let instructions = [
            removal("old"),
            insertion("new", Some("head"), AnchorPosition::After),
            removal("new"),
        ];
        let result = apply("head\nold\ntail", "", &instructions);
        assert_eq!(result, "head\ntail");
    }

    #[test]
    fn preserves_crlf() {
        let result = apply("A\r\nC\r\nB", "", &[removal("C")]);
        assert_eq!(result, "A\r\nB");
    }

    #[test]
    fn batch_aborts_on_bad_payload() {
        let mut map = ReplacementMap::new();
        map.insert("added:0", removal("A").to_payload().unwrap());
        map.insert("removed:1", r#"{"type":"removed"}"#);

        match apply_replacements("A\nB", "", &map) {
            Err(ReconcileError::Instruction { key, source }) => {
                assert_eq!(key, "removed:1");
                assert!(matches!(*source, ReconcileError::Parse(_)));
            }
            other => panic!("expected instruction error, got {:?}", other),
        }
    }

    #[test]
    fn batch_applies_in_map_order() {
        let mut map = ReplacementMap::new();
        let restore = insertion("X", Some("A"), AnchorPosition::After);
        map.insert("removed:1", restore.to_payload().unwrap());
        map.insert("added:0", removal("B").to_payload().unwrap());
        assert_eq!(apply_replacements("A\nB", "", &map).unwrap(), "A\nX");
    }
}
