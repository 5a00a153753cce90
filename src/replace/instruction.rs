use crate::diff::{DiffEntry, DiffType};
use crate::error::Result;
use crate::normalize::{normalize_line_endings, raw_paragraphs};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionKind {
    /// Text present only in the target; accepting it removes it from the target
    Added,
    /// Text present only in the source; accepting it re-inserts it into the target
    Removed,
}

impl InstructionKind {
    pub fn from_diff_type(diff_type: DiffType) -> Option<Self> {
        match diff_type {
            DiffType::Added => Some(InstructionKind::Added),
            DiffType::Removed => Some(InstructionKind::Removed),
            DiffType::Unchanged => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionKind::Added => "added",
            InstructionKind::Removed => "removed",
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPosition {
    Before,
    #[default]
    After,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementInstruction {
    #[serde(rename = "type")]
    pub kind: InstructionKind,
    /// Empty for a removal whose text must be recovered next to the anchor
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default)]
    pub anchor_position: AnchorPosition,
}

impl ReplacementInstruction {
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored payload; `type` and `snippet` are required
    pub fn from_payload(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Replacement map key for a diff entry
pub fn entry_key(kind: InstructionKind, entry_index: usize) -> String {
    format!("{}:{}", kind, entry_index)
}

/// Find the line of `text` that best corresponds to `content`.
///
/// Tries, in order: an identical line, a line equal after trimming, a whole
/// paragraph whose whitespace-collapsed form equals the content (returned with
/// its line breaks), and a line containing the content.
pub fn find_matching_line(text: &str, content: &str) -> Option<String> {
    let needle = content.trim();
    if needle.is_empty() {
        return None;
    }

    let text = normalize_line_endings(text);
    let lines: Vec<&str> = text.split('\n').collect();

    if let Some(line) = lines.iter().find(|line| **line == content) {
        return Some(line.to_string());
    }
    if let Some(line) = lines.iter().find(|line| line.trim() == needle) {
        return Some(line.to_string());
    }

    let collapsed_needle = collapse(needle);
    if let Some(block) = raw_paragraphs(&text)
        .into_iter()
        .find(|block| collapse(block) == collapsed_needle)
    {
        return Some(block.trim().to_string());
    }

    lines
        .iter()
        .find(|line| line.contains(needle))
        .map(|line| line.to_string())
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the instruction for the entry at `entry_index`.
///
/// Returns `None` for unchanged entries, which carry no decision.
pub fn build_instruction(
    entries: &[DiffEntry],
    entry_index: usize,
    source: &str,
    target: &str,
    anchor_position: AnchorPosition,
) -> Option<ReplacementInstruction> {
    let entry = entries.get(entry_index)?;
    let kind = InstructionKind::from_diff_type(entry.diff_type)?;

    let document = match kind {
        InstructionKind::Added => target,
        InstructionKind::Removed => source,
    };
    let snippet =
        find_matching_line(document, &entry.content).unwrap_or_else(|| entry.content.clone());

    let (anchor, anchor_position) = find_anchor(entries, entry_index, target, anchor_position);
    Some(ReplacementInstruction {
        kind,
        snippet,
        anchor,
        anchor_position,
    })
}

/// Nearest unchanged entry on the preferred side of `entry_index`, as it
/// appears in the target, together with the side it was found on.
///
/// An `after` anchor precedes the entry and a `before` anchor follows it. When
/// the preferred side has no unchanged entry the other side is used.
fn find_anchor(
    entries: &[DiffEntry],
    entry_index: usize,
    target: &str,
    preferred: AnchorPosition,
) -> (Option<String>, AnchorPosition) {
    let is_unchanged = |candidate: &&DiffEntry| candidate.diff_type == DiffType::Unchanged;
    let preceding = || entries[..entry_index].iter().rev().find(is_unchanged);
    let following = || entries[entry_index + 1..].iter().find(is_unchanged);

    let found = match preferred {
        AnchorPosition::After => preceding()
            .map(|e| (e, AnchorPosition::After))
            .or_else(|| following().map(|e| (e, AnchorPosition::Before))),
        AnchorPosition::Before => following()
            .map(|e| (e, AnchorPosition::Before))
            .or_else(|| preceding().map(|e| (e, AnchorPosition::After))),
    };

    match found {
        Some((candidate, position)) => {
            let anchor = find_matching_line(target, &candidate.content)
                .unwrap_or_else(|| candidate.content.clone());
            (Some(anchor), position)
        }
        None => (None, preferred),
    }
}
