//! Text normalization
//!
//! Turns two differently formatted documents into comparable paragraph
//! sequences while keeping the original surface form of every paragraph for
//! display.

mod markup;

pub use markup::strip_markup;

use crate::constant::PARAGRAPH_SEPARATOR;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// A blank line, or a run of them, separating two paragraphs.
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n(?:[ \t]*\n)+").expect("PARAGRAPH_BREAK is a valid regex pattern")
});

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("HORIZONTAL_SPACE is a valid regex pattern"));

const SENTENCE_ENDINGS: [char; 4] = ['。', '.', '!', '?'];

/// One paragraph of a document in both of its forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphBlock {
    /// Markup and whitespace noise removed, used for matching
    pub normalized: String,
    /// Original text with only whitespace collapsed, used for output
    pub display: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Also pass each paragraph through [`normalize_line`]
    pub canonical_lines: bool,
}

/// Canonicalize a single line of text.
///
/// Applies NFKC, folds whitespace, dash and tilde variants to ASCII, drops
/// trailing sentence punctuation and removes single spaces wedged between CJK
/// characters and digits.
pub fn normalize_line(line: &str) -> String {
    let canonical: String = line.nfkc().map(unify_char).collect();
    let trimmed = canonical
        .trim_end()
        .trim_end_matches(SENTENCE_ENDINGS)
        .trim_end();
    collapse_whitespace(&remove_spurious_spaces(trimmed))
}

/// Split a document into paragraph blocks with default options
pub fn extract_paragraph_mappings(text: &str) -> Vec<ParagraphBlock> {
    extract_paragraph_mappings_with(text, NormalizeOptions::default())
}

/// Split a document into paragraph blocks.
///
/// Paragraphs are separated by one or more blank lines. Soft line wraps inside
/// a paragraph become single spaces. Paragraphs with no text left after markup
/// stripping are dropped; the rest keep document order.
pub fn extract_paragraph_mappings_with(
    text: &str,
    options: NormalizeOptions,
) -> Vec<ParagraphBlock> {
    let text = normalize_line_endings(text);

    PARAGRAPH_BREAK
        .split(&text)
        .filter_map(|block| {
            let mut normalized = collapse_whitespace(&strip_markup(block));
            if options.canonical_lines {
                normalized = normalize_line(&normalized);
            }
            if normalized.is_empty() {
                return None;
            }
            Some(ParagraphBlock {
                normalized,
                display: collapse_whitespace(block),
            })
        })
        .collect()
}

/// The text the diff engine compares: normalized paragraphs, one per line
pub fn normalize_document(text: &str, options: NormalizeOptions) -> String {
    join_normalized(&extract_paragraph_mappings_with(text, options))
}

pub(crate) fn join_normalized(blocks: &[ParagraphBlock]) -> String {
    blocks
        .iter()
        .map(|block| block.normalized.as_str())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Strip markup and fold horizontal whitespace, keeping line breaks
pub fn normalize_for_comparison(text: &str) -> String {
    let stripped = strip_markup(text);
    HORIZONTAL_SPACE
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Raw blank-line delimited blocks of text that already uses `\n` endings
pub(crate) fn raw_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK.split(text).collect()
}

pub(crate) fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unify_char(c: char) -> char {
    match c {
        c if c.is_whitespace() => ' ',
        '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{2E3A}' | '\u{2E3B}' | '\u{FE58}'
        | '\u{FE63}' | '\u{FF0D}' => '-',
        '\u{301C}' | '\u{3030}' | '\u{223C}' | '\u{223E}' | '\u{2053}' | '\u{FF5E}' => '~',
        c => c,
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3005}'..='\u{3007}'
        | '\u{3040}'..='\u{30FF}'
        | '\u{31F0}'..='\u{31FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2FA1F}')
}

fn is_cjk_or_digit(c: char) -> bool {
    is_cjk(c) || c.is_ascii_digit()
}

/// Drop lone spaces between CJK/digit neighbours where at least one side is CJK.
/// Runs of two or more spaces are left for whitespace collapsing.
fn remove_spurious_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' && i > 0 && i + 1 < chars.len() {
            let (prev, next) = (chars[i - 1], chars[i + 1]);
            if is_cjk_or_digit(prev) && is_cjk_or_digit(next) && (is_cjk(prev) || is_cjk(next)) {
                continue;
            }
        }
        out.push(c);
    }

    out
}
