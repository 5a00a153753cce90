use regex::Regex;
use std::sync::LazyLock;

struct Rule {
    pattern: LazyLock<Regex>,
    replacement: &'static str,
}

macro_rules! rule {
    ($pattern:expr, $replacement:expr) => {
        Rule {
            pattern: LazyLock::new(|| {
                Regex::new($pattern).expect("markup pattern is a valid regex")
            }),
            replacement: $replacement,
        }
    };
}

/// Applied in order. Block-level markers first so that `***` rules and `* `
/// list bullets are gone before emphasis is matched.
static RULES: [Rule; 16] = [
    // code fence marker lines, the fenced code itself is kept
    rule!(r"(?m)^[ \t]*(?:```|~~~).*$", ""),
    // horizontal rules
    rule!(r"(?m)^[ \t]*(?:-{3,}|\*{3,}|_{3,})[ \t]*$", ""),
    // reference definitions: [ref]: https://...
    rule!(r"(?m)^[ \t]*\[[^\]]+\]:[ \t]+\S.*$", ""),
    // headers
    rule!(r"(?m)^[ \t]*#{1,6}[ \t]+", ""),
    // blockquote markers, possibly nested
    rule!(r"(?m)^[ \t]*(?:>[ \t]?)+", ""),
    // list markers
    rule!(r"(?m)^[ \t]*(?:[-*+]|\d{1,9}[.)])[ \t]+", ""),
    // html comments and tags
    rule!(r"(?s)<!--.*?-->", ""),
    rule!(r"</?[A-Za-z][^>]*>", ""),
    // images and links
    rule!(r"!\[([^\]]*)\]\([^)]*\)", "${1}"),
    rule!(r"\[([^\]]+)\]\([^)]*\)", "${1}"),
    rule!(r"\[([^\]]+)\]\[[^\]]*\]", "${1}"),
    // inline code
    rule!(r"`+([^`]+?)`+", "${1}"),
    // emphasis
    rule!(r"\*\*(.+?)\*\*", "${1}"),
    rule!(r"__(.+?)__", "${1}"),
    rule!(r"\*(.+?)\*", "${1}"),
    rule!(r"_(.+?)_", "${1}"),
];

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"  +").expect("MULTI_SPACE is a valid regex pattern"));

/// Remove markdown and embedded HTML syntax, keeping the readable text.
///
/// Line structure is preserved so the result can still be split into lines.
pub fn strip_markup(text: &str) -> String {
    let mut result = text.to_string();
    for rule in RULES.iter() {
        result = rule
            .pattern
            .replace_all(&result, rule.replacement)
            .into_owned();
    }
    MULTI_SPACE.replace_all(&result, " ").into_owned()
}
