use std::sync::LazyLock;

use regex::Regex;

// ============================================================================
// Pattern selectors for generated values
// ============================================================================

static PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_.]+)[-_]\d+").expect("valid regex"));

static SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[-_]([A-Za-z_]+)$").expect("valid regex"));

static SEGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9_-]+").expect("valid regex"));

/// Known keywords, highest priority first. Matching follows list order, not
/// position in the value.
pub const PRIORITY_WORDS: &[&str] = &[
    "email", "password", "submit", "cancel", "save", "delete", "edit", "add", "remove",
    "button", "input", "form", "field", "text", "name", "modal", "container", "content",
    "btn",
];

const MIN_STABLE_LEN: usize = 3;
const MIN_SEGMENT_LEN: usize = 4;

/// Build a partial-match attribute selector from the stable part of `value`.
///
/// Tries, in order: a word prefix before `-<digits>` (`^=`), a word suffix
/// after `<digits>-` (`$=`), a known keyword (`*=`, original casing kept),
/// and finally the longest alphabetic segment (`*=`).
pub fn pattern_selector(attr: &str, value: &str) -> Option<String> {
    if value.chars().count() < MIN_STABLE_LEN {
        return None;
    }

    if let Some(prefix) = PREFIX.captures(value).and_then(|c| c.get(1)) {
        if prefix.as_str().len() >= MIN_STABLE_LEN {
            return Some(format!("[{}^=\"{}\"]", attr, prefix.as_str()));
        }
    }

    if let Some(suffix) = SUFFIX.captures(value).and_then(|c| c.get(1)) {
        if suffix.as_str().len() >= MIN_STABLE_LEN {
            return Some(format!("[{}$=\"{}\"]", attr, suffix.as_str()));
        }
    }

    if let Some(word) = keyword_span(value) {
        return Some(format!("[{}*=\"{}\"]", attr, word));
    }

    longest_segment(value).map(|segment| format!("[{}*=\"{}\"]", attr, segment))
}

/// The first priority keyword contained in `value`, as spelled in `value`.
fn keyword_span(value: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with the original.
    let lower = value.to_ascii_lowercase();

    PRIORITY_WORDS.iter().find_map(|word| {
        if value.len() <= word.len() + 2 {
            return None;
        }
        lower
            .find(word)
            .map(|start| &value[start..start + word.len()])
    })
}

fn longest_segment(value: &str) -> Option<&str> {
    SEGMENT_SPLIT
        .split(value)
        .filter(|seg| seg.len() >= MIN_SEGMENT_LEN && seg.chars().all(|c| c.is_ascii_alphabetic()))
        .fold(None, |best: Option<&str>, seg| match best {
            Some(b) if b.len() > seg.len() => Some(b),
            _ => Some(seg),
        })
}
