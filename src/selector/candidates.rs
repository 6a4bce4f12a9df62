use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::pattern::pattern_selector;
use super::randomness::RandomnessHeuristic;

// ============================================================================
// Candidate fragments for a single node
// ============================================================================

/// Attributes that churn between renders or carry no identity.
const EXCLUDED_ATTRIBUTES: &[&str] = &[
    "data-src",
    "data-action",
    "data-reg",
    "data-error",
    "data-regerror",
    "data-color",
    "data-loading",
    "data-app-version",
];

/// Non-`data-*` attributes allowed as candidates.
const INCLUDED_ATTRIBUTES: &[&str] = &["role", "aria-label", "name", "type", "href", "id", "class"];

const MAX_ATTRIBUTE_NAME_LEN: usize = 20;
const MAX_ATTRIBUTE_VALUE_LEN: usize = 40;
const MAX_CLASS_LEN: usize = 50;
const MIN_PATTERN_SOURCE_LEN: usize = 5;

const CSS_SPECIAL: &str = r##"!"#$%&'()*+,./:;<=>?@[\]^`{|}~"##;

/// Utility-CSS class shapes (Tailwind and friends) that describe styling,
/// not identity.
static INVALID_CLASS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^[whpmbft]-",
        r"^(flex|grid|gap|items|justify|bg|body|px|border|py|pt|pl|pr|pb|my|mx|mt|mb|ml|mr|font|outline|grow|col)-",
        r"(flex|grid|relative|absolute|fixed|sticky|static)",
        r"(?i)(focus|undefined|!)",
        r##"[!"#$%&'()*+,./:;<=>?@\[\\\]^`{|}~]"##,
        r"^-?\d",
        r"^--",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Ordered candidate fragments (without tag) for one element.
///
/// Each list is sorted shortest first, ties broken lexicographically, so the
/// resolver always tries the cheapest fragment first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorCandidates {
    pub tag: String,
    pub id: Option<String>,
    pub attributes: Vec<String>,
    pub classes: Vec<String>,
}

impl SelectorCandidates {
    pub fn for_element(el: ElementRef<'_>, heuristic: &RandomnessHeuristic) -> Self {
        Self {
            tag: el.value().name().to_ascii_lowercase(),
            id: id_candidate(el, heuristic),
            attributes: attribute_candidates(el, heuristic),
            classes: class_candidates(el, heuristic),
        }
    }

    pub fn shortest_attribute(&self) -> Option<&str> {
        self.attributes.first().map(String::as_str)
    }

    pub fn shortest_class(&self) -> Option<&str> {
        self.classes.first().map(String::as_str)
    }
}

/// `#id` for a human-authored id, a pattern selector for a generated one.
pub fn id_candidate(el: ElementRef<'_>, heuristic: &RandomnessHeuristic) -> Option<String> {
    let id = el.value().attr("id")?;
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        return None;
    }

    if !heuristic.is_random(id) {
        return Some(format!("#{}", escape_css(id)));
    }

    if id.len() > MIN_PATTERN_SOURCE_LEN {
        return pattern_selector("id", id);
    }

    None
}

/// `[name='value']` fragments for stable, identifying attributes.
pub fn attribute_candidates(el: ElementRef<'_>, heuristic: &RandomnessHeuristic) -> Vec<String> {
    let mut selectors: Vec<String> = el
        .value()
        .attrs()
        .filter(|(name, value)| is_candidate_attribute(name, value, heuristic))
        .map(|(name, value)| {
            if value.is_empty() || value.len() > MAX_ATTRIBUTE_VALUE_LEN {
                format!("[{}]", name)
            } else {
                format!("[{}='{}']", name, escape_quoted(value))
            }
        })
        .collect();

    sort_candidates(&mut selectors);
    selectors
}

fn is_candidate_attribute(name: &str, value: &str, heuristic: &RandomnessHeuristic) -> bool {
    if is_numeric(name)
        || is_numeric(value)
        || name.starts_with("data-v-")
        || EXCLUDED_ATTRIBUTES.contains(&name)
        || name.len() >= MAX_ATTRIBUTE_NAME_LEN
        || heuristic.is_random(value)
        || value.chars().any(char::is_whitespace)
    {
        return false;
    }

    name.starts_with("data-") || INCLUDED_ATTRIBUTES.contains(&name)
}

/// `.class` fragments for semantic classes; pattern selectors for generated ones.
pub fn class_candidates(el: ElementRef<'_>, heuristic: &RandomnessHeuristic) -> Vec<String> {
    let Some(class_attr) = el.value().attr("class") else {
        return Vec::new();
    };

    let mut selectors = Vec::new();
    for class in class_attr.split_whitespace() {
        if class.len() > MAX_CLASS_LEN {
            continue;
        }

        let random = heuristic.is_random(class);
        if !random && !is_invalid_class(class) {
            selectors.push(format!(".{}", class.replace(':', "\\:")));
        } else if random && class.len() > MIN_PATTERN_SOURCE_LEN {
            if let Some(pattern) = pattern_selector("class", class) {
                selectors.push(pattern);
            }
        }
    }

    sort_candidates(&mut selectors);
    selectors.dedup();
    selectors
}

/// Utility/atomic CSS classes and tokens unusable as `.class` selectors.
pub fn is_invalid_class(class: &str) -> bool {
    INVALID_CLASS_PATTERNS.iter().any(|re| re.is_match(class))
}

/// Backslash-escape CSS special characters for use in an `#id` selector.
pub fn escape_css(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if CSS_SPECIAL.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn sort_candidates(selectors: &mut [String]) {
    selectors.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
}
