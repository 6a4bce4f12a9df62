use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::candidates::{SelectorCandidates, id_candidate};
use super::query::{parent_element, parse_selector, resolves_uniquely_to};
use super::randomness::RandomnessHeuristic;

// ============================================================================
// Unique selector resolution
// ============================================================================

/// Paths of at most this many fragments are kept whole.
const MAX_FULL_PATH: usize = 3;

/// Outcome of selector synthesis for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "selector", rename_all = "snake_case")]
pub enum ResolvedSelector {
    /// Verified to match exactly the target element within the scope.
    Unique(String),

    /// Walk reached the scope without a verified path; may match several
    /// elements. Callers should warn before trusting it.
    BestEffort(String),

    /// Nothing to build a valid selector from (element is the scope itself,
    /// or the fallback path does not parse).
    NotFound,
}

impl ResolvedSelector {
    /// Selector text; empty for `NotFound`.
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedSelector::Unique(s) | ResolvedSelector::BestEffort(s) => s,
            ResolvedSelector::NotFound => "",
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, ResolvedSelector::Unique(_))
    }

    pub fn is_best_effort(&self) -> bool {
        matches!(self, ResolvedSelector::BestEffort(_))
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, ResolvedSelector::NotFound)
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            ResolvedSelector::Unique(s) | ResolvedSelector::BestEffort(s) => Some(s),
            ResolvedSelector::NotFound => None,
        }
    }
}

/// Builds short, stable selectors that avoid generated tokens.
#[derive(Debug, Clone, Default)]
pub struct SelectorResolver {
    heuristic: RandomnessHeuristic,
}

impl SelectorResolver {
    pub fn new(heuristic: RandomnessHeuristic) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> &RandomnessHeuristic {
        &self.heuristic
    }

    /// Synthesize a selector for `element`, unique within `scope`.
    ///
    /// `scope` defaults to the document's root element. The walk goes from
    /// the element up to (not including) the scope; at each level the cheapest
    /// fragment that makes the whole path unique wins. When no level yields a
    /// unique path the accumulated descriptive path is returned as
    /// [`ResolvedSelector::BestEffort`].
    pub fn resolve<'a>(&self, element: ElementRef<'a>, scope: Option<ElementRef<'a>>) -> ResolvedSelector {
        let scope = scope.unwrap_or_else(|| document_root(element));
        if element == scope {
            return ResolvedSelector::NotFound;
        }

        if let Some(id) = id_candidate(element, &self.heuristic) {
            if resolves_uniquely_to(scope, &id, element) {
                return ResolvedSelector::Unique(id);
            }
        }

        let mut search = PathSearch {
            path: Vec::new(),
            scope,
            target: element,
        };

        let mut current = Some(element);
        while let Some(node) = current {
            if node == scope {
                break;
            }

            let candidates = SelectorCandidates::for_element(node, &self.heuristic);
            if let Some(found) = search.try_level(&candidates) {
                return ResolvedSelector::Unique(found);
            }

            search.path.insert(0, fallback_fragment(&candidates));
            current = parent_element(node);
        }

        if search.path.is_empty() {
            return ResolvedSelector::NotFound;
        }

        let best_effort = generate_selector_path(&search.path);
        if parse_selector(&best_effort).is_none() {
            debug!(selector = %best_effort, "fallback path is not valid CSS");
            return ResolvedSelector::NotFound;
        }
        if resolves_uniquely_to(scope, &best_effort, element) {
            ResolvedSelector::Unique(best_effort)
        } else {
            debug!(selector = %best_effort, "no unique selector path; using best effort");
            ResolvedSelector::BestEffort(best_effort)
        }
    }
}

/// Synthesize a selector with the default heuristic.
pub fn generate_unique_selector<'a>(element: ElementRef<'a>, scope: Option<ElementRef<'a>>) -> ResolvedSelector {
    SelectorResolver::default().resolve(element, scope)
}

/// Outermost element of the tree that holds `el`.
pub fn document_root(el: ElementRef<'_>) -> ElementRef<'_> {
    let mut root = el;
    while let Some(parent) = parent_element(root) {
        root = parent;
    }
    root
}

struct PathSearch<'a> {
    /// Fragments accumulated so far, outermost first.
    path: Vec<String>,
    scope: ElementRef<'a>,
    target: ElementRef<'a>,
}

impl PathSearch<'_> {
    /// Try every fragment shape for one level, cheapest first.
    fn try_level(&mut self, c: &SelectorCandidates) -> Option<String> {
        let tag = c.tag.as_str();

        if let Some(id) = &c.id {
            if let Some(found) = self.try_fragment(format!("{tag}{id}")) {
                return Some(found);
            }
        }

        for attr in &c.attributes {
            if let Some(found) = self.try_fragment(format!("{tag}{attr}")) {
                return Some(found);
            }
        }

        for class in &c.classes {
            if let Some(found) = self.try_fragment(format!("{tag}{class}")) {
                return Some(found);
            }
        }

        for (i, first) in c.attributes.iter().enumerate() {
            for second in &c.attributes[i + 1..] {
                if let Some(found) = self.try_fragment(format!("{tag}{first}{second}")) {
                    return Some(found);
                }
            }
        }

        for attr in &c.attributes {
            for class in &c.classes {
                if let Some(found) = self.try_fragment(format!("{tag}{attr}{class}")) {
                    return Some(found);
                }
            }
        }

        for (i, first) in c.classes.iter().enumerate() {
            for second in &c.classes[i + 1..] {
                if let Some(found) = self.try_fragment(format!("{tag}{first}{second}")) {
                    return Some(found);
                }
            }
        }

        None
    }

    /// Prepend `fragment`, test the collapsed path, and roll back on failure.
    fn try_fragment(&mut self, fragment: String) -> Option<String> {
        self.path.insert(0, fragment);
        let full = generate_selector_path(&self.path);

        if resolves_uniquely_to(self.scope, &full, self.target) {
            return Some(full);
        }

        debug!(selector = %full, "candidate not unique");
        self.path.remove(0);
        None
    }
}

/// Descriptive, not necessarily unique, fragment used to keep walking upward.
fn fallback_fragment(c: &SelectorCandidates) -> String {
    let mut fragment = c.tag.clone();
    if let Some(attr) = c.shortest_attribute() {
        fragment.push_str(attr);
    }
    if let Some(class) = c.shortest_class() {
        fragment.push_str(class);
    }
    fragment
}

/// Collapse a fragment path into a descendant-combinator selector.
///
/// Short paths are joined as-is. Longer paths keep the outermost and innermost
/// fragments plus the first intermediate fragment carrying a class or a
/// `data-` attribute.
pub fn generate_selector_path(path: &[String]) -> String {
    if path.len() <= MAX_FULL_PATH {
        return path.join(" ");
    }

    let head = &path[0];
    let tail = &path[path.len() - 1];
    let middle = &path[1..path.len() - 1];

    let mut parts = vec![head.as_str()];
    if let Some(marker) = middle
        .iter()
        .find(|fragment| fragment.contains('.') || fragment.contains("data-"))
    {
        parts.push(marker.as_str());
    }
    parts.push(tail.as_str());

    parts.join(" ")
}
