use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use crate::browser::page::PageDocuments;
use crate::selector::query::query_first;

static WRAPPED_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"document\.querySelector\(['"`](.*?)['"`]\)"#).expect("valid regex")
});

/// Strip a `document.querySelector(...)` wrapper, if present.
pub fn extract_selector(input: &str) -> &str {
    WRAPPED_SELECTOR
        .captures(input)
        .and_then(|c| c.get(1))
        .map_or(input, |m| m.as_str())
}

/// Find the element a stored selector points at.
///
/// With `iframe_index` the lookup runs in that frame's document; with
/// `parent_selector` it runs inside the first match of the parent. Both
/// selectors may be given in wrapped `document.querySelector(...)` form.
pub fn locate<'a>(
    page: &'a PageDocuments,
    selector: &str,
    parent_selector: Option<&str>,
    iframe_index: Option<usize>,
) -> Option<ElementRef<'a>> {
    let Some(document) = page.document(iframe_index) else {
        debug!(?iframe_index, "iframe document not available");
        return None;
    };

    let root = document.root_element();
    let scope = match parent_selector.filter(|p| !p.is_empty()) {
        Some(parent) => query_first(root, extract_selector(parent))?,
        None => root,
    };

    query_first(scope, extract_selector(selector))
}
