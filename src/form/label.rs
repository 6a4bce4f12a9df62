use scraper::{ElementRef, Html};

use crate::selector::query::{child_elements, inner_text, parent_element, query_all, query_first};

// ============================================================================
// Label extraction
// ============================================================================

/// Label text for the first element matching `selector` in `doc`.
///
/// Empty when the selector matches nothing or no strategy yields text.
pub fn get_label_text(selector: &str, doc: &Html) -> String {
    match query_first(doc.root_element(), selector) {
        Some(el) => label_for(el, doc),
        None => String::new(),
    }
}

/// Label text for a form control. Strategies, first non-empty wins:
/// `<label for=id>`, enclosing `<label>`, a sibling `<label>`, a `<label>`
/// next to the parent (wrapped-input layouts), then the placeholder.
pub fn label_for(el: ElementRef<'_>, doc: &Html) -> String {
    non_empty(by_for_attribute(el, doc))
        .or_else(|| non_empty(by_enclosing_label(el)))
        .or_else(|| non_empty(by_sibling(el)))
        .or_else(|| non_empty(by_parent_sibling(el)))
        .or_else(|| el.value().attr("placeholder").map(|p| p.trim().to_string()))
        .unwrap_or_default()
}

fn non_empty(label: String) -> Option<String> {
    (!label.is_empty()).then_some(label)
}

fn by_for_attribute(el: ElementRef<'_>, doc: &Html) -> String {
    let Some(id) = el.value().attr("id").filter(|id| !id.is_empty()) else {
        return String::new();
    };

    query_all(doc.root_element(), "label[for]")
        .into_iter()
        .find(|label| label.value().attr("for") == Some(id))
        .map(inner_text)
        .unwrap_or_default()
}

fn by_enclosing_label(el: ElementRef<'_>) -> String {
    let mut current = parent_element(el);
    while let Some(node) = current {
        if is_label(node) {
            return inner_text(node);
        }
        current = parent_element(node);
    }
    String::new()
}

fn by_sibling(el: ElementRef<'_>) -> String {
    parent_element(el)
        .and_then(|parent| child_elements(parent).find(|c| is_label(*c)))
        .map(inner_text)
        .unwrap_or_default()
}

fn by_parent_sibling(el: ElementRef<'_>) -> String {
    let Some(parent) = parent_element(el) else {
        return String::new();
    };

    parent_element(parent)
        .and_then(|grandparent| child_elements(grandparent).find(|c| *c != parent && is_label(*c)))
        .map(inner_text)
        .unwrap_or_default()
}

fn is_label(el: ElementRef<'_>) -> bool {
    el.value().name().eq_ignore_ascii_case("label")
}
