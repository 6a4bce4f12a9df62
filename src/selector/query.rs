use scraper::{ElementRef, Selector};
use tracing::debug;

// ============================================================================
// querySelectorAll-style reads over a parsed document
// ============================================================================

/// Parse a CSS selector, logging (not propagating) syntax errors.
pub fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!(selector = css, error = ?e, "unparsable selector");
            None
        }
    }
}

/// All elements under `scope` matching `css`, in document order.
///
/// Mirrors `scope.querySelectorAll(css)`: the scope itself never matches,
/// while ancestors outside the scope may satisfy combinators. An unparsable
/// selector matches nothing.
pub fn query_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = parse_selector(css) else {
        return Vec::new();
    };

    scope
        .select(&selector)
        .filter(|el| *el != scope)
        .collect()
}

/// First element under `scope` matching `css`.
pub fn query_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(css)?;
    scope.select(&selector).find(|el| *el != scope)
}

/// True when `css` resolves to exactly `target` within `scope`.
pub fn resolves_uniquely_to<'a>(scope: ElementRef<'a>, css: &str, target: ElementRef<'a>) -> bool {
    let Some(selector) = parse_selector(css) else {
        return false;
    };

    let mut matches = scope.select(&selector).filter(|el| *el != scope);
    match (matches.next(), matches.next()) {
        (Some(only), None) => only == target,
        _ => false,
    }
}

/// True when `css` matches exactly one element within `scope`.
pub fn is_unique(scope: ElementRef<'_>, css: &str) -> bool {
    let Some(selector) = parse_selector(css) else {
        return false;
    };

    let mut matches = scope.select(&selector).filter(|el| *el != scope);
    matches.next().is_some() && matches.next().is_none()
}

/// Parent element, skipping the document node.
pub fn parent_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Direct element children.
pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

/// Whitespace-collapsed text content, roughly what `innerText` shows.
pub fn inner_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
