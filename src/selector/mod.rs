pub mod candidates;
pub mod pattern;
pub mod query;
pub mod randomness;
pub mod resolver;

pub use pattern::pattern_selector;
pub use randomness::{RandomnessHeuristic, is_random_selector};
pub use resolver::{ResolvedSelector, SelectorResolver, generate_unique_selector};

/// Wrap a selector in the `document.querySelector(...)` form used when a
/// selector is copied for pasting into a console or script.
pub fn query_selector_expression(selector: &str) -> String {
    format!("document.querySelector({})", crate::task::js::template_literal(selector))
}
