use std::cmp::Ordering;

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::browser::layout::LayoutProvider;
use crate::browser::page::PageDocuments;
use crate::form::classifier::determine_element_type;
use crate::form::form_model::{FormElement, FormGroup, FormGroups, NON_FORM_KEY};
use crate::selector::query::{parent_element, query_all};
use crate::selector::{ResolvedSelector, SelectorResolver};

/// Interactive elements collected by a parse pass.
pub const DEFAULT_INTERACTIVE_SELECTOR: &str =
    "input:not([type=hidden]), select, textarea, button, [role=button], a[href]";

/// Elements whose tops differ by at most this much share a visual row.
pub const ROW_TOLERANCE: f64 = 10.0;

// ============================================================================
// Scan configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// CSS selector list for the elements worth scripting against
    pub interactive_selector: String,

    /// Collect elements outside any `<form>` into the non-form bucket
    pub include_non_form: bool,

    /// Drop elements with an all-zero bounding box
    pub drop_zero_positions: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interactive_selector: DEFAULT_INTERACTIVE_SELECTOR.to_string(),
            include_non_form: true,
            drop_zero_positions: false,
        }
    }
}

// ============================================================================
// Form/element graph builder
// ============================================================================

/// Builds a [`FormGroups`] snapshot from a parsed page. Every call is a full
/// pass; nothing is carried over between passes.
#[derive(Debug, Clone, Default)]
pub struct FormScanner {
    resolver: SelectorResolver,
    config: ScanConfig,
}

/// Where a document sits in the page.
#[derive(Clone, Copy)]
struct DocumentScope<'p> {
    iframe_index: Option<usize>,
    iframe_selector: Option<&'p str>,
}

impl DocumentScope<'_> {
    fn key(&self, local: &str) -> String {
        match self.iframe_index {
            Some(index) => format!("iframe_{index}_{local}"),
            None => local.to_string(),
        }
    }
}

impl FormScanner {
    pub fn new(resolver: SelectorResolver, config: ScanConfig) -> Self {
        Self { resolver, config }
    }

    pub fn resolver(&self) -> &SelectorResolver {
        &self.resolver
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the top document and every readable iframe document.
    pub fn scan(&self, page: &PageDocuments, layout: &dyn LayoutProvider) -> FormGroups {
        let mut groups = FormGroups::default();

        let top = DocumentScope {
            iframe_index: None,
            iframe_selector: None,
        };
        self.scan_document(&page.top, top, layout, &mut groups);

        for frame in &page.frames {
            let scope = DocumentScope {
                iframe_index: Some(frame.index),
                iframe_selector: Some(frame.iframe_selector.as_str()),
            };
            self.scan_document(&frame.document, scope, layout, &mut groups);
        }

        if self.config.drop_zero_positions {
            groups = groups.without_zero_positions();
        }

        info!(
            forms = groups.forms.len(),
            elements = groups.total_elements(),
            frames = page.frames.len(),
            "parse pass complete"
        );
        groups
    }

    fn scan_document(&self, doc: &Html, scope: DocumentScope<'_>, layout: &dyn LayoutProvider, groups: &mut FormGroups) {
        let root = doc.root_element();

        for (n, form) in query_all(root, "form").into_iter().enumerate() {
            let local_key = form
                .value()
                .attr("id")
                .filter(|id| !id.trim().is_empty())
                .map_or_else(|| format!("form_{n}"), str::to_string);

            let mut key = scope.key(&local_key);
            if groups.forms.contains_key(&key) {
                key = scope.key(&format!("{local_key}_{n}"));
            }

            let form_selector = match self.resolver.resolve(form, None) {
                ResolvedSelector::Unique(s) => s,
                ResolvedSelector::BestEffort(s) => {
                    warn!(form = %key, selector = %s, "form selector is not unique");
                    s
                }
                ResolvedSelector::NotFound => {
                    warn!(form = %key, "no selector for form; skipping");
                    continue;
                }
            };

            let candidates = query_all(form, &self.config.interactive_selector);
            let elements = self.collect(doc, candidates, Some((form, form_selector.as_str())), scope, layout);

            let group = FormGroup {
                name: attr_or_empty(form, "name"),
                action: attr_or_empty(form, "action"),
                method: form
                    .value()
                    .attr("method")
                    .map_or_else(|| "get".to_string(), str::to_ascii_lowercase),
                selector: Some(form_selector),
                iframe_selector: scope.iframe_selector.map(str::to_string),
                elements,
            };
            groups.forms.insert(key, group);
        }

        if !self.config.include_non_form {
            return;
        }

        let loose: Vec<ElementRef<'_>> = query_all(root, &self.config.interactive_selector)
            .into_iter()
            .filter(|el| !inside_form(*el))
            .collect();
        if loose.is_empty() {
            return;
        }

        let elements = self.collect(doc, loose, None, scope, layout);
        if elements.is_empty() {
            return;
        }

        groups.forms.insert(
            scope.key(NON_FORM_KEY),
            FormGroup {
                name: NON_FORM_KEY.to_string(),
                action: String::new(),
                method: String::new(),
                selector: None,
                iframe_selector: scope.iframe_selector.map(str::to_string),
                elements,
            },
        );
    }

    /// Resolve, classify and measure `candidates`, skipping elements that
    /// cannot be targeted.
    fn collect(
        &self,
        doc: &Html,
        candidates: Vec<ElementRef<'_>>,
        form: Option<(ElementRef<'_>, &str)>,
        scope: DocumentScope<'_>,
        layout: &dyn LayoutProvider,
    ) -> Vec<FormElement> {
        let mut elements = Vec::with_capacity(candidates.len());

        for el in candidates {
            let resolved = self.resolver.resolve(el, form.map(|(f, _)| f));
            let best_effort = resolved.is_best_effort();
            let Some(selector) = resolved.into_option() else {
                debug!(tag = el.value().name(), "no selector for element; skipping");
                continue;
            };
            if best_effort {
                warn!(selector = %selector, "element selector is best effort");
            }

            let parent_selector = form.map(|(_, s)| s.to_string());
            let position = layout.bounding_box(scope.iframe_index, parent_selector.as_deref(), &selector);

            elements.push(FormElement {
                field_type: determine_element_type(el, &selector, doc),
                tag: el.value().name().to_ascii_lowercase(),
                attributes: el
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
                position,
                iframe_index: scope.iframe_index,
                parent_selector,
                best_effort,
                selector,
            });
        }

        sort_by_position(&mut elements);
        elements
    }
}

/// Order elements top-to-bottom, and left-to-right within a visual row.
///
/// A row starts at its topmost element and takes every following element
/// within [`ROW_TOLERANCE`] of that start. The sort is stable, so elements
/// without layout keep document order.
pub fn sort_by_position(elements: &mut Vec<FormElement>) {
    elements.sort_by(|a, b| a.position.top.total_cmp(&b.position.top));

    let mut sorted = Vec::with_capacity(elements.len());
    let mut row: Vec<FormElement> = Vec::new();
    let mut row_top = f64::NEG_INFINITY;

    for el in elements.drain(..) {
        if !row.is_empty() && el.position.top - row_top > ROW_TOLERANCE {
            flush_row(&mut row, &mut sorted);
        }
        if row.is_empty() {
            row_top = el.position.top;
        }
        row.push(el);
    }
    flush_row(&mut row, &mut sorted);

    *elements = sorted;
}

fn flush_row(row: &mut Vec<FormElement>, out: &mut Vec<FormElement>) {
    row.sort_by(|a, b| a.position.left.partial_cmp(&b.position.left).unwrap_or(Ordering::Equal));
    out.append(row);
}

fn inside_form(el: ElementRef<'_>) -> bool {
    let mut current = parent_element(el);
    while let Some(node) = current {
        if node.value().name().eq_ignore_ascii_case("form") {
            return true;
        }
        current = parent_element(node);
    }
    false
}

fn attr_or_empty(el: ElementRef<'_>, name: &str) -> String {
    el.value().attr(name).unwrap_or_default().to_string()
}
