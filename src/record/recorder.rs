use scraper::{ElementRef, Html};
use tracing::debug;

use crate::form::classifier::determine_element_type;
use crate::form::label::label_for;
use crate::record::record_model::{ClickDetails, ClickRecord, RecordedEvent};
use crate::selector::SelectorResolver;
use crate::selector::query::parent_element;

/// Text longer than this is cut when it comes from a non-button element.
const MAX_TEXT_LEN: usize = 50;

// ============================================================================
// Click/scroll recorder
// ============================================================================

/// Turns clicks and scroll positions into [`ClickRecord`]s.
///
/// Scrolls are collapsed: one record per scroll sequence between clicks,
/// and only when the position actually moved.
#[derive(Debug)]
pub struct Recorder {
    resolver: SelectorResolver,
    url: String,
    records: Vec<ClickRecord>,
    recording: bool,
    last_scroll: (f64, f64),
    scrolled_since_click: bool,
}

impl Recorder {
    pub fn new(resolver: SelectorResolver, url: impl Into<String>) -> Self {
        Self {
            resolver,
            url: url.into(),
            records: Vec::new(),
            recording: false,
            last_scroll: (0.0, 0.0),
            scrolled_since_click: false,
        }
    }

    /// Begin recording from the given scroll position. No-op when already
    /// recording.
    pub fn start(&mut self, scroll_top: f64, scroll_left: f64) {
        if self.recording {
            return;
        }
        self.recording = true;
        self.last_scroll = (scroll_top, scroll_left);
        self.scrolled_since_click = false;
    }

    pub fn stop(&mut self) {
        self.recording = false;
        self.last_scroll = (0.0, 0.0);
        self.scrolled_since_click = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn records(&self) -> &[ClickRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ClickRecord> {
        self.records
    }

    /// Record a click on `target`, which must belong to `doc`.
    pub fn record_click(&mut self, target: ElementRef<'_>, doc: &Html) -> Option<&ClickRecord> {
        if !self.recording {
            return None;
        }

        let form = find_parent_form(target);
        let form_selector = form
            .map(|f| self.resolver.resolve(f, None))
            .and_then(|r| r.into_option());
        let selector = self.resolver.resolve(target, form).into_option().unwrap_or_default();

        let el = target.value();
        let details = ClickDetails {
            text: click_text(target),
            tag_name: el.name().to_ascii_lowercase(),
            class_name: el.attr("class").unwrap_or_default().to_string(),
            id: el.id().unwrap_or_default().to_string(),
            element_type: determine_element_type(target, &selector, doc),
            label: label_for(target, doc),
            form_selector,
            selector,
        };
        debug!(selector = %details.selector, "click recorded");

        self.scrolled_since_click = false;
        self.push(RecordedEvent::Click(details))
    }

    /// Record a settled scroll position.
    pub fn record_scroll(&mut self, scroll_top: f64, scroll_left: f64) -> Option<&ClickRecord> {
        if !self.recording || self.scrolled_since_click || (scroll_top, scroll_left) == self.last_scroll {
            return None;
        }

        self.last_scroll = (scroll_top, scroll_left);
        self.scrolled_since_click = true;
        self.push(RecordedEvent::Scroll { scroll_top, scroll_left })
    }

    fn push(&mut self, event: RecordedEvent) -> Option<&ClickRecord> {
        self.records.push(ClickRecord {
            event,
            url: self.url.clone(),
        });
        self.records.last()
    }
}

/// Nearest `<form>` ancestor of `el` (or `el` itself).
pub fn find_parent_form(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut current = Some(el);
    while let Some(node) = current {
        if node.value().name().eq_ignore_ascii_case("form") {
            return Some(node);
        }
        current = parent_element(node);
    }
    None
}

/// Visible text of a clicked element. Links and buttons give their text,
/// button-like inputs their value or placeholder, other inputs nothing, and
/// anything else its text cut to 50 characters.
pub fn click_text(el: ElementRef<'_>) -> String {
    let tag = el.value().name().to_ascii_lowercase();
    let text = || el.text().collect::<String>().trim().to_string();

    match tag.as_str() {
        "a" | "button" => text(),
        "input" => {
            let input_type = el.value().attr("type").unwrap_or_default().to_ascii_lowercase();
            if input_type == "button" || input_type == "submit" {
                el.value()
                    .attr("value")
                    .filter(|v| !v.is_empty())
                    .or_else(|| el.value().attr("placeholder"))
                    .unwrap_or_default()
                    .to_string()
            } else {
                String::new()
            }
        }
        _ => {
            let full = text();
            if full.chars().count() > MAX_TEXT_LEN {
                let cut: String = full.chars().take(MAX_TEXT_LEN).collect();
                format!("{cut}...")
            } else {
                full
            }
        }
    }
}
