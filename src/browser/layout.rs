use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FormscoutError, Result};
use crate::form::form_model::Position;

// ============================================================================
// Bounding boxes
// ============================================================================

/// Supplies rendered bounding boxes. A parsed HTML snapshot has no layout,
/// so boxes come from whoever rendered the page.
///
/// Elements are addressed the same way a [`FormElement`] addresses them:
/// iframe index, owning form selector, and the form-scoped selector.
///
/// [`FormElement`]: crate::form::form_model::FormElement
pub trait LayoutProvider {
    fn bounding_box(&self, iframe_index: Option<usize>, parent_selector: Option<&str>, selector: &str) -> Position;
}

/// Every element gets a zero box; ordering then falls back to document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLayout;

impl LayoutProvider for NoLayout {
    fn bounding_box(&self, _iframe_index: Option<usize>, _parent_selector: Option<&str>, _selector: &str) -> Position {
        Position::default()
    }
}

/// One measured element, as exported by a browser-side measurement pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub selector: String,
    #[serde(default)]
    pub iframe_index: Option<usize>,
    #[serde(default)]
    pub parent_selector: Option<String>,
    pub position: Position,
}

type LayoutKey = (Option<usize>, Option<String>, String);

/// Boxes looked up by `(iframe index, parent selector, selector)`.
#[derive(Debug, Clone, Default)]
pub struct SelectorLayout {
    boxes: HashMap<LayoutKey, Position>,
}

impl SelectorLayout {
    pub fn from_entries(entries: impl IntoIterator<Item = LayoutEntry>) -> Self {
        let boxes = entries
            .into_iter()
            .map(|e| ((e.iframe_index, e.parent_selector, e.selector), e.position))
            .collect();
        Self { boxes }
    }

    /// Load a JSON array of [`LayoutEntry`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FormscoutError::io(format!("reading layout {}", path.display()), e))?;
        let entries: Vec<LayoutEntry> = serde_json::from_str(&content)
            .map_err(|e| FormscoutError::json(format!("parsing layout {}", path.display()), e))?;
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl LayoutProvider for SelectorLayout {
    fn bounding_box(&self, iframe_index: Option<usize>, parent_selector: Option<&str>, selector: &str) -> Position {
        let key = (iframe_index, parent_selector.map(str::to_string), selector.to_string());
        self.boxes
            .get(&key)
            .copied()
            .unwrap_or_default()
    }
}
