use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FormscoutError, Result};
use crate::form::form_model::{FieldType, FormElement};

/// One step of a curated automation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskNode {
    pub selector: String,

    /// Selector of the owning form, prefixed to `selector` when waiting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_selector: Option<String>,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Scroll the element into view before acting
    #[serde(default)]
    pub scroll: bool,

    /// Wait for the element to appear instead of assuming it is present
    #[serde(default)]
    pub wait_for_element: bool,
}

impl TaskNode {
    pub fn new(selector: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            selector: selector.into(),
            parent_selector: None,
            field_type,
            scroll: false,
            wait_for_element: false,
        }
    }

    /// A node targeting a scanned element, keeping its form scope.
    pub fn from_element(el: &FormElement) -> Self {
        Self {
            selector: el.selector.clone(),
            parent_selector: el.parent_selector.clone(),
            field_type: el.field_type.clone(),
            scroll: false,
            wait_for_element: false,
        }
    }
}

/// A complete automation task: the input of code generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    pub url: String,

    /// Ordered steps
    #[serde(default)]
    pub node: Vec<TaskNode>,

    #[serde(default)]
    pub form_selector: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_selector: Option<String>,

    /// Text expected inside the success element (case-insensitive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe_selector: Option<String>,
}

impl TaskConfig {
    /// Load a task config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FormscoutError::io(format!("reading task {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| FormscoutError::json(format!("parsing task {}", path.display()), e))
    }

    /// Success selector, treating an empty string as unset.
    pub fn success_selector(&self) -> Option<&str> {
        non_empty(&self.success_selector)
    }

    pub fn success_text(&self) -> Option<&str> {
        non_empty(&self.success_text)
    }

    pub fn iframe_selector(&self) -> Option<&str> {
        non_empty(&self.iframe_selector)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
