use serde::{Deserialize, Serialize};

use crate::form::form_model::FieldType;

/// One recorded user interaction. Records are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickRecord {
    #[serde(flatten)]
    pub event: RecordedEvent,

    /// Page the interaction happened on
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RecordedEvent {
    Click(ClickDetails),

    #[serde(rename_all = "camelCase")]
    Scroll { scroll_top: f64, scroll_left: f64 },
}

/// What was clicked, captured at click time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickDetails {
    /// Selector scoped to the owning form when there is one
    pub selector: String,
    pub text: String,
    pub tag_name: String,
    pub class_name: String,
    pub id: String,
    pub element_type: FieldType,
    pub label: String,
    pub form_selector: Option<String>,
}

impl ClickRecord {
    pub fn is_click(&self) -> bool {
        matches!(self.event, RecordedEvent::Click(_))
    }

    pub fn click(&self) -> Option<&ClickDetails> {
        match &self.event {
            RecordedEvent::Click(details) => Some(details),
            RecordedEvent::Scroll { .. } => None,
        }
    }
}

/// Interaction to replay through a [`Recorder`](crate::record::recorder::Recorder)
/// when recording offline against a saved page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Interaction {
    Click { selector: String },
    Scroll { top: f64, left: f64 },
}
