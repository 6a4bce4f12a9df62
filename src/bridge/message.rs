use serde::{Deserialize, Serialize};

use crate::form::form_model::FormGroups;

/// Messages exchanged between the page side and the tooling side, tagged
/// by an `action` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    /// A parse pass produced a new snapshot
    #[serde(rename_all = "camelCase")]
    FormElementsUpdated {
        form_elements: FormGroups,
        #[serde(default)]
        total_elements: usize,
    },

    /// Ask for the latest snapshot
    GetFormElements,

    /// Check that a stored selector still finds its element
    #[serde(rename_all = "camelCase")]
    TestSelector {
        selector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_selector: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iframe_index: Option<usize>,
    },

    /// Ask for a selector of the element under the context menu
    GetSelector,

    /// Hand over a user script
    ExecuteScript { script: String },

    /// Forget everything stored for an origin
    ClearSiteData { origin: String },
}

impl Message {
    /// Snapshot announcement for a finished parse pass.
    pub fn snapshot(groups: FormGroups) -> Self {
        let total_elements = groups.total_elements();
        Message::FormElementsUpdated {
            form_elements: groups,
            total_elements,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Message::FormElementsUpdated { .. } => "formElementsUpdated",
            Message::GetFormElements => "getFormElements",
            Message::TestSelector { .. } => "testSelector",
            Message::GetSelector => "getSelector",
            Message::ExecuteScript { .. } => "executeScript",
            Message::ClearSiteData { .. } => "clearSiteData",
        }
    }
}

/// Answer to a [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    #[serde(rename_all = "camelCase")]
    FormElements {
        form_elements: FormGroups,
        total_elements: usize,
    },

    /// `selector` is in copy-ready `document.querySelector(...)` form
    Selector { success: bool, selector: String },

    Ack {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Ack { success: true, error: None }
    }

    pub fn failed(error: impl ToString) -> Self {
        Reply::Ack {
            success: false,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Reply::FormElements { .. } => true,
            Reply::Selector { success, .. } | Reply::Ack { success, .. } => *success,
        }
    }
}
