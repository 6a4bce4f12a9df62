use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// What started a parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseTrigger {
    InitialLoad,
    Change,
}

/// One line of the parse-pass trace log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseEvent {
    pub timestamp_ms: u128,
    pub pass: u64,
    pub trigger: ParseTrigger,

    pub forms: usize,
    pub elements: usize,

    /// SHA-1 of the serialized snapshot
    pub fingerprint: String,

    /// Snapshot differs from the previous pass
    pub changed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseEvent {
    pub fn now(pass: u64, trigger: ParseTrigger) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            pass,
            trigger,
            forms: 0,
            elements: 0,
            fingerprint: String::new(),
            changed: false,
            error: None,
        }
    }

    pub fn with_counts(mut self, forms: usize, elements: usize) -> Self {
        self.forms = forms;
        self.elements = elements;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>, changed: bool) -> Self {
        self.fingerprint = fingerprint.into();
        self.changed = changed;
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
