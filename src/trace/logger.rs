use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;

use crate::trace::event::ParseEvent;

/// Appends [`ParseEvent`]s to a JSONL file. Failures are logged and never
/// interrupt the watch loop.
pub struct TraceLogger {
    file: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: &Path) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open trace file; tracing disabled");
                Self { file: None }
            }
        }
    }

    /// A logger that drops every event.
    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&self, event: &ParseEvent) {
        let Some(file_mutex) = &self.file else {
            return;
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "failed to serialize parse event");
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "trace logger lock poisoned");
                return;
            }
        };

        if let Err(e) = writeln!(file, "{json}") {
            warn!(error = %e, "failed to write parse event");
        }
    }
}
