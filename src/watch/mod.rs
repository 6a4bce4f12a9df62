pub mod debounce;
pub mod wait;

use serde::{Deserialize, Serialize};

pub use debounce::Debouncer;
pub use wait::{WaitOutcome, wait_for};

/// Timing of the `watch` loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Changes closer together than this are parsed once
    pub quiet_ms: u64,

    /// How often the watched file is checked for changes
    pub poll_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { quiet_ms: 500, poll_ms: 200 }
    }
}
