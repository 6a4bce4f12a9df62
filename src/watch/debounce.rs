use std::time::{Duration, Instant};

/// Collapses bursts of change notifications into one pending pass.
///
/// Every [`schedule`](Debouncer::schedule) moves the single deadline to
/// `now + quiet`; [`poll`](Debouncer::poll) fires once the deadline has
/// passed. At most one pass is ever pending.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, deadline: None }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Schedule a pass, resetting any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per burst, when the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending pass fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}
