use std::thread;
use std::time::{Duration, Instant};

/// Result of a bounded wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    Found(T),
    TimedOut,
}

impl<T> WaitOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, WaitOutcome::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            WaitOutcome::Found(v) => Some(v),
            WaitOutcome::TimedOut => None,
        }
    }
}

/// Poll `probe` every `interval` until it yields a value or `timeout`
/// elapses. The probe runs at least once, so a zero timeout is a single
/// check.
pub fn wait_for<T>(timeout: Duration, interval: Duration, mut probe: impl FnMut() -> Option<T>) -> WaitOutcome<T> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(value) = probe() {
            return WaitOutcome::Found(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return WaitOutcome::TimedOut;
        }
        thread::sleep(interval.min(deadline - now));
    }
}
