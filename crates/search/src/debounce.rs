// crates/search/src/debounce.rs
//! Input coalescing: a search pass runs only after input has been quiet for
//! the debounce delay.

use std::time::Duration;
use tokio::time::Instant;

/// Quiet period before a pass runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest raw input until its deadline passes.
///
/// Each new input replaces the pending one and pushes the deadline out, so a
/// burst of keystrokes produces a single pass with the final text.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, input: impl Into<String>, now: Instant) {
        self.pending = Some((input.into(), now + self.delay));
    }

    /// When the pending input becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Take the pending input once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match self.deadline() {
            Some(at) if now >= at => self.pending.take().map(|(input, _)| input),
            _ => None,
        }
    }

    /// Drop pending input (an explicit submit or clear supersedes it).
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
