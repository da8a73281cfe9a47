use std::time::{Duration, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(150);

/// A single cancellable deadline. Scheduling again replaces the pending one,
/// so at most one action is ever outstanding.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending deadline if it has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if d <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending deadline regardless of time.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
