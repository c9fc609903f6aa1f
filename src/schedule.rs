use std::time::{Duration, Instant};

/// One-shot cancelable deadline.
///
/// Owned by the game controller and polled with an explicit `Instant`, so
/// tests can advance time without sleeping. Firing disarms the deadline;
/// canceling an unarmed or already-fired deadline is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    due: Option<Instant>,
}

impl Deadline {
    pub fn arm(&mut self, at: Instant) {
        self.due = Some(at);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Fire if `now` has reached the deadline. At most one fire per arm.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(at) if now >= at => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// Repeating cancelable schedule with a fixed period.
///
/// Re-arms one period after the previous deadline rather than after `now`,
/// so a late poll catches up beat by beat instead of dropping beats.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: Duration,
    due: Option<Instant>,
}

impl Interval {
    pub fn every(period: Duration) -> Self {
        Self { period, due: None }
    }

    /// Arm the first beat one period from `now`.
    pub fn start(&mut self, now: Instant) {
        self.due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(at) if now >= at => {
                self.due = Some(at + self.period);
                true
            }
            _ => false,
        }
    }
}
