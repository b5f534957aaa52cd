use std::time::{Duration, Instant};

/// Hold timer over the classified letter: a gesture is only reported stable
/// once the same letter has persisted longer than the configured hold. Any
/// letter change restarts the clock; hand loss resets the tracker entirely.
#[derive(Debug)]
pub struct StabilityTracker {
    hold: Duration,
    last_letter: Option<&'static str>,
    hold_start: Option<Instant>,
}

impl StabilityTracker {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            last_letter: None,
            hold_start: None,
        }
    }

    /// Observes the letter classified this frame and reports whether it has
    /// been held long enough to count as stable.
    pub fn observe(&mut self, letter: &'static str, now: Instant) -> bool {
        if self.last_letter != Some(letter) {
            self.last_letter = Some(letter);
            self.hold_start = Some(now);
        }
        match self.hold_start {
            Some(start) => now.duration_since(start) > self.hold,
            None => false,
        }
    }

    /// Called when the hand leaves the frame.
    pub fn reset(&mut self) {
        self.last_letter = None;
        self.hold_start = None;
    }

    #[cfg(test)]
    pub(crate) fn is_tracking(&self) -> bool {
        self.last_letter.is_some()
    }
}
