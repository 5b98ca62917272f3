//! Next-frame tick requests, keyed by morph generation.
//!
//! A running morph asks for one tick per frame. Superseding a morph withdraws
//! its queued request; a request that was already handed out for the current
//! frame is caught later by the engine's generation check instead.

use std::fmt;

/// Generation token identifying one morph. Strictly increasing per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MorphId(u64);

impl MorphId {
    /// The first id an engine hands out.
    pub const FIRST: MorphId = MorphId(1);

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MorphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Queue of morphs that asked to be ticked on the next frame.
#[derive(Debug, Default)]
pub struct TickScheduler {
    queued: Vec<MorphId>,
}

impl TickScheduler {
    /// Empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `id` to be ticked next frame. Duplicate requests collapse.
    pub fn request(&mut self, id: MorphId) {
        if !self.queued.contains(&id) {
            self.queued.push(id);
        }
    }

    /// Withdraw a queued request. Returns `false` if none was queued (for
    /// example because it was already handed out this frame).
    pub fn cancel(&mut self, id: MorphId) -> bool {
        let before = self.queued.len();
        self.queued.retain(|queued| *queued != id);
        self.queued.len() != before
    }

    /// Withdraw every queued request.
    pub fn clear(&mut self) {
        self.queued.clear();
    }

    /// Hand out this frame's requests in request order, emptying the queue.
    pub fn take_due(&mut self) -> Vec<MorphId> {
        std::mem::take(&mut self.queued)
    }

    /// Whether `id` is waiting for a tick.
    #[must_use]
    pub fn is_queued(&self, id: MorphId) -> bool {
        self.queued.contains(&id)
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let a = MorphId::FIRST;
        let b = a.next();
        assert!(b > a);
        assert_eq!(b.to_string(), "2");
    }

    #[test]
    fn request_cancel_and_take() {
        let mut scheduler = TickScheduler::new();
        let a = MorphId::FIRST;
        let b = a.next();
        scheduler.request(a);
        scheduler.request(a);
        scheduler.request(b);
        assert!(scheduler.cancel(a));
        assert!(!scheduler.cancel(a));
        assert!(!scheduler.is_queued(a));
        assert_eq!(scheduler.take_due(), vec![b]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancel_after_take_reports_in_flight() {
        let mut scheduler = TickScheduler::new();
        let a = MorphId::FIRST;
        scheduler.request(a);
        let due = scheduler.take_due();
        assert_eq!(due, vec![a]);
        assert!(!scheduler.cancel(a));
    }
}
