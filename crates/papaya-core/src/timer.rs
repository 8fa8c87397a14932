//! Single-shot deferred timers.
//!
//! Nothing here sleeps: the host polls [`TimerQueue::take_due`] with the
//! current time, usually once per frame.

use crate::Instant;
use crate::widget::WidgetId;

/// Handle of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    id: TimerId,
    owner: WidgetId,
    deadline: Instant,
}

/// Pending single-shot timers, each owned by a widget.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer for `owner` firing at `deadline`.
    pub fn schedule(&mut self, owner: WidgetId, deadline: Instant) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            owner,
            deadline,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Cancel every timer of a widget.
    pub fn cancel_owner(&mut self, owner: WidgetId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner);
        before - self.timers.len()
    }

    /// Remove and return the timers due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerId, WidgetId)> {
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.deadline <= now);
        self.timers = pending;
        due.sort_by_key(|t| (t.deadline, t.id));
        due.into_iter().map(|t| (t.id, t.owner)).collect()
    }

    /// Earliest pending deadline, for hosts that want to sleep until then.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Duration;
    use uuid::Uuid;

    #[test]
    fn test_fires_only_when_due() {
        let mut timers = TimerQueue::new();
        let owner = Uuid::new_v4();
        let start = Instant::now();
        let id = timers.schedule(owner, start + Duration::from_millis(100));

        assert!(timers.take_due(start + Duration::from_millis(50)).is_empty());
        assert_eq!(timers.len(), 1);
        assert_eq!(
            timers.take_due(start + Duration::from_millis(100)),
            vec![(id, owner)]
        );
        assert!(timers.is_empty());
    }

    #[test]
    fn test_due_in_deadline_order() {
        let mut timers = TimerQueue::new();
        let start = Instant::now();
        let late = timers.schedule(Uuid::new_v4(), start + Duration::from_millis(20));
        let early = timers.schedule(Uuid::new_v4(), start + Duration::from_millis(10));
        let fired: Vec<TimerId> = timers
            .take_due(start + Duration::from_millis(30))
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(fired, vec![early, late]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let start = Instant::now();
        let id = timers.schedule(Uuid::new_v4(), start);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.take_due(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_cancel_owner() {
        let mut timers = TimerQueue::new();
        let owner = Uuid::new_v4();
        let start = Instant::now();
        timers.schedule(owner, start);
        timers.schedule(owner, start);
        let other = timers.schedule(Uuid::new_v4(), start + Duration::from_millis(5));
        assert_eq!(timers.cancel_owner(owner), 2);
        assert_eq!(timers.next_deadline(), Some(start + Duration::from_millis(5)));
        assert!(timers.cancel(other));
    }
}
