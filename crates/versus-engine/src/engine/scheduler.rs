use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use super::player::Player;

/// What a timer is for, and whom it belongs to.
///
/// At most one timer per key is pending at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKey {
    /// Gravity tick of one board.
    Fall(Player),
    /// One step of the AI towards its planned placement.
    AiMove,
    /// End of a board's slowdown.
    SlowdownExpiry(Player),
    /// Switch to the alternate palette.
    PaletteStart,
    /// Switch back to the primary palette.
    PaletteEnd,
}

impl TimerKey {
    /// Effect timers keep their remaining delay across a pause; ticks restart fresh.
    #[must_use]
    pub const fn is_effect(self) -> bool {
        matches!(
            self,
            Self::SlowdownExpiry(_) | Self::PaletteStart | Self::PaletteEnd
        )
    }
}

/// Handle to one scheduled timer.
///
/// A handle stays valid until its timer fires or is cancelled; rescheduling
/// the same key produces a new handle and invalidates the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
    key: TimerKey,
    deadline: Duration,
}

impl TimerHandle {
    #[must_use]
    pub const fn key(&self) -> TimerKey {
        self.key
    }

    /// Time since the start of the duel at which the timer is due.
    #[must_use]
    pub const fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Deterministic discrete-event timer queue.
///
/// Time is virtual: it only moves when the owner claims a due timer or calls
/// [`Self::advance_to`].
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), TimerKey>,
    pending: HashMap<TimerKey, TimerHandle>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `key` to fire after `delay`, replacing any pending timer with the same key.
    pub fn schedule(&mut self, key: TimerKey, delay: Duration) -> TimerHandle {
        self.cancel(key);
        let handle = TimerHandle {
            id: self.next_id,
            key,
            deadline: self.now + delay,
        };
        self.next_id += 1;
        self.queue.insert((handle.deadline, handle.id), key);
        self.pending.insert(key, handle);
        handle
    }

    /// Cancels the pending timer for `key`, if any.
    pub fn cancel(&mut self, key: TimerKey) -> Option<TimerHandle> {
        let handle = self.pending.remove(&key)?;
        self.queue.remove(&(handle.deadline, handle.id));
        Some(handle)
    }

    /// Cancels every pending timer and returns each key with its remaining delay.
    pub fn cancel_all(&mut self) -> Vec<(TimerKey, Duration)> {
        let now = self.now;
        let mut remaining: Vec<_> = self
            .pending
            .drain()
            .map(|(key, handle)| (key, handle.deadline.saturating_sub(now)))
            .collect();
        remaining.sort();
        self.queue.clear();
        remaining
    }

    #[must_use]
    pub fn handle(&self, key: TimerKey) -> Option<TimerHandle> {
        self.pending.get(&key).copied()
    }

    #[must_use]
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.contains_key(&key)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Removes and returns the earliest timer due at or before `until`,
    /// moving the clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let (&(deadline, id), &key) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }
        self.queue.remove(&(deadline, id));
        let handle = self.pending.remove(&key)?;
        self.now = self.now.max(deadline);
        Some(handle)
    }

    /// Consumes a timer by handle. Returns `false` for a stale handle
    /// (already fired, cancelled or replaced).
    pub fn claim(&mut self, handle: TimerHandle) -> bool {
        if self.pending.get(&handle.key).is_none_or(|h| h.id != handle.id) {
            return false;
        }
        self.cancel(handle.key);
        self.now = self.now.max(handle.deadline);
        true
    }

    /// Moves the clock forward. The clock never goes backwards.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_pop_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKey::Fall(Player::Human), 400 * MS);
        scheduler.schedule(TimerKey::AiMove, 100 * MS);
        scheduler.schedule(TimerKey::Fall(Player::Ai), 400 * MS);

        assert_eq!(scheduler.next_deadline(), Some(100 * MS));
        let until = 1000 * MS;
        let keys: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(until))
            .map(|h| h.key())
            .collect();
        assert_eq!(
            keys,
            [
                TimerKey::AiMove,
                TimerKey::Fall(Player::Human),
                TimerKey::Fall(Player::Ai)
            ]
        );
        assert_eq!(scheduler.now(), 400 * MS);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_pop_respects_until() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKey::PaletteStart, 500 * MS);
        assert!(scheduler.pop_due(499 * MS).is_none());
        assert!(scheduler.pop_due(500 * MS).is_some());
    }

    #[test]
    fn test_schedule_replaces_same_key() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(TimerKey::Fall(Player::Human), 400 * MS);
        let second = scheduler.schedule(TimerKey::Fall(Player::Human), 500 * MS);
        assert_eq!(scheduler.pending_count(), 1);
        assert!(!scheduler.claim(first));
        assert!(scheduler.claim(second));
        assert!(!scheduler.claim(second));
        assert_eq!(scheduler.now(), 500 * MS);
    }

    #[test]
    fn test_cancel_all_reports_remaining() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKey::SlowdownExpiry(Player::Ai), 10_000 * MS);
        scheduler.schedule(TimerKey::PaletteStart, 120_000 * MS);
        scheduler.advance_to(4_000 * MS);

        let remaining = scheduler.cancel_all();
        assert_eq!(
            remaining,
            [
                (TimerKey::SlowdownExpiry(Player::Ai), 6_000 * MS),
                (TimerKey::PaletteStart, 116_000 * MS),
            ]
        );
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_clock_never_goes_back() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(100 * MS);
        scheduler.advance_to(50 * MS);
        assert_eq!(scheduler.now(), 100 * MS);
    }

    #[test]
    fn test_effect_keys() {
        assert!(TimerKey::PaletteEnd.is_effect());
        assert!(TimerKey::SlowdownExpiry(Player::Human).is_effect());
        assert!(!TimerKey::Fall(Player::Human).is_effect());
        assert!(!TimerKey::AiMove.is_effect());
    }
}
