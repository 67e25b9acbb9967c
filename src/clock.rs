//! # Session Clock
//!
//! A virtual-time timer queue with explicit schedule and cancel.
//!
//! Time is a [`Duration`] since the queue was created. Nothing here reads the wall
//! clock: tests move time by hand with [`TimerQueue::advance_to`], and the CLI host
//! feeds in the real elapsed time and sleeps until [`TimerQueue::next_deadline`].
//!
//! Timers with the same deadline fire in the order they were scheduled. A cancelled
//! timer is removed from the queue and can never fire.

use std::collections::BTreeMap;
use std::time::Duration;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Move on to a new note
    Advance,
    /// Show the label of the current note
    Reveal,
}

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub timer: Timer,
    pub deadline: Duration,
}

/// Delayed tasks on a single logical clock
pub trait Scheduler {
    fn now(&self) -> Duration;

    /// Schedule `timer` to fire `delay` after [`Scheduler::now`]
    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerId;

    /// Returns false if the timer already fired or was cancelled
    fn cancel(&mut self, id: TimerId) -> bool;
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    // Keyed by (deadline, id); ids grow monotonically so ties keep scheduling order
    pending: BTreeMap<(Duration, TimerId), Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.keys().any(|(_, pending)| *pending == id)
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest timer due at or before `until`
    ///
    /// The clock moves to that timer's deadline, so anything scheduled while handling
    /// it is measured from the moment it fired rather than from `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired> {
        let (&(deadline, id), _) = self.pending.iter().next()?;
        if deadline > until {
            return None;
        }
        let timer = self.pending.remove(&(deadline, id))?;
        if deadline > self.now {
            self.now = deadline;
        }
        Some(Fired {
            id,
            timer,
            deadline,
        })
    }

    /// Move the clock forward; never moves backwards
    pub fn advance_to(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now + delay, id), timer);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, pending)| *pending == id).copied();
        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }
}
