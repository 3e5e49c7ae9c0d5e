//! Clock abstraction and a cancellable one-shot timer queue.
//!
//! Nothing here sleeps or spawns. The owner asks the queue which timers are
//! due at a given instant and reacts to them, so the same session logic runs
//! against the wall clock in the TUI and against a [`ManualClock`] in tests.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Milliseconds since an arbitrary, clock-specific origin
pub type Millis = u64;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Monotonic wall clock anchored at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Test clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Pending one-shot timers ordered by deadline, then by scheduling order
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: BTreeMap<(Millis, TimerId), T>,
    deadlines: HashMap<TimerId, Millis>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn schedule_at(&mut self, deadline: Millis, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    pub fn schedule(&mut self, now: Millis, delay_ms: Millis, payload: T) -> TimerId {
        self.schedule_at(now.saturating_add(delay_ms), payload)
    }

    /// Remove a pending timer. Returns its payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.pending.remove(&(deadline, id))
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }

    /// Pop the earliest timer whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerId, Millis, T)> {
        let (&(deadline, id), _) = self.pending.iter().next()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        self.pending
            .remove(&(deadline, id))
            .map(|payload| (id, deadline, payload))
    }

    pub fn deadline(&self, id: TimerId) -> Option<Millis> {
        self.deadlines.get(&id).copied()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.keys().next().map(|&(deadline, _)| deadline)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
