//! `EventQueue` — the simulation clock plus its time-ordered pending events.
//!
//! # Why a `BTreeMap`
//!
//! Holds and resource waits get cancelled when a task is reassigned
//! mid-flight.  A binary heap would need lazy tombstones for that; keying a
//! `BTreeMap` on `(time, seq)` gives O(log n) insert, pop-first and removal
//! by key, and a cancelled event simply stops existing.

use std::collections::BTreeMap;

use ep_core::SimTime;
use tracing::trace;

use crate::{ScheduleError, ScheduleResult};

/// Position of an event in the total order.  Returned by the scheduling
/// methods and used to cancel.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct EventKey {
    pub time: SimTime,
    pub seq:  u64,
}

/// An event removed from the queue by [`EventQueue::pop_next`].
#[derive(Clone, Debug, PartialEq)]
pub struct Event<P> {
    pub key:     EventKey,
    pub payload: P,
}

impl<P> Event<P> {
    #[inline]
    pub fn time(&self) -> SimTime {
        self.key.time
    }
}

/// Simulated clock and pending wake-ups carrying a payload `P`.
pub struct EventQueue<P> {
    inner:    BTreeMap<EventKey, P>,
    now:      SimTime,
    next_seq: u64,
}

impl<P> Default for EventQueue<P> {
    fn default() -> Self {
        Self {
            inner:    BTreeMap::new(),
            now:      SimTime::ZERO,
            next_seq: 0,
        }
    }
}

impl<P> EventQueue<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Register `payload` to fire at `time`.
    ///
    /// Fails with [`ScheduleError::InvalidTime`] if `time` lies before the
    /// clock or is not finite.  Scheduling at exactly `now` is allowed; the
    /// event runs after everything already queued for `now`.
    pub fn schedule_at(&mut self, time: SimTime, payload: P) -> ScheduleResult<EventKey> {
        if !time.0.is_finite() || time < self.now {
            return Err(ScheduleError::InvalidTime { requested: time.0, now: self.now });
        }
        let key = EventKey { time, seq: self.next_seq };
        self.next_seq += 1;
        trace!(now = %self.now, at = %time, seq = key.seq, "schedule");
        self.inner.insert(key, payload);
        Ok(key)
    }

    /// Register `payload` to fire `delay` time units from now.
    pub fn schedule_in(&mut self, delay: f64, payload: P) -> ScheduleResult<EventKey> {
        self.schedule_at(self.now + delay, payload)
    }

    /// Remove a pending event.  Returns `None` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, key: EventKey) -> Option<P> {
        self.inner.remove(&key)
    }

    pub fn contains(&self, key: EventKey) -> bool {
        self.inner.contains_key(&key)
    }

    /// Time of the earliest pending event, or `None` if the queue is empty.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.inner.keys().next().map(|k| k.time)
    }

    /// Remove the earliest event and advance the clock to its time.
    pub fn pop_next(&mut self) -> Option<Event<P>> {
        let (key, payload) = self.inner.pop_first()?;
        self.now = key.time;
        Some(Event { key, payload })
    }

    /// Move the clock forward without firing anything, e.g. to the horizon
    /// once the run loop stops.  Never moves past a pending event.
    pub fn advance_to(&mut self, time: SimTime) -> ScheduleResult<()> {
        let limit = self.peek_time();
        if time < self.now || limit.is_some_and(|next| time > next) {
            return Err(ScheduleError::InvalidTime { requested: time.0, now: self.now });
        }
        self.now = time;
        Ok(())
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Pending events in firing order.
    pub fn iter(&self) -> impl Iterator<Item = (&EventKey, &P)> {
        self.inner.iter()
    }
}
