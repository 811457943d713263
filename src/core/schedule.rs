//! # Deferred Work
//!
//! A tiny timer queue. The app never sleeps or spawns: work that should
//! happen "a bit later" (settle a transition, open the order form after the
//! selection flash, finish a submission, drop a toast) is queued here with a
//! due instant and drained by `Action::Tick`.
//!
//! Time is always passed in, so tests drive the clock by hand.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry<T> {
    /// Scheduling order; breaks ties between equal due instants.
    seq: u64,
    due: Instant,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            entries: Vec::new(),
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            seq,
            due: now + delay,
            task,
        });
    }

    /// Drops every pending task matching `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        self.entries.retain(|e| !pred(&e.task));
    }

    /// Removes and returns every task due at `now`, earliest first. Ties keep
    /// scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<Entry<T>>, Vec<Entry<T>>) =
            self.entries.drain(..).partition(|e| e.due <= now);
        self.entries = pending;
        due.sort_by_key(|e| (e.due, e.seq));
        due.into_iter().map(|e| e.task).collect()
    }

    /// The earliest due instant, if anything is pending. The event loop
    /// sleeps no longer than this.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_take_due_in_order() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(t0, 300 * MS, "late");
        s.schedule(t0, 100 * MS, "early");
        s.schedule(t0, 100 * MS, "early-second");

        assert!(s.take_due(t0 + 50 * MS).is_empty());
        assert_eq!(s.take_due(t0 + 100 * MS), vec!["early", "early-second"]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_due(), Some(t0 + 300 * MS));
        assert_eq!(s.take_due(t0 + 1000 * MS), vec!["late"]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_next_due_tracks_earliest() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        assert_eq!(s.next_due(), None);
        s.schedule(t0, 200 * MS, 'b');
        s.schedule(t0, 50 * MS, 'a');
        assert_eq!(s.next_due(), Some(t0 + 50 * MS));
        s.cancel_where(|c| *c == 'a');
        assert_eq!(s.next_due(), Some(t0 + 200 * MS));
    }

    #[test]
    fn test_cancel_where() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        for n in 0..6 {
            s.schedule(t0, MS, n);
        }
        s.cancel_where(|n| n % 2 == 0);
        assert_eq!(s.take_due(t0 + MS), vec![1, 3, 5]);
    }
}
