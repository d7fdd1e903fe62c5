// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_debounce --heading-base-level=0

//! Understory Debounce: host-agnostic cancel-and-reschedule debouncing.
//!
//! [`Debouncer`] keeps at most one pending payload per key. Scheduling a key
//! that is already pending replaces the payload and pushes the deadline out,
//! so a burst of events collapses to a single trailing invocation fired
//! `delay` milliseconds after the last event of the burst.
//!
//! The crate does not read a clock and never runs anything itself. Hosts pass
//! the current time (milliseconds on any monotonic clock) to
//! [`Debouncer::schedule`] and drain due payloads with [`Debouncer::take_due`].
//! Draining hands the payloads back instead of invoking them so callers can
//! release any borrow on the queue first; a payload that is a callback may
//! well want to schedule itself again.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_debounce::Debouncer;
//!
//! let mut queue = Debouncer::new();
//!
//! // Three scroll events inside one window.
//! queue.schedule("scroll", 0, 16, 'a');
//! queue.schedule("scroll", 5, 16, 'b');
//! queue.schedule("scroll", 9, 16, 'c');
//! assert_eq!(queue.len(), 1);
//!
//! // Nothing is due until 16ms after the last call.
//! assert!(queue.take_due(20).is_empty());
//! assert_eq!(queue.take_due(25), vec![("scroll", 'c')]);
//! assert!(queue.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

#[derive(Clone, Debug)]
struct Pending<T> {
    deadline: u64,
    seq: u64,
    payload: T,
}

/// Per-key debouncing queue.
///
/// Each key holds at most one pending payload. See the [crate docs](crate) for
/// the scheduling model.
#[derive(Clone, Debug)]
pub struct Debouncer<K, T> {
    pending: HashMap<K, Pending<T>>,
    next_seq: u64,
}

impl<K, T> Default for Debouncer<K, T> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Eq + Hash, T> Debouncer<K, T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` under `key`, due at `now + delay`.
    ///
    /// A payload already pending under `key` is dropped and replaced; its
    /// deadline does not survive. Returns `true` if a pending payload was
    /// replaced.
    pub fn schedule(&mut self, key: K, now: u64, delay: u64, payload: T) -> bool {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending
            .insert(
                key,
                Pending {
                    deadline: now.saturating_add(delay),
                    seq,
                    payload,
                },
            )
            .is_some()
    }

    /// Drops the payload pending under `key`, if any.
    ///
    /// Returns `true` if something was cancelled.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Returns `true` if a payload is pending under `key`.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Returns the deadline of the payload pending under `key`.
    #[must_use]
    pub fn deadline(&self, key: &K) -> Option<u64> {
        self.pending.get(key).map(|p| p.deadline)
    }

    /// Number of pending keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline across all pending keys.
    ///
    /// Hosts use this to arm a single platform timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Removes and returns every payload whose deadline is `<= now`.
    ///
    /// Results are ordered by deadline; equal deadlines keep scheduling order.
    pub fn take_due(&mut self, now: u64) -> Vec<(K, T)> {
        let mut due: Vec<(K, Pending<T>)> = self
            .pending
            .extract_if(|_, p| p.deadline <= now)
            .collect();
        due.sort_by_key(|(_, p)| (p.deadline, p.seq));
        due.into_iter().map(|(k, p)| (k, p.payload)).collect()
    }

    /// Drops every pending payload.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
