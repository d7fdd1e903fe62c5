// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborators supplied by the host.
//!
//! The controller never touches a platform directly. It measures through
//! [`Geometry`], listens to the window through [`WindowEvents`], and coalesces
//! those events through a [`Scheduler`]. Sentinels register with a
//! [`ViewportWatcher`].
//!
//! All methods take `&self`: a single host object is shared (`Rc`) between
//! the controller, its window listener, and any number of sentinels, and may
//! be re-entered from inside a callback it is currently delivering.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use kurbo::Rect;
use understory_debounce::Debouncer;

/// Box geometry queries.
pub trait Geometry<E> {
    /// Bounding box of `element` in viewport-relative pixels.
    fn bounding_box(&self, element: &E) -> Rect;

    /// Current viewport height in pixels.
    fn viewport_height(&self) -> f64;
}

/// Window events the controller re-measures on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    /// The viewport changed size.
    Resize,
    /// The document scrolled.
    Scroll,
}

/// Handle returned by [`WindowEvents::add_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Window-level event subscription.
pub trait WindowEvents {
    /// Registers `listener` for `event`.
    fn add_listener(&self, event: WindowEvent, listener: Rc<dyn Fn()>) -> ListenerId;

    /// Removes a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// Key identifying one debounced job.
///
/// Each controller draws a fresh key so that bursts from different sticky
/// elements do not cancel each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskKey(usize);

impl TaskKey {
    /// Returns a key no other call has returned.
    #[must_use]
    pub fn fresh() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Cancel-and-reschedule timer.
pub trait Scheduler {
    /// Runs `task` after `delay_ms`, replacing any task pending under `key`.
    fn schedule(&self, key: TaskKey, delay_ms: u64, task: Box<dyn FnOnce()>);
}

/// Everything a [`StickyElement`](crate::StickyElement) needs from its host.
pub trait StickyHost<E>: Geometry<E> + WindowEvents + Scheduler {}

impl<E, T: Geometry<E> + WindowEvents + Scheduler + ?Sized> StickyHost<E> for T {}

/// [`Scheduler`] backed by an [`understory_debounce::Debouncer`].
///
/// The host owns the clock: it calls [`advance_to`](Self::advance_to) from
/// its timer or frame callback and arms the next wake-up from
/// [`next_deadline`](Self::next_deadline).
#[derive(Default)]
pub struct DebounceScheduler {
    now: Cell<u64>,
    queue: RefCell<Debouncer<TaskKey, Box<dyn FnOnce()>>>,
}

impl fmt::Debug for DebounceScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}

impl DebounceScheduler {
    /// Creates a scheduler whose clock reads zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.borrow().next_deadline()
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Moves the clock forward and runs every task that became due.
    ///
    /// Tasks run after the queue borrow is released, so they may schedule
    /// again. Returns the number of tasks run. The clock never moves
    /// backwards.
    pub fn advance_to(&self, now: u64) -> usize {
        let now = now.max(self.now.get());
        self.now.set(now);
        let due = self.queue.borrow_mut().take_due(now);
        let count = due.len();
        for (_, task) in due {
            task();
        }
        count
    }
}

impl Scheduler for DebounceScheduler {
    fn schedule(&self, key: TaskKey, delay_ms: u64, task: Box<dyn FnOnce()>) {
        self.queue
            .borrow_mut()
            .schedule(key, self.now.get(), delay_ms, task);
    }
}

/// Per-edge inward shift of a watched element's trigger lines.
///
/// Negative values move the trigger line into the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ViewportTolerance {
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
}

/// Process-wide knobs of a [`ViewportWatcher`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WatcherSettings {
    /// Whether the watcher delivers notifications at all.
    pub enabled: bool,
    /// Keep watching after the first enter.
    pub spy: bool,
    /// Sampling interval for hosts that poll.
    pub refresh_rate_ms: u32,
}

impl WatcherSettings {
    /// What every sentinel requests.
    pub const STICKY: Self = Self {
        enabled: true,
        spy: true,
        refresh_rate_ms: 16,
    };
}

/// Shared viewport-intersection detector.
///
/// One watcher serves every sentinel on a page. [`configure`](Self::configure)
/// is last-writer-wins; all sentinels request [`WatcherSettings::STICKY`], so
/// repeated calls are idempotent.
pub trait ViewportWatcher<E> {
    /// Applies process-wide settings.
    fn configure(&self, settings: WatcherSettings);

    /// Starts delivering enter/exit notifications for `element`.
    fn watch(
        &self,
        element: &E,
        tolerance: ViewportTolerance,
        on_enter: Box<dyn FnMut()>,
        on_exit: Box<dyn FnMut()>,
    );

    /// Stops delivering notifications for `element` and drops its callbacks.
    fn stop_watching(&self, element: &E);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn task_keys_are_unique() {
        let keys: Vec<TaskKey> = (0..64).map(|_| TaskKey::fresh()).collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b, "fresh keys must never repeat");
            }
        }
    }

    #[test]
    fn debounce_scheduler_runs_only_the_last_task() {
        let scheduler = DebounceScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let key = TaskKey::fresh();

        for i in 0..3 {
            let log = log.clone();
            scheduler.advance_to(i * 5);
            scheduler.schedule(key, 16, Box::new(move || log.borrow_mut().push(i)));
        }
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.next_deadline(), Some(26));

        assert_eq!(scheduler.advance_to(25), 0);
        assert_eq!(scheduler.advance_to(26), 1);
        assert_eq!(*log.borrow(), [2]);
    }

    #[test]
    fn tasks_may_reschedule_themselves() {
        let scheduler = Rc::new(DebounceScheduler::new());
        let hits = Rc::new(Cell::new(0));
        let key = TaskKey::fresh();

        let inner = scheduler.clone();
        let inner_hits = hits.clone();
        scheduler.schedule(
            key,
            16,
            Box::new(move || {
                inner_hits.set(inner_hits.get() + 1);
                let again = inner_hits.clone();
                inner.schedule(key, 16, Box::new(move || again.set(again.get() + 1)));
            }),
        );

        scheduler.advance_to(16);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending(), 1);
        scheduler.advance_to(32);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn clock_is_monotonic() {
        let scheduler = DebounceScheduler::new();
        scheduler.advance_to(100);
        scheduler.advance_to(50);
        assert_eq!(scheduler.now(), 100);
    }
}
