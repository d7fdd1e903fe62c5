// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary sentinels.
//!
//! A [`TriggerSentinel`] is a thin marker placed at the top or bottom boundary
//! of the scrollable region. It registers its element with the shared
//! [`ViewportWatcher`] and forwards enter/exit notifications to its owner
//! through [`SentinelHooks`].
//!
//! ## Shared watcher
//!
//! Mounting a sentinel writes [`WatcherSettings::STICKY`] into the watcher.
//! The watcher is process-wide and other sentinels depend on it staying
//! enabled, so a sentinel only ever requests these settings and never turns
//! the watcher off on unmount.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use crate::config::{SentinelArgs, SentinelKind};
use crate::host::{ViewportTolerance, ViewportWatcher, WatcherSettings};

/// Callbacks a sentinel forwards to its owner.
pub struct SentinelHooks<E> {
    /// The sentinel entered the offset-adjusted viewport.
    pub enter: Rc<dyn Fn()>,
    /// The sentinel left the offset-adjusted viewport.
    pub exit: Rc<dyn Fn()>,
    /// Called once on mount with the sentinel's element.
    pub register_element: Box<dyn FnMut(&E)>,
}

impl<E> fmt::Debug for SentinelHooks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentinelHooks").finish_non_exhaustive()
    }
}

/// Marker element at a boundary of the scrollable region.
///
/// Dropping a mounted sentinel deregisters it from the watcher.
pub struct TriggerSentinel<E, W: ViewportWatcher<E> + ?Sized> {
    args: SentinelArgs,
    watcher: Rc<W>,
    hooks: SentinelHooks<E>,
    element: Option<E>,
}

impl<E: fmt::Debug, W: ViewportWatcher<E> + ?Sized> fmt::Debug for TriggerSentinel<E, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerSentinel")
            .field("args", &self.args)
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

impl<E, W: ViewportWatcher<E> + ?Sized> TriggerSentinel<E, W> {
    /// Creates an unmounted sentinel.
    pub fn new(args: SentinelArgs, watcher: Rc<W>, hooks: SentinelHooks<E>) -> Self {
        Self {
            args,
            watcher,
            hooks,
            element: None,
        }
    }

    /// Arguments this sentinel was created with.
    #[must_use]
    pub fn args(&self) -> SentinelArgs {
        self.args
    }

    /// Boundary this sentinel marks.
    #[must_use]
    pub fn kind(&self) -> SentinelKind {
        self.args.kind
    }

    /// Modifier class for the sentinel's element.
    #[must_use]
    pub fn type_class(&self) -> String {
        format!("sticky-element__trigger--{}", self.args.kind.as_str())
    }

    /// Tolerance handed to the watcher.
    ///
    /// The trigger line on the sentinel's own edge is pulled inward by
    /// `offset`; the other edges are left alone.
    #[must_use]
    pub fn viewport_tolerance(&self) -> ViewportTolerance {
        let (top, bottom) = match self.args.kind {
            SentinelKind::Top => (-self.args.offset, 0.0),
            SentinelKind::Bottom => (0.0, -self.args.offset),
        };
        ViewportTolerance {
            top,
            bottom,
            left: 0.0,
            right: 0.0,
        }
    }

    /// Returns `true` while registered with the watcher.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.element.is_some()
    }

    /// The sentinel's element, while mounted.
    #[must_use]
    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    /// Registers `element` with the watcher and hands it to the owner.
    ///
    /// Mounting an already mounted sentinel moves it to the new element.
    pub fn mount(&mut self, element: E) {
        self.unmount();

        self.watcher.configure(WatcherSettings::STICKY);
        (self.hooks.register_element)(&element);

        let enter = self.hooks.enter.clone();
        let exit = self.hooks.exit.clone();
        self.watcher.watch(
            &element,
            self.viewport_tolerance(),
            Box::new(move || enter()),
            Box::new(move || exit()),
        );
        tracing::debug!(
            kind = self.args.kind.as_str(),
            offset = self.args.offset,
            "sentinel mounted"
        );
        self.element = Some(element);
    }

    /// Deregisters from the watcher. No callback fires afterwards.
    pub fn unmount(&mut self) {
        if let Some(element) = self.element.take() {
            self.watcher.stop_watching(&element);
            tracing::debug!(kind = self.args.kind.as_str(), "sentinel unmounted");
        }
    }
}

impl<E, W: ViewportWatcher<E> + ?Sized> Drop for TriggerSentinel<E, W> {
    fn drop(&mut self) {
        self.unmount();
    }
}
