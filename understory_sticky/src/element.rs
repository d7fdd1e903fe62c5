// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared handle a rendering layer wires to DOM lifecycle.
//!
//! [`StickyElement`] owns a [`StickyController`] behind a shared `Rc` so
//! that sentinel callbacks and the window listener can reach it. Those
//! callbacks only hold weak references: once the handle is dropped they turn
//! into no-ops. A teardown requested while the controller is in use is
//! finished as soon as that use ends.
//!
//! ## Wiring
//!
//! 1) Create the handle with a configuration and the host.
//! 2) Mount a top [`TriggerSentinel`](crate::TriggerSentinel) built from
//!    [`StickyElement::top_trigger_hooks`] and
//!    [`top_trigger_args`](StickyController::top_trigger_args).
//! 3) Call [`StickyElement::setup_element`] with the sticky layer.
//! 4) If [`bottom_trigger_args`](StickyController::bottom_trigger_args) is
//!    `Some`, mount a bottom sentinel from
//!    [`StickyElement::bottom_trigger_hooks`].
//! 5) After every state change, apply [`StickyElement::render`].
//! 6) Drop the sentinels, then the handle (or call
//!    [`StickyElement::destroy`]).

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::{Cell, Ref, RefCell};
use core::fmt;

use crate::config::{SentinelArgs, StickyConfig};
use crate::controller::{Stickiness, StickyController, StickyMode};
use crate::host::{ListenerId, StickyHost, TaskKey, WindowEvent};
use crate::sentinel::SentinelHooks;
use crate::style::{ContainerStyle, PlaceholderStyle};

/// Debounce window for resize/scroll, roughly one frame.
pub const DEBOUNCE_MS: u64 = 16;

/// Everything the rendering layer applies after a state change.
#[derive(Clone, Debug, PartialEq)]
pub struct StickyRender {
    /// State handed to the content.
    pub stickiness: Stickiness,
    /// Class list of the outer box.
    pub class: String,
    /// Style of the outer box.
    pub style: Option<PlaceholderStyle>,
    /// Class list of the sticky layer.
    pub container_class: String,
    /// Style of the sticky layer.
    pub container_style: Option<ContainerStyle>,
    /// Arguments for the top sentinel.
    pub top_trigger: SentinelArgs,
    /// Arguments for the bottom sentinel, when bottom-sticking is on.
    pub bottom_trigger: Option<SentinelArgs>,
}

/// Controller plus a teardown request that arrived while it was borrowed.
struct Shared<E, H: ?Sized> {
    controller: RefCell<StickyController<E, H>>,
    destroy_pending: Cell<bool>,
}

impl<E, H: ?Sized> Shared<E, H> {
    /// Runs `f` on the controller, then completes any deferred teardown.
    fn update(&self, f: impl FnOnce(&mut StickyController<E, H>)) {
        {
            let mut controller = self.controller.borrow_mut();
            f(&mut *controller);
        }
        self.finish_pending_destroy();
    }

    fn finish_pending_destroy(&self) {
        if !self.destroy_pending.get() {
            return;
        }
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.begin_destroy();
            controller.finish_destroy();
            self.destroy_pending.set(false);
            tracing::debug!("deferred sticky element teardown finished");
        }
    }
}

/// Shared handle around a [`StickyController`].
///
/// Dropping the handle runs [`destroy`](Self::destroy).
pub struct StickyElement<E, H: StickyHost<E> + ?Sized> {
    inner: Rc<Shared<E, H>>,
    host: Rc<H>,
    key: TaskKey,
    listeners: Cell<Option<[ListenerId; 2]>>,
}

impl<E: fmt::Debug, H: StickyHost<E> + ?Sized> fmt::Debug for StickyElement<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyElement")
            .field("controller", &self.inner.controller)
            .field("destroy_pending", &self.inner.destroy_pending.get())
            .field("key", &self.key)
            .field("listeners", &self.listeners.get())
            .finish_non_exhaustive()
    }
}

/// Runs `f` on the controller if it is still around.
fn with_controller<E, H: ?Sized>(
    weak: &Weak<Shared<E, H>>,
    f: impl FnOnce(&mut StickyController<E, H>),
) {
    if let Some(shared) = weak.upgrade() {
        shared.update(f);
    }
}

impl<E: Clone + 'static, H: StickyHost<E> + ?Sized + 'static> StickyElement<E, H> {
    /// Creates the controller. Nothing is measured until
    /// [`setup_element`](Self::setup_element).
    pub fn new(config: StickyConfig, host: Rc<H>) -> Self {
        Self {
            inner: Rc::new(Shared {
                controller: RefCell::new(StickyController::new(config, host.clone())),
                destroy_pending: Cell::new(false),
            }),
            host,
            key: TaskKey::fresh(),
            listeners: Cell::new(None),
        }
    }

    /// Borrows the controller for reading.
    ///
    /// # Panics
    ///
    /// Panics if called from inside one of the controller's own callbacks.
    #[must_use]
    pub fn controller(&self) -> Ref<'_, StickyController<E, H>> {
        self.inner.controller.borrow()
    }

    /// Effective mode.
    #[must_use]
    pub fn mode(&self) -> StickyMode {
        self.inner.controller.borrow().mode()
    }

    /// State handed to the content.
    #[must_use]
    pub fn stickiness(&self) -> Stickiness {
        self.inner.controller.borrow().stickiness()
    }

    /// Snapshot of everything the rendering layer applies.
    #[must_use]
    pub fn render(&self) -> StickyRender {
        let c = self.inner.controller.borrow();
        StickyRender {
            stickiness: c.stickiness(),
            class: String::from(c.class()),
            style: c.style(),
            container_class: c.container_class(),
            container_style: c.container_style(),
            top_trigger: c.top_trigger_args(),
            bottom_trigger: c.bottom_trigger_args(),
        }
    }

    /// Applies a new configuration for the next render cycle.
    pub fn set_config(&self, config: StickyConfig) {
        self.inner.update(|c| c.set_config(config));
    }

    /// Hands over the sticky layer, runs the initial measurement and
    /// classification, then attaches the coalesced resize/scroll listener.
    pub fn setup_element(&self, element: E) {
        self.inner.update(|c| c.setup_element(element));
        if self.listeners.get().is_some() || !self.inner.controller.borrow().lifecycle().is_live() {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let host = Rc::downgrade(&self.host);
        let key = self.key;
        let listener: Rc<dyn Fn()> = Rc::new(move || {
            let Some(host) = host.upgrade() else {
                return;
            };
            let weak = weak.clone();
            host.schedule(
                key,
                DEBOUNCE_MS,
                Box::new(move || {
                    tracing::trace!("debounced refresh");
                    with_controller(&weak, StickyController::refresh);
                }),
            );
        });
        let resize = self.host.add_listener(WindowEvent::Resize, listener.clone());
        let scroll = self.host.add_listener(WindowEvent::Scroll, listener);
        self.listeners.set(Some([resize, scroll]));
        tracing::debug!(mode = %self.mode(), "sticky element mounted");
    }

    /// The top sentinel entered the viewport.
    pub fn parent_top_entered(&self) {
        self.inner.update(StickyController::parent_top_entered);
    }

    /// The top sentinel left the viewport.
    pub fn parent_top_exited(&self) {
        self.inner.update(StickyController::parent_top_exited);
    }

    /// The bottom sentinel entered the viewport.
    pub fn parent_bottom_entered(&self) {
        self.inner.update(StickyController::parent_bottom_entered);
    }

    /// The bottom sentinel left the viewport.
    pub fn parent_bottom_exited(&self) {
        self.inner.update(StickyController::parent_bottom_exited);
    }

    /// Keeps a reference to the top sentinel's element.
    pub fn register_top_trigger(&self, element: E) {
        self.inner.update(|c| c.register_top_trigger(element));
    }

    /// Keeps a reference to the bottom sentinel's element.
    pub fn register_bottom_trigger(&self, element: E) {
        self.inner.update(|c| c.register_bottom_trigger(element));
    }

    /// Hooks for the top sentinel, wired to the `parent_top_*` actions.
    #[must_use]
    pub fn top_trigger_hooks(&self) -> SentinelHooks<E> {
        let enter = Rc::downgrade(&self.inner);
        let exit = enter.clone();
        let register = enter.clone();
        SentinelHooks {
            enter: Rc::new(move || with_controller(&enter, StickyController::parent_top_entered)),
            exit: Rc::new(move || with_controller(&exit, StickyController::parent_top_exited)),
            register_element: Box::new(move |element: &E| {
                with_controller(&register, |c| c.register_top_trigger(element.clone()));
            }),
        }
    }

    /// Hooks for the bottom sentinel, wired to the `parent_bottom_*` actions.
    #[must_use]
    pub fn bottom_trigger_hooks(&self) -> SentinelHooks<E> {
        let enter = Rc::downgrade(&self.inner);
        let exit = enter.clone();
        let register = enter.clone();
        SentinelHooks {
            enter: Rc::new(move || {
                with_controller(&enter, StickyController::parent_bottom_entered);
            }),
            exit: Rc::new(move || with_controller(&exit, StickyController::parent_bottom_exited)),
            register_element: Box::new(move |element: &E| {
                with_controller(&register, |c| c.register_bottom_trigger(element.clone()));
            }),
        }
    }
}

impl<E, H: StickyHost<E> + ?Sized> StickyElement<E, H> {
    /// Detaches the window listeners and disposes of the controller.
    ///
    /// A debounced refresh already queued in the host's scheduler still runs,
    /// but finds the controller disposed and does nothing. Calling this more
    /// than once is harmless.
    ///
    /// Called while the controller is borrowed (a host callback re-entering
    /// from inside a controller call), the listeners still go at once and
    /// the controller is disposed when the outermost call returns.
    pub fn destroy(&self) {
        let was_live = match self.inner.controller.try_borrow_mut() {
            Ok(mut controller) => {
                let live = controller.lifecycle().is_live();
                controller.begin_destroy();
                Some(live)
            }
            Err(_) => None,
        };
        if let Some(ids) = self.listeners.take() {
            for id in ids {
                self.host.remove_listener(id);
            }
        }
        match (was_live, self.inner.controller.try_borrow_mut()) {
            (Some(live), Ok(mut controller)) => {
                controller.finish_destroy();
                if live {
                    tracing::debug!("sticky element destroyed");
                }
            }
            _ => {
                self.inner.destroy_pending.set(true);
                tracing::debug!("sticky element teardown deferred");
            }
        }
    }
}

impl<E, H: StickyHost<E> + ?Sized> Drop for StickyElement<E, H> {
    fn drop(&mut self) {
        self.destroy();
    }
}
