// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stickiness state machine.
//!
//! [`StickyController`] holds the canonical state: configuration, the last
//! measurements, and one [`Position`] per boundary sentinel. Everything else
//! (mode, styles, classes, sentinel arguments) is derived on every read.
//!
//! ## Modes
//!
//! - [`StickyMode::StuckBottom`] iff enabled, bottom-sticking is configured,
//!   and the bottom sentinel is not [`Position::Bottom`].
//! - [`StickyMode::StuckTop`] iff enabled, the top sentinel is
//!   [`Position::Top`], and the element is not stuck to the bottom.
//! - [`StickyMode::Free`] otherwise.
//!
//! Bottom wins over top, so the two stuck modes can never hold at once.
//!
//! ## Inputs
//!
//! Sentinel enter events set the matching position to [`Position::In`].
//! Exit events cannot tell which side the sentinel left through, so they
//! re-measure and re-classify both sentinels. The coalesced resize/scroll
//! tick does the same through [`StickyController::refresh`], which is what
//! keeps an already stuck element sized correctly while its sentinels are
//! off-screen.
//!
//! Once disposal has begun every input is ignored.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use crate::config::{SentinelArgs, SentinelKind, StickyConfig};
use crate::geometry::{self, Position};
use crate::host::Geometry;
use crate::style::{ContainerStyle, PlaceholderStyle};

/// Effective sticky mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StickyMode {
    /// In normal flow.
    #[default]
    Free,
    /// Pinned to the viewport top.
    StuckTop,
    /// Pinned to the bottom of the containing block.
    StuckBottom,
}

impl fmt::Display for StickyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Free => "Not sticky",
            Self::StuckTop => "Stuck to top",
            Self::StuckBottom => "Stuck to bottom",
        })
    }
}

/// Read-only state handed to the sticky element's content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stickiness {
    /// Stuck to either edge.
    pub is_sticky: bool,
    /// Stuck to the top.
    pub is_sticky_top: bool,
    /// Stuck to the bottom.
    pub is_sticky_bottom: bool,
}

impl From<StickyMode> for Stickiness {
    fn from(mode: StickyMode) -> Self {
        let is_sticky_top = mode == StickyMode::StuckTop;
        let is_sticky_bottom = mode == StickyMode::StuckBottom;
        Self {
            is_sticky: is_sticky_top || is_sticky_bottom,
            is_sticky_top,
            is_sticky_bottom,
        }
    }
}

/// Last measured dimensions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Measurements {
    /// Height of the sticky layer.
    pub own_height: f64,
    /// Width of the sticky layer.
    pub own_width: f64,
    /// Viewport height.
    pub window_height: f64,
}

/// Where the controller is in its life.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created; the sticky layer has not been handed over yet.
    #[default]
    Created,
    /// The sticky layer is set up and listeners are attached.
    Mounted,
    /// Teardown has started.
    Destroying,
    /// Torn down.
    Destroyed,
}

impl Lifecycle {
    /// Whether inputs are still accepted.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Created | Self::Mounted)
    }
}

/// Canonical sticky state plus the derivations over it.
pub struct StickyController<E, H: ?Sized> {
    config: StickyConfig,
    host: Rc<H>,
    measurements: Measurements,
    parent_top: Position,
    parent_bottom: Position,
    element: Option<E>,
    top_trigger: Option<E>,
    bottom_trigger: Option<E>,
    lifecycle: Lifecycle,
}

impl<E: fmt::Debug, H: ?Sized> fmt::Debug for StickyController<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyController")
            .field("config", &self.config)
            .field("measurements", &self.measurements)
            .field("parent_top", &self.parent_top)
            .field("parent_bottom", &self.parent_bottom)
            .field("element", &self.element)
            .field("top_trigger", &self.top_trigger)
            .field("bottom_trigger", &self.bottom_trigger)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

impl<E, H: ?Sized> StickyController<E, H> {
    /// Creates a controller with nothing measured and nothing stuck.
    pub fn new(config: StickyConfig, host: Rc<H>) -> Self {
        Self {
            config,
            host,
            measurements: Measurements::default(),
            parent_top: Position::default(),
            parent_bottom: Position::default(),
            element: None,
            top_trigger: None,
            bottom_trigger: None,
            lifecycle: Lifecycle::Created,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &StickyConfig {
        &self.config
    }

    /// Replaces the configuration for the next render cycle.
    ///
    /// Derived state follows on the next read; positions are left as they
    /// are until the next event.
    pub fn set_config(&mut self, config: StickyConfig) {
        if self.lifecycle.is_live() {
            self.config = config;
        }
    }

    /// Last measured dimensions.
    #[must_use]
    pub fn measurements(&self) -> Measurements {
        self.measurements
    }

    /// Position of the top sentinel.
    #[must_use]
    pub fn parent_top(&self) -> Position {
        self.parent_top
    }

    /// Position of the bottom sentinel.
    #[must_use]
    pub fn parent_bottom(&self) -> Position {
        self.parent_bottom
    }

    /// Lifecycle stage.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The sticky layer's element, once set up.
    #[must_use]
    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    /// Effective mode.
    #[must_use]
    pub fn mode(&self) -> StickyMode {
        if !self.config.enabled() {
            StickyMode::Free
        } else if self.config.stick_to_bottom() && self.parent_bottom != Position::Bottom {
            StickyMode::StuckBottom
        } else if self.parent_top == Position::Top {
            StickyMode::StuckTop
        } else {
            StickyMode::Free
        }
    }

    /// Mode as the flag triple handed to content.
    #[must_use]
    pub fn stickiness(&self) -> Stickiness {
        self.mode().into()
    }

    /// Stuck to either edge.
    #[must_use]
    pub fn is_sticky(&self) -> bool {
        self.mode() != StickyMode::Free
    }

    /// Stuck to the top.
    #[must_use]
    pub fn is_sticky_top(&self) -> bool {
        self.mode() == StickyMode::StuckTop
    }

    /// Stuck to the bottom.
    #[must_use]
    pub fn is_sticky_bottom(&self) -> bool {
        self.mode() == StickyMode::StuckBottom
    }

    /// Far offset used to classify the bottom sentinel.
    #[must_use]
    pub fn offset_bottom(&self) -> f64 {
        geometry::offset_bottom(
            self.measurements.window_height,
            self.config.top(),
            self.measurements.own_height,
            self.config.bottom_offset(),
        )
    }

    /// Class list of the outer box.
    #[must_use]
    pub fn class(&self) -> &str {
        self.config.class()
    }

    /// Style of the outer box: holds the layer's height open while stuck.
    #[must_use]
    pub fn style(&self) -> Option<PlaceholderStyle> {
        (self.measurements.own_height > 0.0 && self.is_sticky()).then_some(PlaceholderStyle {
            height: self.measurements.own_height,
        })
    }

    /// Class list of the sticky layer, with the active mode's modifiers.
    #[must_use]
    pub fn container_class(&self) -> String {
        let mut class = String::from(self.config.container_class_name());
        let mut push = |name: &str| {
            class.push(' ');
            class.push_str(name);
        };
        match self.mode() {
            StickyMode::Free => {}
            StickyMode::StuckTop => {
                push(self.config.container_sticky_class_name());
                push(self.config.container_sticky_top_class_name());
            }
            StickyMode::StuckBottom => {
                push(self.config.container_sticky_class_name());
                push(self.config.container_sticky_bottom_class_name());
            }
        }
        class
    }

    /// Positioning of the sticky layer; `None` while free.
    #[must_use]
    pub fn container_style(&self) -> Option<ContainerStyle> {
        let width = self.measurements.own_width;
        match self.mode() {
            StickyMode::Free => None,
            StickyMode::StuckTop => Some(ContainerStyle::Fixed {
                top: self.config.top(),
                width,
            }),
            StickyMode::StuckBottom => Some(ContainerStyle::Absolute {
                bottom: self.config.bottom_offset(),
                width,
            }),
        }
    }

    /// Arguments for the top sentinel.
    #[must_use]
    pub fn top_trigger_args(&self) -> SentinelArgs {
        SentinelArgs {
            kind: SentinelKind::Top,
            offset: self.config.top(),
        }
    }

    /// Arguments for the bottom sentinel; `None` unless bottom-sticking is on.
    #[must_use]
    pub fn bottom_trigger_args(&self) -> Option<SentinelArgs> {
        self.config.stick_to_bottom().then(|| SentinelArgs {
            kind: SentinelKind::Bottom,
            offset: self.offset_bottom(),
        })
    }

    /// Starts teardown. Every later input is ignored.
    pub fn begin_destroy(&mut self) {
        if self.lifecycle.is_live() {
            self.lifecycle = Lifecycle::Destroying;
        }
    }

    /// Finishes teardown and drops every element reference.
    pub fn finish_destroy(&mut self) {
        self.lifecycle = Lifecycle::Destroyed;
        self.element = None;
        self.top_trigger = None;
        self.bottom_trigger = None;
    }

    /// Runs `f` if live and logs any resulting mode change.
    fn transition(&mut self, cause: &'static str, f: impl FnOnce(&mut Self)) {
        if !self.lifecycle.is_live() {
            tracing::trace!(cause, "ignored after disposal");
            return;
        }
        let before = self.mode();
        f(self);
        let after = self.mode();
        if before != after {
            tracing::debug!(
                cause,
                from = %before,
                to = %after,
                parent_top = ?self.parent_top,
                parent_bottom = ?self.parent_bottom,
                "sticky mode changed"
            );
        }
    }

    /// The top sentinel entered the viewport.
    pub fn parent_top_entered(&mut self) {
        self.transition("top sentinel entered", |this| {
            this.parent_top = Position::In;
        });
    }
}

impl<E, H: Geometry<E> + ?Sized> StickyController<E, H> {
    fn update_dimension(&mut self) {
        self.measurements.window_height = self.host.viewport_height();
        let own = self.element.as_ref().map(|el| self.host.bounding_box(el));
        self.measurements.own_height = own.map_or(0.0, |r| r.height());
        self.measurements.own_width = own.map_or(0.0, |r| r.width());
    }

    fn update_position(&mut self) {
        let viewport_height = self.host.viewport_height();
        if let Some(trigger) = &self.top_trigger {
            let rect = self.host.bounding_box(trigger);
            self.parent_top =
                geometry::top_sentinel_position(rect, self.config.top(), viewport_height);
        }
        if let Some(trigger) = &self.bottom_trigger {
            let rect = self.host.bounding_box(trigger);
            self.parent_bottom =
                geometry::bottom_sentinel_position(rect, self.offset_bottom(), viewport_height);
        }
    }

    /// Hands over the sticky layer and runs the initial measurement and
    /// classification.
    ///
    /// An element inserted below an already scrolled page comes out stuck
    /// right away.
    pub fn setup_element(&mut self, element: E) {
        self.transition("setup", |this| {
            this.element = Some(element);
            this.lifecycle = Lifecycle::Mounted;
            this.update_dimension();
            this.update_position();
        });
    }

    /// Re-measures and re-classifies both sentinels.
    ///
    /// This is the body of the coalesced resize/scroll tick.
    pub fn refresh(&mut self) {
        self.transition("refresh", |this| {
            this.update_dimension();
            this.update_position();
        });
    }

    /// The top sentinel left the viewport.
    pub fn parent_top_exited(&mut self) {
        // Capture dimensions before going sticky.
        self.transition("top sentinel exited", |this| {
            this.update_dimension();
            this.update_position();
        });
    }

    /// The bottom sentinel entered the viewport.
    pub fn parent_bottom_entered(&mut self) {
        self.transition("bottom sentinel entered", |this| {
            this.parent_bottom = Position::In;
            this.update_position();
        });
    }

    /// The bottom sentinel left the viewport.
    pub fn parent_bottom_exited(&mut self) {
        self.transition("bottom sentinel exited", |this| {
            this.update_dimension();
            this.update_position();
        });
    }

    /// Keeps a reference to the top sentinel for on-demand classification.
    pub fn register_top_trigger(&mut self, element: E) {
        self.transition("top sentinel registered", |this| {
            this.top_trigger = Some(element);
            this.update_position();
        });
    }

    /// Keeps a reference to the bottom sentinel for on-demand classification.
    pub fn register_bottom_trigger(&mut self, element: E) {
        self.transition("bottom sentinel registered", |this| {
            this.bottom_trigger = Some(element);
            this.update_position();
        });
    }
}
