// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sticky --heading-base-level=0

//! Understory Sticky: sentinel-driven sticky positioning state.
//!
//! This crate decides when an element should be pinned to the top of the
//! viewport, pinned to the bottom of its containing block, or left in normal
//! flow. It does not poll scroll positions. Two zero-height sentinels mark
//! the boundaries of the scrollable region, a host-provided intersection
//! watcher reports when they enter or leave the viewport, and the controller
//! re-measures on a coalesced resize/scroll tick to catch what sentinels miss
//! (an element that grows after it became stuck, a window resize).
//!
//! The pieces, leaves first:
//!
//! - [`geometry`]: the three-way [`classify`](geometry::classify) test shared
//!   by both sentinels.
//! - [`TriggerSentinel`]: registers a boundary element with a
//!   [`ViewportWatcher`](host::ViewportWatcher) and forwards enter/exit.
//! - [`StickyController`]: canonical state and every derivation
//!   ([`StickyMode`], [`ContainerStyle`], [`PlaceholderStyle`], class lists).
//! - [`StickyElement`]: shared handle wiring the controller to sentinels,
//!   window listeners, and the debounce [`Scheduler`](host::Scheduler).
//!
//! The crate does not know about any DOM or widget toolkit. Element handles
//! are an opaque, cheaply cloned `E`, and the host implements the traits in
//! [`host`].
//!
//! ## Minimal example
//!
//! ```rust
//! use std::rc::Rc;
//! use understory_sticky::host::{
//!     Geometry, ListenerId, Scheduler, TaskKey, WindowEvent, WindowEvents,
//! };
//! use understory_sticky::{StickyConfig, StickyElement, StickyMode};
//! use kurbo::Rect;
//!
//! /// A page scrolled so that the top sentinel is 40px above the viewport.
//! struct Page;
//!
//! impl Geometry<&'static str> for Page {
//!     fn bounding_box(&self, element: &&'static str) -> Rect {
//!         match *element {
//!             "top-sentinel" => Rect::new(0.0, -40.0, 320.0, -40.0),
//!             _ => Rect::new(0.0, -40.0, 320.0, 60.0),
//!         }
//!     }
//!     fn viewport_height(&self) -> f64 {
//!         600.0
//!     }
//! }
//! impl WindowEvents for Page {
//!     fn add_listener(&self, _: WindowEvent, _: Rc<dyn Fn()>) -> ListenerId {
//!         ListenerId(0)
//!     }
//!     fn remove_listener(&self, _: ListenerId) {}
//! }
//! impl Scheduler for Page {
//!     fn schedule(&self, _: TaskKey, _: u64, _: Box<dyn FnOnce()>) {}
//! }
//!
//! let sticky = StickyElement::new(StickyConfig::default(), Rc::new(Page));
//! sticky.register_top_trigger("top-sentinel");
//! sticky.setup_element("layer");
//!
//! assert_eq!(sticky.mode(), StickyMode::StuckTop);
//! let render = sticky.render();
//! assert_eq!(
//!     render.container_style.unwrap().to_string(),
//!     "position: fixed; top: 0px; width: 320px"
//! );
//! assert_eq!(render.style.unwrap().to_string(), "height: 100px;");
//! ```
//!
//! ## Features
//!
//! - `serde`: deserialize [`StickyArgs`] from markup attributes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod element;
pub mod geometry;
pub mod host;
mod sentinel;
mod style;

pub use config::{
    CONTAINER_CLASS, ConfigError, STICKY_ACTIVE_CLASS, STICKY_BOTTOM_CLASS, STICKY_CLASS,
    STICKY_TOP_CLASS, SentinelArgs, SentinelKind, StickyArgs, StickyConfig,
};
pub use controller::{Lifecycle, Measurements, Stickiness, StickyController, StickyMode};
pub use element::{DEBOUNCE_MS, StickyElement, StickyRender};
pub use geometry::Position;
pub use sentinel::{SentinelHooks, TriggerSentinel};
pub use style::{ContainerStyle, PlaceholderStyle};
