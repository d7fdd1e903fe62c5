// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sentinel classification against the viewport.
//!
//! [`classify`] is the single three-way test used for both boundary sentinels.
//! The meaning of its result depends on which offsets it is called with, so
//! the controller goes through [`top_sentinel_position`] and
//! [`bottom_sentinel_position`] rather than calling it directly:
//!
//! | call site | `offset_near` | `offset_far` |
//! |-----------|---------------|--------------|
//! | top sentinel | configured `top` | `0` |
//! | bottom sentinel | `0` | [`offset_bottom`] |
//!
//! Swapping the two offsets still type-checks but reports the opposite
//! polarity for the bottom sentinel.

use kurbo::Rect;

/// Where a sentinel sits relative to its trigger line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// Scrolled past the near trigger line.
    Top,
    /// Fully inside the offset-adjusted viewport.
    In,
    /// Not yet at the trigger line, or past the far one.
    ///
    /// This is the state before anything has been measured.
    #[default]
    Bottom,
}

/// Classifies a viewport-relative box against the offset-adjusted viewport.
///
/// - `Top` when `rect.y0 - offset_near <= 0`.
/// - `In` when the box plus `offset_far` fits above `viewport_height`.
/// - `Bottom` otherwise.
///
/// Boundary equalities resolve toward `Top` and then `In`.
#[must_use]
pub fn classify(rect: Rect, offset_near: f64, offset_far: f64, viewport_height: f64) -> Position {
    let top = rect.y0;
    if top - offset_near <= 0.0 {
        Position::Top
    } else if top + rect.height() + offset_far <= viewport_height {
        Position::In
    } else {
        Position::Bottom
    }
}

/// Classifies the top sentinel, which trips once it crosses `top` pixels
/// below the viewport's top edge.
#[must_use]
pub fn top_sentinel_position(rect: Rect, top: f64, viewport_height: f64) -> Position {
    classify(rect, top, 0.0, viewport_height)
}

/// Classifies the bottom sentinel.
///
/// `offset_bottom` comes from [`offset_bottom`]. Anything other than
/// [`Position::Bottom`] means the sticky element would run past its block if
/// it stayed pinned to the top.
#[must_use]
pub fn bottom_sentinel_position(rect: Rect, offset_bottom: f64, viewport_height: f64) -> Position {
    classify(rect, 0.0, offset_bottom, viewport_height)
}

/// Distance between the bottom sentinel's natural position and the point
/// where bottom-sticking has to take over.
#[must_use]
pub fn offset_bottom(window_height: f64, top: f64, own_height: f64, bottom: f64) -> f64 {
    window_height - top - own_height - bottom
}
