// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inline style directives.
//!
//! Both types render as inline CSS through [`Display`](core::fmt::Display).

use core::fmt;

/// Sizing of the outer box while the sticky layer is out of flow.
///
/// Holding the outer box at the layer's last measured height keeps the
/// surrounding content from jumping.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaceholderStyle {
    /// Height in pixels.
    pub height: f64,
}

impl fmt::Display for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "height: {}px;", self.height)
    }
}

/// Positioning of the sticky layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ContainerStyle {
    /// Pinned to the viewport.
    Fixed {
        /// Pixels from the viewport top.
        top: f64,
        /// Width pinned to the last measured width.
        width: f64,
    },
    /// Pinned to the bottom of the containing block.
    Absolute {
        /// Pixels from the block's bottom edge.
        bottom: f64,
        /// Width pinned to the last measured width.
        width: f64,
    },
}

impl ContainerStyle {
    /// Pinned width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        match *self {
            Self::Fixed { width, .. } | Self::Absolute { width, .. } => width,
        }
    }
}

impl fmt::Display for ContainerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { top, width } => {
                write!(f, "position: fixed; top: {top}px; width: {width}px")
            }
            Self::Absolute { bottom, width } => {
                write!(f, "position: absolute; bottom: {bottom}px; width: {width}px")
            }
        }
    }
}
