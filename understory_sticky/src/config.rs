// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consumer-facing configuration.
//!
//! [`StickyArgs`] mirrors what a consumer writes in markup: every field is
//! optional. [`StickyConfig::from_args`] resolves the defaults once per render
//! cycle.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

use thiserror::Error;

/// Default class on the outer (placeholder) box.
pub const CONTAINER_CLASS: &str = "sticky-element-container";
/// Default class on the sticky layer.
pub const STICKY_CLASS: &str = "sticky-element";
/// Default class on the sticky layer while stuck to either edge.
pub const STICKY_ACTIVE_CLASS: &str = "sticky-element--sticky";
/// Default class on the sticky layer while stuck to the top.
pub const STICKY_TOP_CLASS: &str = "sticky-element--sticky-top";
/// Default class on the sticky layer while stuck to the bottom.
pub const STICKY_BOTTOM_CLASS: &str = "sticky-element--sticky-bottom";

/// Raw arguments as supplied by the consumer.
///
/// With the `serde` feature this deserializes from the camelCase attribute
/// names used in markup (`containerStickyTopClassName`, ...).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct StickyArgs {
    /// Extra classes prepended to [`CONTAINER_CLASS`].
    pub class: Option<String>,
    /// Pixels from the viewport top at which the element starts sticking.
    pub top: Option<f64>,
    /// Pixels from the parent's bottom edge for bottom-sticking.
    ///
    /// `None` disables bottom-sticking altogether.
    pub bottom: Option<f64>,
    /// `Some(false)` suppresses stickiness.
    pub enabled: Option<bool>,
    /// Overrides [`STICKY_CLASS`].
    pub container_class_name: Option<String>,
    /// Overrides [`STICKY_ACTIVE_CLASS`].
    pub container_sticky_class_name: Option<String>,
    /// Overrides [`STICKY_TOP_CLASS`].
    pub container_sticky_top_class_name: Option<String>,
    /// Overrides [`STICKY_BOTTOM_CLASS`].
    pub container_sticky_bottom_class_name: Option<String>,
}

/// Rejected configuration.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// An offset was NaN or infinite.
    #[error("`{field}` must be a finite number of pixels, got {value}")]
    NonFiniteOffset {
        /// Name of the offending argument.
        field: &'static str,
        /// The value that was passed.
        value: f64,
    },
}

/// Resolved configuration with all defaults applied.
#[derive(Clone, Debug, PartialEq)]
pub struct StickyConfig {
    class: String,
    top: f64,
    bottom: Option<f64>,
    enabled: bool,
    container_class_name: Cow<'static, str>,
    container_sticky_class_name: Cow<'static, str>,
    container_sticky_top_class_name: Cow<'static, str>,
    container_sticky_bottom_class_name: Cow<'static, str>,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            class: String::from(CONTAINER_CLASS),
            top: 0.0,
            bottom: None,
            enabled: true,
            container_class_name: Cow::Borrowed(STICKY_CLASS),
            container_sticky_class_name: Cow::Borrowed(STICKY_ACTIVE_CLASS),
            container_sticky_top_class_name: Cow::Borrowed(STICKY_TOP_CLASS),
            container_sticky_bottom_class_name: Cow::Borrowed(STICKY_BOTTOM_CLASS),
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFiniteOffset { field, value })
    }
}

fn class_name(value: Option<&String>, default: &'static str) -> Cow<'static, str> {
    match value {
        Some(name) if !name.is_empty() => Cow::Owned(name.clone()),
        _ => Cow::Borrowed(default),
    }
}

impl StickyConfig {
    /// Resolves consumer arguments, filling in defaults.
    pub fn from_args(args: &StickyArgs) -> Result<Self, ConfigError> {
        let top = finite("top", args.top.unwrap_or(0.0))?;
        let bottom = args.bottom.map(|b| finite("bottom", b)).transpose()?;
        let class = match &args.class {
            Some(extra) => format!("{extra} {CONTAINER_CLASS}"),
            None => String::from(CONTAINER_CLASS),
        };
        Ok(Self {
            class,
            top,
            bottom,
            enabled: args.enabled.unwrap_or(true),
            container_class_name: class_name(args.container_class_name.as_ref(), STICKY_CLASS),
            container_sticky_class_name: class_name(
                args.container_sticky_class_name.as_ref(),
                STICKY_ACTIVE_CLASS,
            ),
            container_sticky_top_class_name: class_name(
                args.container_sticky_top_class_name.as_ref(),
                STICKY_TOP_CLASS,
            ),
            container_sticky_bottom_class_name: class_name(
                args.container_sticky_bottom_class_name.as_ref(),
                STICKY_BOTTOM_CLASS,
            ),
        })
    }

    /// Sets the top offset.
    #[must_use]
    pub fn with_top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    /// Enables bottom-sticking at the given offset, or disables it with `None`.
    #[must_use]
    pub fn with_bottom(mut self, bottom: Option<f64>) -> Self {
        self.bottom = bottom;
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Class list for the outer box.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Top offset in pixels.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Bottom offset as configured; `None` when bottom-sticking is off.
    #[must_use]
    pub fn bottom(&self) -> Option<f64> {
        self.bottom
    }

    /// Bottom offset used in arithmetic, `0` when unset.
    #[must_use]
    pub fn bottom_offset(&self) -> f64 {
        self.bottom.unwrap_or(0.0)
    }

    /// Whether bottom-sticking is configured.
    #[must_use]
    pub fn stick_to_bottom(&self) -> bool {
        self.bottom.is_some()
    }

    /// Whether stickiness is enabled at all.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Base class of the sticky layer.
    #[must_use]
    pub fn container_class_name(&self) -> &str {
        &self.container_class_name
    }

    /// Modifier class while stuck to either edge.
    #[must_use]
    pub fn container_sticky_class_name(&self) -> &str {
        &self.container_sticky_class_name
    }

    /// Modifier class while stuck to the top.
    #[must_use]
    pub fn container_sticky_top_class_name(&self) -> &str {
        &self.container_sticky_top_class_name
    }

    /// Modifier class while stuck to the bottom.
    #[must_use]
    pub fn container_sticky_bottom_class_name(&self) -> &str {
        &self.container_sticky_bottom_class_name
    }
}

impl TryFrom<&StickyArgs> for StickyConfig {
    type Error = ConfigError;

    fn try_from(args: &StickyArgs) -> Result<Self, Self::Error> {
        Self::from_args(args)
    }
}

/// Which boundary a [`TriggerSentinel`](crate::TriggerSentinel) marks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SentinelKind {
    /// Start of the scrollable region.
    #[default]
    Top,
    /// End of the scrollable region.
    Bottom,
}

impl SentinelKind {
    /// Lowercase name as used in class names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Arguments of a [`TriggerSentinel`](crate::TriggerSentinel).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SentinelArgs {
    /// Boundary this sentinel marks.
    pub kind: SentinelKind,
    /// Pixels by which the trigger line is moved inward on the sentinel's edge.
    pub offset: f64,
}
