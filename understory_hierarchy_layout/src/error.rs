// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// Reasons a layout pass could not run.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutError {
    /// A tile strategy name did not match any known strategy.
    UnknownTileStrategy(String),
    /// A size, radius, or padding was negative or not finite.
    InvalidExtent {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTileStrategy(name) => write!(f, "unknown tile strategy {name:?}"),
            Self::InvalidExtent { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
        }
    }
}

impl core::error::Error for LayoutError {}

/// Checks that `value` is usable as a length.
pub(crate) fn check_extent(name: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidExtent { name, value })
    }
}
