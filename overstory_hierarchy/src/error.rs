// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use understory_hierarchy::HierarchyError;
use understory_hierarchy_layout::LayoutError;

/// Reasons a chart run could not produce a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartError {
    /// The input records did not form a hierarchy.
    Hierarchy(HierarchyError),
    /// The layout pass rejected its parameters.
    Layout(LayoutError),
    /// A chart option is out of range.
    InvalidConfig {
        /// Which option was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hierarchy(err) => write!(f, "cannot build hierarchy: {err}"),
            Self::Layout(err) => write!(f, "cannot lay out hierarchy: {err}"),
            Self::InvalidConfig { name, value } => {
                write!(f, "invalid chart option {name}: {value}")
            }
        }
    }
}

impl core::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Hierarchy(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::InvalidConfig { .. } => None,
        }
    }
}

impl From<HierarchyError> for ChartError {
    fn from(err: HierarchyError) -> Self {
        Self::Hierarchy(err)
    }
}

impl From<LayoutError> for ChartError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}
