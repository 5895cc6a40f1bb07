// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Options and encodings shared by the chart pipelines.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use kurbo::Size;
use understory_hierarchy::{Hierarchy, Node, descending_height, descending_value};

use crate::error::ChartError;

/// Space reserved around a chart's content area.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Margins {
    /// Space above the content.
    pub top: f64,
    /// Space right of the content.
    pub right: f64,
    /// Space below the content.
    pub bottom: f64,
    /// Space left of the content.
    pub left: f64,
}

impl Margins {
    /// No margins.
    pub const ZERO: Self = Self::uniform(0.0);

    /// The same margin on all four sides.
    pub const fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }

    /// `left + right`.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// `top + bottom`.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// The area left for content in a `width` × `height` chart.
    ///
    /// Fails if any extent is negative or not finite, or if the margins do
    /// not fit.
    pub fn content_size(&self, width: f64, height: f64) -> Result<Size, ChartError> {
        check_extent("width", width)?;
        check_extent("height", height)?;
        check_extent("margins.top", self.top)?;
        check_extent("margins.right", self.right)?;
        check_extent("margins.bottom", self.bottom)?;
        check_extent("margins.left", self.left)?;
        if self.horizontal() > width {
            return Err(ChartError::InvalidConfig {
                name: "margins.horizontal",
                value: self.horizontal(),
            });
        }
        if self.vertical() > height {
            return Err(ChartError::InvalidConfig {
                name: "margins.vertical",
                value: self.vertical(),
            });
        }
        Ok(Size::new(width - self.horizontal(), height - self.vertical()))
    }
}

/// Sibling order applied after aggregation and before layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SiblingOrder {
    /// Keep input order.
    #[default]
    Input,
    /// Larger values first.
    DescendingValue,
    /// Taller subtrees first.
    DescendingHeight,
}

impl SiblingOrder {
    pub(crate) fn apply<T>(self, hierarchy: &mut Hierarchy<T>) {
        match self {
            Self::Input => {}
            Self::DescendingValue => {
                hierarchy.sort_by(descending_value);
            }
            Self::DescendingHeight => {
                hierarchy.sort_by(descending_height);
            }
        }
    }
}

/// Leaf value accessor.
pub type ValueFn<'a, T> = Box<dyn Fn(&T) -> Option<f64> + 'a>;

/// Group key accessor for coloring.
pub type GroupFn<'a, T> = Box<dyn Fn(&T) -> String + 'a>;

/// Label or title text for a node.
pub type TextFn<'a, T> = Box<dyn Fn(&Node<T>) -> String + 'a>;

/// How records are encoded as chart marks.
///
/// Every encoding is optional. Without `value`, leaves count as `1`. Without
/// `group`, every mark uses the chart's plain fill.
pub struct Encodings<'a, T> {
    /// Leaf values to aggregate.
    pub value: Option<ValueFn<'a, T>>,
    /// Group key per leaf, mapped to palette colors.
    pub group: Option<GroupFn<'a, T>>,
    /// Visible label text.
    pub label: Option<TextFn<'a, T>>,
    /// Hover text.
    pub title: Option<TextFn<'a, T>>,
}

impl<T> Default for Encodings<'_, T> {
    fn default() -> Self {
        Self {
            value: None,
            group: None,
            label: None,
            title: None,
        }
    }
}

impl<T> fmt::Debug for Encodings<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encodings")
            .field("value", &self.value.is_some())
            .field("group", &self.group.is_some())
            .field("label", &self.label.is_some())
            .field("title", &self.title.is_some())
            .finish()
    }
}

impl<'a, T> Encodings<'a, T> {
    /// Sets the leaf value accessor.
    #[must_use]
    pub fn with_value(mut self, value: impl Fn(&T) -> Option<f64> + 'a) -> Self {
        self.value = Some(Box::new(value));
        self
    }

    /// Sets the group key accessor.
    #[must_use]
    pub fn with_group(mut self, group: impl Fn(&T) -> String + 'a) -> Self {
        self.group = Some(Box::new(group));
        self
    }

    /// Sets the label text.
    #[must_use]
    pub fn with_label(mut self, label: impl Fn(&Node<T>) -> String + 'a) -> Self {
        self.label = Some(Box::new(label));
        self
    }

    /// Sets the hover text.
    #[must_use]
    pub fn with_title(mut self, title: impl Fn(&Node<T>) -> String + 'a) -> Self {
        self.title = Some(Box::new(title));
        self
    }

    pub(crate) fn label_for(&self, node: &Node<T>) -> Option<String> {
        self.label.as_ref().map(|label| label(node))
    }

    pub(crate) fn title_for(&self, node: &Node<T>) -> Option<String> {
        self.title.as_ref().map(|title| title(node))
    }
}

pub(crate) fn check_extent(name: &'static str, value: f64) -> Result<(), ChartError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidConfig { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_size_subtracts_margins() {
        let size = Margins::uniform(60.0).content_size(640.0, 400.0).unwrap();
        assert_eq!(size, Size::new(520.0, 280.0));
    }

    #[test]
    fn margins_wider_than_the_chart_are_rejected() {
        let margins = Margins {
            left: 50.0,
            right: 60.0,
            ..Margins::ZERO
        };
        assert_eq!(
            margins.content_size(100.0, 100.0),
            Err(ChartError::InvalidConfig {
                name: "margins.horizontal",
                value: 110.0,
            })
        );
        assert!(matches!(
            Margins::ZERO.content_size(f64::NAN, 1.0),
            Err(ChartError::InvalidConfig { name: "width", .. })
        ));
    }
}
