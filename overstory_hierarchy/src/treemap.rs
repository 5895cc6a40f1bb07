// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The treemap chart pipeline.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use peniko::Color;
use understory_hierarchy::{Hierarchy, Input, NodeId};
use understory_hierarchy_layout::{Padding, TileStrategy, TreemapLayout};
use understory_selection_bridge::{SelectionBridge, SelectionHost};

use crate::chart::{Encodings, Margins, SiblingOrder};
use crate::color::{OrdinalColors, tableau10};
use crate::error::ChartError;

/// Fill for leaves without a group color.
pub const TREEMAP_FILL: Color = Color::from_rgb8(0xcc, 0xcc, 0xcc);

/// Treemap chart options.
///
/// Defaults: 640 × 400, no margins, 1 unit of padding everywhere, binary
/// tiling, rounded edges, siblings sorted by descending value, the
/// [`tableau10`] palette at 60% opacity for grouped leaves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct TreemapChart {
    /// Outer width.
    pub width: f64,
    /// Outer height.
    pub height: f64,
    /// Space around the treemap.
    pub margins: Margins,
    /// Padding around and between cells.
    pub padding: Padding,
    /// Tiling strategy.
    pub tile: TileStrategy,
    /// Snap cell edges to whole units.
    pub round: bool,
    /// Sibling order before layout.
    pub order: SiblingOrder,
    /// Group keys that take the first palette entries, in order.
    pub domain: Option<Vec<String>>,
    /// Colors for group keys.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_palette"))]
    pub palette: Vec<Color>,
    /// Fill for leaves without a group color.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_fill"))]
    pub fill: Color,
    /// Opacity of group colors, in `[0, 1]`.
    pub group_opacity: f32,
}

#[cfg(feature = "serde")]
fn default_palette() -> Vec<Color> {
    tableau10().to_vec()
}

#[cfg(feature = "serde")]
fn default_fill() -> Color {
    TREEMAP_FILL
}

impl Default for TreemapChart {
    fn default() -> Self {
        Self::new(640.0, 400.0)
    }
}

impl TreemapChart {
    /// A `width` × `height` chart with every other option at its default.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::ZERO,
            padding: Padding::uniform(1.0),
            tile: TileStrategy::Binary,
            round: true,
            order: SiblingOrder::DescendingValue,
            domain: None,
            palette: tableau10().to_vec(),
            fill: TREEMAP_FILL,
            group_opacity: 0.6,
        }
    }

    /// The area left for the treemap inside the margins.
    pub fn content_size(&self) -> Result<Size, ChartError> {
        self.margins.content_size(self.width, self.height)
    }

    /// The validated layout for the content area.
    pub fn layout(&self) -> Result<TreemapLayout, ChartError> {
        let size = self.content_size()?;
        let layout = TreemapLayout::new(size.width, size.height)
            .with_padding(self.padding)
            .with_tile(self.tile)
            .with_round(self.round);
        layout.validate()?;
        Ok(layout)
    }

    /// Checks every option.
    pub fn validate(&self) -> Result<(), ChartError> {
        self.layout()?;
        if !(0.0..=1.0).contains(&self.group_opacity) {
            return Err(ChartError::InvalidConfig {
                name: "group_opacity",
                value: f64::from(self.group_opacity),
            });
        }
        Ok(())
    }

    /// Builds, aggregates, colors, sorts, and lays out `input`.
    ///
    /// Marks are produced for the leaves in tree order as built, before
    /// sorting, so their order does not depend on the sibling order option.
    /// When no title encoding is given, a leaf's title is its label.
    pub fn run<T>(
        &self,
        input: Input<'_, T>,
        encodings: &Encodings<'_, T>,
    ) -> Result<TreemapFrame<T>, ChartError> {
        self.validate()?;
        let layout = self.layout()?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "treemap_chart",
            width = self.width,
            height = self.height,
            tile = %self.tile,
        )
        .entered();

        let mut hierarchy = Hierarchy::build(input)?;
        hierarchy.aggregate(encodings.value.as_deref());

        let colors = encodings.group.as_deref().map(|group| {
            OrdinalColors::assign(&hierarchy, group, self.domain.as_deref(), &self.palette)
        });
        let mut marks: Vec<TreemapMark> = hierarchy
            .leaves()
            .into_iter()
            .map(|id| {
                let node = &hierarchy[id];
                let label = encodings.label_for(node);
                let title = encodings.title_for(node).or_else(|| label.clone());
                let color = colors
                    .as_ref()
                    .and_then(|colors| colors.color(id))
                    .map_or(self.fill, |color| color.with_alpha(self.group_opacity));
                TreemapMark {
                    node: id,
                    rect: Rect::ZERO,
                    color,
                    label,
                    title,
                }
            })
            .collect();

        self.order.apply(&mut hierarchy);
        layout.layout(&mut hierarchy)?;

        let origin = Point::new(self.margins.left, self.margins.top);
        for mark in &mut marks {
            if let Some(rect) = hierarchy[mark.node].layout().and_then(|g| g.as_rect()) {
                mark.rect = rect + origin.to_vec2();
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(marks = marks.len(), "treemap frame ready");

        Ok(TreemapFrame {
            hierarchy,
            origin,
            marks,
            colors,
        })
    }
}

/// One drawable treemap cell.
#[derive(Clone, Debug, PartialEq)]
pub struct TreemapMark {
    /// The leaf this cell shows.
    pub node: NodeId,
    /// The cell in chart coordinates.
    pub rect: Rect,
    /// Fill color.
    pub color: Color,
    /// Visible text; lines are separated by `\n`.
    pub label: Option<String>,
    /// Hover text.
    pub title: Option<String>,
}

/// A laid-out treemap, ready to draw.
#[derive(Debug)]
pub struct TreemapFrame<T> {
    /// The laid-out tree. Node rectangles are relative to `origin`.
    pub hierarchy: Hierarchy<T>,
    /// Top-left corner of the content area.
    pub origin: Point,
    /// One mark per leaf, in tree order as built.
    pub marks: Vec<TreemapMark>,
    /// The group coloring, if a group encoding was given.
    pub colors: Option<OrdinalColors<String, Color>>,
}

impl<T> TreemapFrame<T> {
    /// The leaf whose cell contains `point`, in chart coordinates.
    ///
    /// Cells own their top and left edges. Right and bottom edges that no
    /// other cell owns, such as the edge of the content area, still hit.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.marks
            .iter()
            .find(|mark| mark.rect.contains(point))
            .or_else(|| {
                self.marks.iter().find(|mark| {
                    let r = mark.rect;
                    (r.x0..=r.x1).contains(&point.x) && (r.y0..=r.y1).contains(&point.y)
                })
            })
            .map(|mark| mark.node)
    }

    /// Forwards a click at `point` to `bridge`.
    ///
    /// Returns `true` if a request was dispatched.
    pub fn click<M, F, H>(&self, point: Point, bridge: &SelectionBridge<M>, host: &mut H) -> bool
    where
        M: Fn(&T) -> F,
        H: SelectionHost<F> + ?Sized,
    {
        self.hit_test(point)
            .is_some_and(|id| bridge.on_click(&self.hierarchy[id], host))
    }

    /// Forwards a double click at `point` to `bridge`.
    ///
    /// Returns `true` if a request was dispatched.
    pub fn double_click<M, F, H>(
        &self,
        point: Point,
        bridge: &SelectionBridge<M>,
        host: &mut H,
    ) -> bool
    where
        M: Fn(&T) -> F,
        H: SelectionHost<F> + ?Sized,
    {
        self.hit_test(point)
            .is_some_and(|id| bridge.on_double_click(&self.hierarchy[id], host))
    }
}
