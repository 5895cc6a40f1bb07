// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangular treemap layout.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;
use understory_hierarchy::{Geometry, Hierarchy};

use crate::error::{LayoutError, check_extent};
use crate::tile::TileStrategy;

/// Padding applied around and between treemap cells.
///
/// The outer sides inset a parent's children from the parent's edges. `inner`
/// separates siblings: each child cell shrinks by half of it on every side.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Padding {
    /// Inset from a parent's top edge.
    pub top: f64,
    /// Inset from a parent's right edge.
    pub right: f64,
    /// Inset from a parent's bottom edge.
    pub bottom: f64,
    /// Inset from a parent's left edge.
    pub left: f64,
    /// Gap between adjacent siblings.
    pub inner: f64,
}

impl Padding {
    /// No padding at all.
    pub const ZERO: Self = Self::uniform(0.0);

    /// The same padding on all four sides and between siblings.
    pub const fn uniform(padding: f64) -> Self {
        Self {
            top: padding,
            right: padding,
            bottom: padding,
            left: padding,
            inner: padding,
        }
    }

    fn validate(&self) -> Result<(), LayoutError> {
        check_extent("padding.top", self.top)?;
        check_extent("padding.right", self.right)?;
        check_extent("padding.bottom", self.bottom)?;
        check_extent("padding.left", self.left)?;
        check_extent("padding.inner", self.inner)
    }
}

/// Recursive space-partitioning layout.
///
/// Every node receives a [`Geometry::Rect`]. The root covers
/// `(0, 0)..(width, height)`; each internal node's rectangle, minus its
/// padding, is divided among its children by [`tile`](Self::tile) in their
/// current sibling order.
///
/// Values must be aggregated first. Zero-valued subtrees get zero-area cells.
///
/// ```rust
/// use understory_hierarchy::{Hierarchy, Input, split_path};
/// use understory_hierarchy_layout::TreemapLayout;
///
/// let mut h = Hierarchy::build(Input::Paths {
///     records: vec![("root/a", 3.0), ("root/b", 1.0)],
///     path: Box::new(|r: &(&str, f64)| split_path(r.0)),
/// })
/// .unwrap();
/// h.sum(|r| Some(r.1));
///
/// TreemapLayout::new(100.0, 100.0).layout(&mut h).unwrap();
///
/// let a = h.find("/root/a").unwrap();
/// let cell = h[a].layout().and_then(|g| g.as_rect()).unwrap();
/// assert_eq!(cell.area(), 7500.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TreemapLayout {
    /// Width of the area to fill.
    pub width: f64,
    /// Height of the area to fill.
    pub height: f64,
    /// Outer and inner padding.
    pub padding: Padding,
    /// How children divide their parent's rectangle.
    pub tile: TileStrategy,
    /// Snap every edge to whole units after layout.
    pub round: bool,
}

impl Default for TreemapLayout {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl TreemapLayout {
    /// A `width` × `height` treemap with binary tiling, no padding, and no rounding.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: Padding::ZERO,
            tile: TileStrategy::Binary,
            round: false,
        }
    }

    /// Sets the padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the tile strategy.
    #[must_use]
    pub const fn with_tile(mut self, tile: TileStrategy) -> Self {
        self.tile = tile;
        self
    }

    /// Sets whether edges snap to whole units.
    #[must_use]
    pub const fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Checks that the size and padding are finite and non-negative.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_extent("width", self.width)?;
        check_extent("height", self.height)?;
        self.padding.validate()
    }

    /// Assigns a rectangle to every node of `hierarchy`.
    ///
    /// Any geometry from a previous pass is replaced.
    pub fn layout<T>(&self, hierarchy: &mut Hierarchy<T>) -> Result<(), LayoutError> {
        self.validate()?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "layout_treemap",
            nodes = hierarchy.len(),
            tile = self.tile.name(),
            width = self.width,
            height = self.height,
        )
        .entered();

        let rects = self.compute(hierarchy);
        for id in hierarchy.pre_order() {
            let rect = rects[id.index()];
            let rect = if self.round { rect.round() } else { rect };
            hierarchy.set_layout(id, Geometry::Rect(rect));
        }
        Ok(())
    }

    /// Computes cells indexed by arena position.
    fn compute<T>(&self, hierarchy: &Hierarchy<T>) -> Vec<Rect> {
        let mut rects = vec![Rect::ZERO; hierarchy.len()];
        rects[hierarchy.root().index()] = Rect::new(0.0, 0.0, self.width, self.height);

        let half_inner = self.padding.inner / 2.0;
        let mut values = Vec::new();
        let mut cells = Vec::new();
        for id in hierarchy.pre_order() {
            let node = &hierarchy[id];
            // Siblings are separated by half the inner padding each; the root
            // has no siblings.
            let own = if node.is_root() {
                rects[id.index()]
            } else {
                inset(rects[id.index()], half_inner, half_inner, half_inner, half_inner)
            };
            rects[id.index()] = own;
            if node.is_leaf() {
                continue;
            }

            // Children re-expand by half the inner padding, so the net inset
            // from this node's edges is exactly the outer padding.
            let p = &self.padding;
            let inner = inset(
                own,
                p.top - half_inner,
                p.right - half_inner,
                p.bottom - half_inner,
                p.left - half_inner,
            );

            values.clear();
            values.extend(node.children().iter().map(|&c| hierarchy[c].value()));
            cells.clear();
            self.tile.tile(node.depth(), &values, inner, &mut cells);
            for (&child, &cell) in node.children().iter().zip(&cells) {
                rects[child.index()] = cell;
            }
        }
        rects
    }
}

/// Shrinks `rect` by the given amounts, collapsing inverted axes to their midline.
fn inset(rect: Rect, top: f64, right: f64, bottom: f64, left: f64) -> Rect {
    let (mut x0, mut y0) = (rect.x0 + left, rect.y0 + top);
    let (mut x1, mut y1) = (rect.x1 - right, rect.y1 - bottom);
    if x1 < x0 {
        let mid = (x0 + x1) / 2.0;
        x0 = mid;
        x1 = mid;
    }
    if y1 < y0 {
        let mid = (y0 + y1) / 2.0;
        y0 = mid;
        y1 = mid;
    }
    Rect::new(x0, y0, x1, y1)
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::ToString;
    use alloc::vec;

    use understory_hierarchy::{Input, NodeId};

    use super::*;

    type Row = (&'static str, Option<&'static str>, f64);

    fn tree(rows: Vec<Row>) -> Hierarchy<Row> {
        let mut h = Hierarchy::build(Input::Stratified {
            records: rows,
            id: Box::new(|r: &Row| Some(r.0.to_string())),
            parent_id: Box::new(|r: &Row| r.1.map(str::to_string)),
        })
        .unwrap();
        h.sum(|r| Some(r.2));
        h
    }

    fn rect_of(h: &Hierarchy<Row>, name: &str) -> Rect {
        let id: NodeId = h.find(name).unwrap();
        h[id].layout().and_then(|g| g.as_rect()).unwrap()
    }

    #[test]
    fn root_covers_the_area_and_children_share_it() {
        let mut h = tree(vec![
            ("r", None, 0.0),
            ("a", Some("r"), 1.0),
            ("b", Some("r"), 1.0),
        ]);
        TreemapLayout::new(200.0, 100.0)
            .with_tile(TileStrategy::Dice)
            .layout(&mut h)
            .unwrap();
        assert_eq!(rect_of(&h, "r"), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(rect_of(&h, "a"), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(rect_of(&h, "b"), Rect::new(100.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn uniform_padding_insets_children_and_separates_siblings() {
        let mut h = tree(vec![
            ("r", None, 0.0),
            ("a", Some("r"), 1.0),
            ("b", Some("r"), 1.0),
        ]);
        TreemapLayout::new(102.0, 52.0)
            .with_padding(Padding::uniform(2.0))
            .with_tile(TileStrategy::Dice)
            .layout(&mut h)
            .unwrap();
        // Children tile (1, 1)..(101, 51), then each shrinks by 1 per side.
        assert_eq!(rect_of(&h, "a"), Rect::new(2.0, 2.0, 50.0, 50.0));
        assert_eq!(rect_of(&h, "b"), Rect::new(52.0, 2.0, 100.0, 50.0));
    }

    #[test]
    fn each_side_pads_independently() {
        let mut h = tree(vec![
            ("r", None, 0.0),
            ("a", Some("r"), 1.0),
            ("b", Some("r"), 1.0),
        ]);
        let padding = Padding {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
            inner: 2.0,
        };
        TreemapLayout::new(100.0, 60.0)
            .with_padding(padding)
            .with_tile(TileStrategy::Dice)
            .layout(&mut h)
            .unwrap();
        // Content spans (4, 1)..(98, 57); siblings are 2 apart.
        assert_eq!(rect_of(&h, "a"), Rect::new(4.0, 1.0, 50.0, 57.0));
        assert_eq!(rect_of(&h, "b"), Rect::new(52.0, 1.0, 98.0, 57.0));
    }

    #[test]
    fn oversized_padding_collapses_to_midline() {
        let mut h = tree(vec![("r", None, 0.0), ("a", Some("r"), 1.0)]);
        TreemapLayout::new(10.0, 10.0)
            .with_padding(Padding::uniform(30.0))
            .layout(&mut h)
            .unwrap();
        let a = rect_of(&h, "a");
        assert_eq!(a.area(), 0.0);
        assert_eq!(a.center(), kurbo::Point::new(5.0, 5.0));
    }

    #[test]
    fn round_snaps_edges() {
        let mut h = tree(vec![
            ("r", None, 0.0),
            ("a", Some("r"), 1.0),
            ("b", Some("r"), 1.0),
            ("c", Some("r"), 1.0),
        ]);
        TreemapLayout::new(100.0, 10.0)
            .with_tile(TileStrategy::Dice)
            .with_round(true)
            .layout(&mut h)
            .unwrap();
        for name in ["a", "b", "c"] {
            let r = rect_of(&h, name);
            assert_eq!(r, r.round());
        }
        assert_eq!(rect_of(&h, "b"), Rect::new(33.0, 0.0, 67.0, 10.0));
    }

    #[test]
    fn zero_valued_parent_gives_degenerate_children() {
        let mut h = tree(vec![
            ("r", None, 0.0),
            ("a", Some("r"), 0.0),
            ("b", Some("r"), 0.0),
        ]);
        TreemapLayout::new(10.0, 10.0).layout(&mut h).unwrap();
        assert_eq!(rect_of(&h, "a").area(), 0.0);
        assert_eq!(rect_of(&h, "b").area(), 0.0);
    }

    #[test]
    fn invalid_extents_are_rejected() {
        let mut h = tree(vec![("r", None, 1.0)]);
        assert_eq!(
            TreemapLayout::new(-1.0, 10.0).layout(&mut h),
            Err(LayoutError::InvalidExtent {
                name: "width",
                value: -1.0
            })
        );
        assert!(matches!(
            TreemapLayout::new(1.0, f64::NAN).layout(&mut h),
            Err(LayoutError::InvalidExtent { name: "height", .. })
        ));
        assert!(
            TreemapLayout::new(1.0, 1.0)
                .with_padding(Padding {
                    inner: -1.0,
                    ..Padding::ZERO
                })
                .layout(&mut h)
                .is_err()
        );
        assert!(h.root_node().layout().is_none());
    }
}
