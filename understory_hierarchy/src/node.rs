// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node handles, per-node data, and layout geometry.

use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::FRAC_PI_2;

use kurbo::{Point, Rect, Vec2};

/// Identifier for a node in a [`Hierarchy`](crate::Hierarchy).
///
/// This is a small, copyable index handle. It is only meaningful for the
/// hierarchy that produced it; hierarchies are rebuilt per update, so handles
/// never outlive the frame they were created for.
///
/// The root is always `NodeId(0)`, and a node's handle is always greater than
/// its parent's.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The root of every hierarchy.
    pub const ROOT: Self = Self(0);

    #[allow(
        clippy::cast_possible_truncation,
        reason = "hierarchies with more than u32::MAX nodes are not supported"
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    /// Returns the arena index of this node.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Polar coordinates assigned by the radial tree layout.
///
/// `angle` is in radians in `[0, 2π)`, measured clockwise from "up" when
/// converted with [`Polar::to_point`]. `radius` is in layout length units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Polar {
    /// Angle in radians.
    pub angle: f64,
    /// Distance from the layout center.
    pub radius: f64,
}

impl Polar {
    /// Creates a new polar coordinate.
    pub const fn new(angle: f64, radius: f64) -> Self {
        Self { angle, radius }
    }

    /// Converts to a Cartesian point around `center`.
    ///
    /// Angle `0` points toward negative y (screen "up"), matching a radial tree
    /// drawn with `rotate(angle - 90°) translate(radius, 0)`.
    ///
    /// ```rust
    /// use kurbo::Point;
    /// use understory_hierarchy::Polar;
    ///
    /// let p = Polar::new(0.0, 10.0).to_point(Point::ORIGIN);
    /// assert!(p.x.abs() < 1e-9);
    /// assert!((p.y + 10.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn to_point(self, center: Point) -> Point {
        center + Vec2::from_angle(self.angle - FRAC_PI_2) * self.radius
    }
}

/// Strategy-specific geometry assigned to a node by a layout pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Geometry {
    /// Radial tree placement.
    Polar(Polar),
    /// Treemap cell (`x0`, `y0`, `x1`, `y1`).
    Rect(Rect),
}

impl Geometry {
    /// Returns the polar placement, if this is radial geometry.
    pub fn as_polar(&self) -> Option<Polar> {
        match self {
            Self::Polar(p) => Some(*p),
            Self::Rect(_) => None,
        }
    }

    /// Returns the rectangle, if this is treemap geometry.
    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(*r),
            Self::Polar(_) => None,
        }
    }
}

/// A node of a [`Hierarchy`](crate::Hierarchy).
///
/// Nodes are read through shared references only; the pipeline stages
/// (aggregation, sorting, layout) mutate them through the owning hierarchy.
#[derive(Clone, Debug)]
pub struct Node<T> {
    pub(crate) id: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) depth: usize,
    pub(crate) height: usize,
    pub(crate) value: f64,
    pub(crate) payload: Option<T>,
    pub(crate) layout: Option<Geometry>,
}

impl<T> Node<T> {
    /// Stable identifier of this node.
    ///
    /// Depending on how the hierarchy was built this is the record's explicit
    /// id, the escaped path from the root (see [`join_path`](crate::join_path)),
    /// or a synthesized child-index path.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The parent of this node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in their current sibling order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Distance from the root (`0` at the root).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Longest distance from this node down to a leaf (`0` for leaves).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Aggregated value; `0.0` until an aggregation pass has run.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The input record this node was built from.
    ///
    /// `None` only for ancestors imputed from record paths.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Geometry from the most recent layout pass, if any.
    pub fn layout(&self) -> Option<Geometry> {
        self.layout
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
