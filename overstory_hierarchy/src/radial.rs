// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The radial tree chart pipeline.

use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::PI;

use kurbo::{Point, Size};
use peniko::Color;
use understory_hierarchy::{Hierarchy, Input, NodeId, Polar};
use understory_hierarchy_layout::{RadialAlgorithm, RadialTreeLayout, Separation};
use understory_selection_bridge::{SelectionBridge, SelectionHost};

use crate::chart::{Encodings, Margins, SiblingOrder, check_extent};
use crate::error::ChartError;

/// Fill for leaf dots.
pub const RADIAL_LEAF_FILL: Color = Color::from_rgb8(0x99, 0x99, 0x99);

/// Fill for internal dots, also the link stroke.
pub const RADIAL_BRANCH_FILL: Color = Color::from_rgb8(0x55, 0x55, 0x55);

/// Radial tree chart options.
///
/// Defaults: 640 × 400, margins of 60, a radius filling the smaller side of
/// the content area, a tidy tree with the algorithm's usual separation, input
/// sibling order, 3 unit dots.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct RadialTreeChart {
    /// Outer width.
    pub width: f64,
    /// Outer height.
    pub height: f64,
    /// Space around the tree.
    pub margins: Margins,
    /// Outer radius; half the smaller content side when `None`.
    pub radius: Option<f64>,
    /// Tidy tree or cluster.
    pub algorithm: RadialAlgorithm,
    /// Angular spacing between neighbors; the algorithm's usual separation
    /// when `None`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub separation: Option<Separation>,
    /// Sibling order before layout.
    pub order: SiblingOrder,
    /// Radius of each node's dot.
    pub node_radius: f64,
    /// Fill for leaf dots.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_leaf_fill"))]
    pub leaf_fill: Color,
    /// Fill for internal dots and links.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_branch_fill"))]
    pub branch_fill: Color,
}

#[cfg(feature = "serde")]
fn default_leaf_fill() -> Color {
    RADIAL_LEAF_FILL
}

#[cfg(feature = "serde")]
fn default_branch_fill() -> Color {
    RADIAL_BRANCH_FILL
}

impl Default for RadialTreeChart {
    fn default() -> Self {
        Self::new(640.0, 400.0)
    }
}

impl RadialTreeChart {
    /// A `width` × `height` chart with every other option at its default.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::uniform(60.0),
            radius: None,
            algorithm: RadialAlgorithm::Tidy,
            separation: None,
            order: SiblingOrder::Input,
            node_radius: 3.0,
            leaf_fill: RADIAL_LEAF_FILL,
            branch_fill: RADIAL_BRANCH_FILL,
        }
    }

    /// The area left for the tree inside the margins.
    pub fn content_size(&self) -> Result<Size, ChartError> {
        self.margins.content_size(self.width, self.height)
    }

    /// The outer radius in effect.
    pub fn resolved_radius(&self) -> Result<f64, ChartError> {
        let size = self.content_size()?;
        Ok(self
            .radius
            .unwrap_or_else(|| size.width.min(size.height) / 2.0))
    }

    /// The validated layout for the resolved radius.
    pub fn layout(&self) -> Result<RadialTreeLayout, ChartError> {
        let layout = RadialTreeLayout::new(self.resolved_radius()?)
            .with_algorithm(self.algorithm)
            .with_separation(
                self.separation
                    .unwrap_or_else(|| self.algorithm.default_separation()),
            );
        layout.validate()?;
        Ok(layout)
    }

    /// Checks every option.
    pub fn validate(&self) -> Result<(), ChartError> {
        self.layout()?;
        check_extent("node_radius", self.node_radius)
    }

    /// Builds, aggregates, sorts, and lays out `input`.
    ///
    /// Values are aggregated so that [`SiblingOrder::DescendingValue`] has
    /// something to sort by; the layout itself ignores them. Marks are
    /// produced for every node in breadth-first order.
    pub fn run<T>(
        &self,
        input: Input<'_, T>,
        encodings: &Encodings<'_, T>,
    ) -> Result<RadialFrame<T>, ChartError> {
        self.validate()?;
        let layout = self.layout()?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "radial_chart",
            width = self.width,
            height = self.height,
            radius = layout.radius,
        )
        .entered();

        let mut hierarchy = Hierarchy::build(input)?;
        hierarchy.aggregate(encodings.value.as_deref());
        self.order.apply(&mut hierarchy);
        layout.layout(&mut hierarchy)?;

        let center = Point::new(
            self.margins.left + layout.radius,
            self.margins.top + layout.radius,
        );
        let marks: Vec<RadialMark> = hierarchy
            .descendants()
            .into_iter()
            .map(|id| {
                let node = &hierarchy[id];
                let polar = node.layout().and_then(|g| g.as_polar()).unwrap_or_default();
                let leaf = node.is_leaf();
                RadialMark {
                    node: id,
                    polar,
                    point: polar.to_point(center),
                    fill: if leaf { self.leaf_fill } else { self.branch_fill },
                    anchor: LabelAnchor::for_node(polar.angle, leaf),
                    flipped: polar.angle >= PI,
                    label: encodings.label_for(node),
                    title: encodings.title_for(node),
                }
            })
            .collect();
        let links = hierarchy.links();

        #[cfg(feature = "tracing")]
        tracing::debug!(marks = marks.len(), links = links.len(), "radial frame ready");

        Ok(RadialFrame {
            hierarchy,
            center,
            node_radius: self.node_radius,
            marks,
            links,
        })
    }
}

/// Which end of a radial label sits at its node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LabelAnchor {
    /// The label starts at the node and runs outward.
    Start,
    /// The label ends at the node.
    End,
}

impl LabelAnchor {
    /// Anchor for a node at `angle`.
    ///
    /// Leaf labels point away from the center and internal labels toward it,
    /// and both are mirrored on the left half so text never reads upside down.
    pub fn for_node(angle: f64, leaf: bool) -> Self {
        if (angle < PI) == leaf {
            Self::Start
        } else {
            Self::End
        }
    }
}

/// One drawable radial tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialMark {
    /// The node this dot shows.
    pub node: NodeId,
    /// Layout position around the center.
    pub polar: Polar,
    /// Dot center in chart coordinates.
    pub point: Point,
    /// Dot fill.
    pub fill: Color,
    /// Label alignment.
    pub anchor: LabelAnchor,
    /// The label is rotated a half turn to stay upright.
    pub flipped: bool,
    /// Visible text.
    pub label: Option<String>,
    /// Hover text.
    pub title: Option<String>,
}

/// A laid-out radial tree, ready to draw.
#[derive(Debug)]
pub struct RadialFrame<T> {
    /// The laid-out tree.
    pub hierarchy: Hierarchy<T>,
    /// The tree's center in chart coordinates.
    pub center: Point,
    /// Radius of each node's dot.
    pub node_radius: f64,
    /// One mark per node, breadth-first.
    pub marks: Vec<RadialMark>,
    /// Parent → child links, breadth-first.
    pub links: Vec<(NodeId, NodeId)>,
}

impl<T> RadialFrame<T> {
    /// The node whose dot is nearest to `point`, if any dot contains it.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.marks
            .iter()
            .map(|mark| (mark.node, mark.point.distance(point)))
            .filter(|&(_, distance)| distance <= self.node_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node)
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
