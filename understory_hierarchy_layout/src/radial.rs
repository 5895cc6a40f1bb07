// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radial tidy-tree layout.
//!
//! This is the Buchheim–Jünger–Leipert linear-time formulation of the
//! Reingold–Tilford algorithm. Each node gets a preliminary position along a
//! single breadth axis in a post-order pass, subtrees are pushed apart along
//! their contours (followed through threads), and a pre-order pass accumulates
//! modifiers into final positions. The breadth axis is then mapped onto
//! `[0, 2π)` and depth onto the radius.
//!
//! [`RadialAlgorithm::Cluster`] instead lays out a dendrogram: leaves are
//! placed one after another on the outer ring and each parent sits at the
//! mean angle of its children.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use understory_hierarchy::{Geometry, Hierarchy, Node, NodeId, Polar};

use crate::error::{LayoutError, check_extent};

/// Angular spacing between neighboring nodes, before normalization.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Separation {
    /// `1` between siblings and `2` between cousins, divided by depth so outer
    /// rings, which have more circumference, pack tighter.
    #[default]
    Radial,
    /// `1` between siblings and `2` between cousins.
    Uniform,
    /// Caller-supplied gap from whether the nodes share a parent and the depth
    /// of the first node.
    Custom(fn(same_parent: bool, depth: usize) -> f64),
}

impl Separation {
    /// Gap between `a` and its neighbor `b`.
    pub fn between<T>(self, a: &Node<T>, b: &Node<T>) -> f64 {
        let same_parent = a.parent() == b.parent();
        let base = if same_parent { 1.0 } else { 2.0 };
        match self {
            Self::Radial => base / usize_to_f64(a.depth().max(1)),
            Self::Uniform => base,
            Self::Custom(f) => f(same_parent, a.depth()),
        }
    }
}

/// How breadth positions and radii are assigned.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum RadialAlgorithm {
    /// Tidy tree: nodes sit on the ring of their depth, and subtrees are packed
    /// as tightly as their contours allow.
    #[default]
    Tidy,
    /// Dendrogram: every leaf sits on the outer ring, and internal nodes sit
    /// on the ring of their height, `(1 - height / root height) × radius`.
    Cluster,
}

impl RadialAlgorithm {
    /// The separation this algorithm is usually paired with.
    ///
    /// Tidy trees use [`Separation::Radial`]; clusters use
    /// [`Separation::Uniform`], since all of their leaves share one ring.
    pub const fn default_separation(self) -> Separation {
        match self {
            Self::Tidy => Separation::Radial,
            Self::Cluster => Separation::Uniform,
        }
    }
}

/// Polar tidy-tree layout.
///
/// Every node receives a [`Geometry::Polar`] with `radius = depth / max_depth
/// × radius` and an angle in `[0, 2π)`. Parents are centered over their
/// children, and neighboring subtrees never overlap. With
/// [`RadialAlgorithm::Cluster`] radii follow height instead, so every leaf
/// lands on the outer ring.
///
/// ```rust
/// use understory_hierarchy::{Hierarchy, Input, split_path};
/// use understory_hierarchy_layout::RadialTreeLayout;
///
/// let mut h = Hierarchy::build(Input::Paths {
///     records: vec!["r/a", "r/b", "r/c"],
///     path: Box::new(|p: &&str| split_path(p)),
/// })
/// .unwrap();
///
/// RadialTreeLayout::new(100.0).layout(&mut h).unwrap();
///
/// for (_, node) in h.iter() {
///     let polar = node.layout().and_then(|g| g.as_polar()).unwrap();
///     assert!(polar.radius <= 100.0);
///     assert!((0.0..std::f64::consts::TAU).contains(&polar.angle));
/// }
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RadialTreeLayout {
    /// Radius of the outermost ring.
    pub radius: f64,
    /// Spacing between neighbors.
    pub separation: Separation,
    /// Tidy tree or cluster.
    pub algorithm: RadialAlgorithm,
}

impl RadialTreeLayout {
    /// A layout of the given outer radius with [`Separation::Radial`].
    pub const fn new(radius: f64) -> Self {
        Self {
            radius,
            separation: Separation::Radial,
            algorithm: RadialAlgorithm::Tidy,
        }
    }

    /// A cluster layout of the given outer radius with [`Separation::Uniform`].
    pub const fn cluster(radius: f64) -> Self {
        Self {
            radius,
            separation: Separation::Uniform,
            algorithm: RadialAlgorithm::Cluster,
        }
    }

    /// Sets the algorithm, keeping the current separation.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: RadialAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the separation.
    #[must_use]
    pub const fn with_separation(mut self, separation: Separation) -> Self {
        self.separation = separation;
        self
    }

    /// Checks that the radius is finite and non-negative.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_extent("radius", self.radius)
    }

    /// Assigns polar coordinates to every node of `hierarchy`.
    pub fn layout<T>(&self, hierarchy: &mut Hierarchy<T>) -> Result<(), LayoutError> {
        let separation = self.separation;
        self.layout_by(hierarchy, |a, b| separation.between(a, b))
    }

    /// Like [`layout`](Self::layout), with a separation closure that can
    /// inspect the nodes (and their payloads) directly.
    ///
    /// The closure is called with neighbors in breadth order and must return
    /// a positive gap.
    pub fn layout_by<T, S>(&self, hierarchy: &mut Hierarchy<T>, separation: S) -> Result<(), LayoutError>
    where
        S: Fn(&Node<T>, &Node<T>) -> f64,
    {
        self.validate()?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "layout_radial",
            nodes = hierarchy.len(),
            radius = self.radius,
            algorithm = ?self.algorithm
        )
        .entered();

        let placed = match self.algorithm {
            RadialAlgorithm::Tidy => self.compute(hierarchy, &separation),
            RadialAlgorithm::Cluster => self.compute_cluster(hierarchy, &separation),
        };
        for (id, polar) in placed {
            hierarchy.set_layout(id, Geometry::Polar(polar));
        }
        Ok(())
    }

    fn compute<T, S>(&self, hierarchy: &Hierarchy<T>, separation: &S) -> Vec<(NodeId, Polar)>
    where
        S: Fn(&Node<T>, &Node<T>) -> f64,
    {
        if hierarchy.len() == 1 {
            return vec![(hierarchy.root(), Polar::new(0.0, 0.0))];
        }

        let mut walker = Walker::new(hierarchy, separation);
        for id in hierarchy.post_order() {
            walker.first_walk(id.index());
        }
        let root = hierarchy.root().index();
        let top = walker.top();
        walker.aux[top].modifier = -walker.aux[root].prelim;
        let order = hierarchy.pre_order();
        let mut x = vec![0.0; hierarchy.len()];
        for &id in &order {
            x[id.index()] = walker.second_walk(id.index());
        }

        // Normalize breadth into angles, leaving half a gap at both ends so
        // the first and last leaves do not meet.
        let (mut left, mut right) = (root, root);
        for &id in &order {
            let i = id.index();
            if x[i] < x[left] {
                left = i;
            }
            if x[i] > x[right] {
                right = i;
            }
        }
        let s = if left == right {
            1.0
        } else {
            separation(&hierarchy[walker.ids[left]], &hierarchy[walker.ids[right]]) / 2.0
        };
        let tx = s - x[left];
        let kx = TAU / (x[right] + s + tx);
        let max_depth = usize_to_f64(hierarchy.max_depth().max(1));

        order
            .into_iter()
            .map(|id| {
                let node = &hierarchy[id];
                let angle = wrap_angle((x[id.index()] + tx) * kx);
                let radius = self.radius * (usize_to_f64(node.depth()) / max_depth);
                (id, Polar::new(angle, radius))
            })
            .collect()
    }
}

impl RadialTreeLayout {
    fn compute_cluster<T, S>(
        &self,
        hierarchy: &Hierarchy<T>,
        separation: &S,
    ) -> Vec<(NodeId, Polar)>
    where
        S: Fn(&Node<T>, &Node<T>) -> f64,
    {
        if hierarchy.len() == 1 {
            return vec![(hierarchy.root(), Polar::new(0.0, 0.0))];
        }

        let mut x = vec![0.0; hierarchy.len()];
        let mut first: Option<NodeId> = None;
        let mut previous: Option<NodeId> = None;
        for id in hierarchy.post_order() {
            let children = hierarchy.children(id);
            x[id.index()] = if children.is_empty() {
                let here = previous.map_or(0.0, |prev| {
                    x[prev.index()] + separation(&hierarchy[id], &hierarchy[prev])
                });
                if first.is_none() {
                    first = Some(id);
                }
                previous = Some(id);
                here
            } else {
                let total: f64 = children.iter().map(|c| x[c.index()]).sum();
                total / usize_to_f64(children.len())
            };
        }

        let root = hierarchy.root();
        let (left, right) = (first.unwrap_or(root), previous.unwrap_or(root));
        let (x0, x1) = if left == right {
            (x[left.index()] - 0.5, x[right.index()] + 0.5)
        } else {
            (
                x[left.index()] - separation(&hierarchy[left], &hierarchy[right]) / 2.0,
                x[right.index()] + separation(&hierarchy[right], &hierarchy[left]) / 2.0,
            )
        };
        let kx = TAU / (x1 - x0);
        let root_height = usize_to_f64(hierarchy[root].height().max(1));

        hierarchy
            .pre_order()
            .into_iter()
            .map(|id| {
                let node = &hierarchy[id];
                let angle = wrap_angle((x[id.index()] - x0) * kx);
                let radius = self.radius * (1.0 - usize_to_f64(node.height()) / root_height);
                (id, Polar::new(angle, radius))
            })
            .collect()
    }
}

/// Per-node scratch state for the tidy-tree walks.
#[derive(Clone, Debug)]
struct Aux {
    /// Parent slot; the root's parent is the synthetic top slot.
    parent: usize,
    /// Position among siblings.
    number: usize,
    /// Default ancestor for apportioning this node's children.
    default_ancestor: Option<usize>,
    /// Greatest uncommon ancestor candidate.
    ancestor: usize,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    /// Contour thread for nodes without children.
    thread: Option<usize>,
}

struct Walker<'a, T, S> {
    hierarchy: &'a Hierarchy<T>,
    separation: &'a S,
    ids: Vec<NodeId>,
    /// Child slots, with the synthetic top slot holding only the root.
    kids: Vec<Vec<usize>>,
    aux: Vec<Aux>,
}

impl<'a, T, S> Walker<'a, T, S>
where
    S: Fn(&Node<T>, &Node<T>) -> f64,
{
    fn new(hierarchy: &'a Hierarchy<T>, separation: &'a S) -> Self {
        let n = hierarchy.len();
        let ids: Vec<NodeId> = hierarchy.iter().map(|(id, _)| id).collect();
        let mut kids: Vec<Vec<usize>> = ids
            .iter()
            .map(|&id| hierarchy.children(id).iter().map(|c| c.index()).collect())
            .collect();
        kids.push(vec![hierarchy.root().index()]);

        let mut aux: Vec<Aux> = (0..=n)
            .map(|i| Aux {
                parent: n,
                number: 0,
                default_ancestor: None,
                ancestor: i,
                prelim: 0.0,
                modifier: 0.0,
                change: 0.0,
                shift: 0.0,
                thread: None,
            })
            .collect();
        for (p, children) in kids.iter().enumerate().take(n) {
            for (number, &c) in children.iter().enumerate() {
                aux[c].parent = p;
                aux[c].number = number;
            }
        }

        Self {
            hierarchy,
            separation,
            ids,
            kids,
            aux,
        }
    }

    fn top(&self) -> usize {
        self.ids.len()
    }

    fn gap(&self, a: usize, b: usize) -> f64 {
        (self.separation)(&self.hierarchy[self.ids[a]], &self.hierarchy[self.ids[b]])
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.kids[v].first().copied().or(self.aux[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.kids[v].last().copied().or(self.aux[v].thread)
    }

    /// Post-order step: preliminary position and subtree separation.
    fn first_walk(&mut self, v: usize) {
        let parent = self.aux[v].parent;
        let number = self.aux[v].number;
        let left_sibling = number.checked_sub(1).map(|i| self.kids[parent][i]);

        if let (Some(&first), Some(&last)) = (self.kids[v].first(), self.kids[v].last()) {
            self.execute_shifts(v);
            let midpoint = (self.aux[first].prelim + self.aux[last].prelim) / 2.0;
            match left_sibling {
                Some(w) => {
                    self.aux[v].prelim = self.aux[w].prelim + self.gap(v, w);
                    self.aux[v].modifier = self.aux[v].prelim - midpoint;
                }
                None => self.aux[v].prelim = midpoint,
            }
        } else if let Some(w) = left_sibling {
            self.aux[v].prelim = self.aux[w].prelim + self.gap(v, w);
        }

        let fallback = self.kids[parent][0];
        let ancestor = self.aux[parent].default_ancestor.unwrap_or(fallback);
        let ancestor = self.apportion(v, left_sibling, ancestor);
        self.aux[parent].default_ancestor = Some(ancestor);
    }

    /// Pre-order step: returns the final breadth position of `v`.
    fn second_walk(&mut self, v: usize) -> f64 {
        let parent_modifier = self.aux[self.aux[v].parent].modifier;
        self.aux[v].modifier += parent_modifier;
        self.aux[v].prelim + parent_modifier
    }

    /// Pushes the subtree at `v` clear of its left siblings' subtrees.
    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };
        // i/o: inside/outside contour; p/m: this subtree / the left forest.
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.kids[self.aux[v].parent][0];
        let mut sip = self.aux[vip].modifier;
        let mut sop = self.aux[vop].modifier;
        let mut sim = self.aux[vim].modifier;
        let mut som = self.aux[vom].modifier;

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vim = im;
            vip = ip;
            vom = om;
            vop = op;
            self.aux[vop].ancestor = v;

            let shift =
                self.aux[vim].prelim + sim - self.aux[vip].prelim - sip + self.gap(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.aux[vim].modifier;
            sip += self.aux[vip].modifier;
            som += self.aux[vom].modifier;
            sop += self.aux[vop].modifier;

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if let Some(im) = next_im
            && self.next_right(vop).is_none()
        {
            self.aux[vop].thread = Some(im);
            self.aux[vop].modifier += sim - sop;
        }
        if let Some(ip) = next_ip
            && self.next_left(vom).is_none()
        {
            self.aux[vom].thread = Some(ip);
            self.aux[vom].modifier += sip - som;
            ancestor = v;
        }
        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.aux[vim].ancestor;
        if self.aux[candidate].parent == self.aux[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    /// Shifts subtree `wp` right by `shift`, spreading the change over the
    /// subtrees between `wm` and `wp`.
    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let between = self.aux[wp].number.saturating_sub(self.aux[wm].number).max(1);
        let change = shift / usize_to_f64(between);
        self.aux[wp].change -= change;
        self.aux[wp].shift += shift;
        self.aux[wm].change += change;
        self.aux[wp].prelim += shift;
        self.aux[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.kids[v].len()).rev() {
            let w = self.kids[v][i];
            let aux = &mut self.aux[w];
            aux.prelim += shift;
            aux.modifier += shift;
            change += aux.change;
            shift += aux.shift + change;
        }
    }
}

/// Maps an angle into `[0, 2π)`.
fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle - TAU * (angle / TAU).floor();
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "depths and sibling counts are far below 2^52"
)]
fn usize_to_f64(n: usize) -> f64 {
    n as f64
}
