// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node arena: storage, linking, and read-only traversal.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Geometry, Node, NodeId};

/// A single-rooted tree of [`Node`]s.
///
/// Nodes live in an arena indexed by [`NodeId`]. Parents own their children
/// through [`Node::children`]; [`Node::parent`] is a plain back-reference.
///
/// The arena is laid out in pre-order at build time, so the root is
/// [`NodeId::ROOT`] and every node's handle is greater than its parent's.
/// Sorting reorders children lists but never moves nodes in the arena.
#[derive(Clone, Debug)]
pub struct Hierarchy<T> {
    pub(crate) nodes: Vec<Node<T>>,
}

/// A node under construction, before parent links are resolved into children.
pub(crate) struct Draft<T> {
    pub(crate) id: String,
    pub(crate) payload: Option<T>,
    pub(crate) parent: Option<usize>,
}

impl<T> Draft<T> {
    pub(crate) fn new(id: String, payload: Option<T>, parent: Option<usize>) -> Self {
        Self {
            id,
            payload,
            parent,
        }
    }
}

/// Result of linking drafts below a chosen root.
pub(crate) struct Linked<T> {
    pub(crate) hierarchy: Hierarchy<T>,
    /// Drafts that were not reachable from the root, in input order.
    pub(crate) unreachable: Vec<Draft<T>>,
}

impl<T> Hierarchy<T> {
    /// Resolves draft parent links below `root` into a pre-order arena.
    ///
    /// Children keep the relative order of their drafts.
    pub(crate) fn link(drafts: Vec<Draft<T>>, root: usize) -> Linked<T> {
        let n = drafts.len();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (idx, draft) in drafts.iter().enumerate() {
            if let Some(parent) = draft.parent
                && idx != root
            {
                children[parent].push(idx);
            }
        }

        // Pre-order walk from the root to fix the arena order.
        let mut order = Vec::with_capacity(n);
        let mut remap: Vec<Option<usize>> = vec![None; n];
        let mut stack = vec![root];
        while let Some(old) = stack.pop() {
            if remap[old].is_some() {
                continue;
            }
            remap[old] = Some(order.len());
            order.push(old);
            stack.extend(children[old].iter().rev().copied());
        }

        let mut slots: Vec<Option<Draft<T>>> = drafts.into_iter().map(Some).collect();
        let mut nodes: Vec<Node<T>> = Vec::with_capacity(order.len());
        for &old in &order {
            let Some(draft) = slots[old].take() else {
                continue;
            };
            let parent = if old == root {
                None
            } else {
                draft.parent.and_then(|p| remap[p]).map(NodeId::new)
            };
            let depth = parent.map_or(0, |p| nodes[p.index()].depth + 1);
            nodes.push(Node {
                id: draft.id,
                parent,
                children: children[old]
                    .iter()
                    .filter_map(|&c| remap[c])
                    .map(NodeId::new)
                    .collect(),
                depth,
                height: 0,
                value: 0.0,
                payload: draft.payload,
                layout: None,
            });
        }

        // Children always follow their parent, so a reverse sweep sees every
        // child before its parent.
        for idx in (1..nodes.len()).rev() {
            let height = nodes[idx].height + 1;
            if let Some(parent) = nodes[idx].parent {
                let slot = &mut nodes[parent.index()].height;
                *slot = (*slot).max(height);
            }
        }

        Linked {
            hierarchy: Self { nodes },
            unreachable: slots.into_iter().flatten().collect(),
        }
    }

    /// Returns the root handle.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the root node.
    pub fn root_node(&self) -> &Node<T> {
        &self.nodes[0]
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A hierarchy always has a root, so this is always `false`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this hierarchy.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    /// Returns the node for `id`, or `None` if `id` is out of range.
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    /// Children of `id` in their current sibling order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Finds a node by its identifier string.
    ///
    /// This is a linear scan; callers resolving many ids should build their own map.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .map(NodeId::new)
    }

    /// Iterates over all nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId::new(idx), node))
    }

    /// All nodes in breadth-first order, starting at the root.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([NodeId::ROOT]);
        while let Some(id) = queue.pop_front() {
            out.push(id);
            queue.extend(self.children(id).iter().copied());
        }
        out
    }

    /// All nodes in pre-order (parents before children, siblings in order).
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// All nodes in post-order (children before parents, siblings in order).
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut out = self.pre_order_mirrored();
        out.reverse();
        out
    }

    // Pre-order that visits siblings last-to-first; reversed, it is a post-order.
    fn pre_order_mirrored(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().copied());
        }
        out
    }

    /// Leaves in pre-order, i.e. left to right in the current sibling order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.pre_order()
            .into_iter()
            .filter(|&id| self.node(id).is_leaf())
            .collect()
    }

    /// Parent → child pairs in breadth-first order.
    pub fn links(&self) -> Vec<(NodeId, NodeId)> {
        self.descendants()
            .into_iter()
            .flat_map(|id| self.children(id).iter().map(move |&child| (id, child)))
            .collect()
    }

    /// `id` followed by its ancestors up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(Some(id), |&current| self.node(current).parent)
    }

    /// Largest depth of any node.
    pub fn max_depth(&self) -> usize {
        self.nodes[0].height
    }

    /// Records layout geometry for `id`.
    pub fn set_layout(&mut self, id: NodeId, geometry: Geometry) {
        self.nodes[id.index()].layout = Some(geometry);
    }

    /// Discards all layout geometry.
    pub fn clear_layout(&mut self) {
        for node in &mut self.nodes {
            node.layout = None;
        }
    }
}

impl<T> core::ops::Index<NodeId> for Hierarchy<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.node(id)
    }
}
