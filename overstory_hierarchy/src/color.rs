// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordinal color assignment for leaf groups.

use alloc::vec;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use peniko::Color;
use understory_hierarchy::{Hierarchy, NodeId};

/// The ten-color Tableau palette, the default for categorical groups.
pub const fn tableau10() -> [Color; 10] {
    [
        Color::from_rgb8(0x4e, 0x79, 0xa7),
        Color::from_rgb8(0xf2, 0x8e, 0x2c),
        Color::from_rgb8(0xe1, 0x57, 0x59),
        Color::from_rgb8(0x76, 0xb7, 0xb2),
        Color::from_rgb8(0x59, 0xa1, 0x4f),
        Color::from_rgb8(0xed, 0xc9, 0x49),
        Color::from_rgb8(0xaf, 0x7a, 0xa1),
        Color::from_rgb8(0xff, 0x9d, 0xa7),
        Color::from_rgb8(0x9c, 0x75, 0x5f),
        Color::from_rgb8(0xba, 0xb0, 0xab),
    ]
}

/// An ordinal mapping from group keys to palette entries, applied to the
/// leaves of one hierarchy.
///
/// The domain is the ordered set of distinct keys. Key `i` of the domain gets
/// palette entry `i % palette.len()`, so the palette cycles when there are
/// more keys than colors.
///
/// ```rust
/// use understory_hierarchy::{Hierarchy, Input, split_path};
/// use overstory_hierarchy::OrdinalColors;
///
/// let h = Hierarchy::build(Input::Paths {
///     records: vec!["fruit/apple", "veg/kale", "fruit/pear"],
///     path: Box::new(|p: &&str| split_path(p)),
/// })
/// .unwrap();
///
/// let colors = OrdinalColors::assign(&h, |p: &&str| split_path(p)[0].clone(), None, &["red", "green"]);
/// assert_eq!(colors.domain(), ["fruit", "veg"]);
///
/// let pear = h.find("/fruit/pear").unwrap();
/// assert_eq!(colors.color(pear), Some(&"red"));
/// ```
#[derive(Clone, Debug)]
pub struct OrdinalColors<K, C> {
    domain: Vec<K>,
    palette: Vec<C>,
    slots: HashMap<K, usize>,
    leaves: Vec<(NodeId, usize)>,
    by_node: Vec<Option<usize>>,
}

impl<K, C> OrdinalColors<K, C>
where
    K: Eq + Hash + Clone,
    C: Clone,
{
    /// Assigns a color to every leaf of `hierarchy` from the key `group`
    /// returns for the leaf's payload.
    ///
    /// Without an explicit `domain`, keys are ordered by first appearance
    /// among the leaves in their current order. With one, its keys come first
    /// and any other key a leaf produces is appended in first-seen order.
    /// Leaves without a payload get no color, and neither does anything when
    /// `palette` is empty.
    pub fn assign<T, G>(
        hierarchy: &Hierarchy<T>,
        mut group: G,
        domain: Option<&[K]>,
        palette: &[C],
    ) -> Self
    where
        G: FnMut(&T) -> K,
    {
        let mut colors = Self {
            domain: Vec::new(),
            palette: palette.to_vec(),
            slots: HashMap::new(),
            leaves: Vec::new(),
            by_node: vec![None; hierarchy.len()],
        };
        for key in domain.into_iter().flatten() {
            colors.intern(key.clone());
        }
        for id in hierarchy.leaves() {
            let Some(payload) = hierarchy[id].payload() else {
                continue;
            };
            let slot = colors.intern(group(payload));
            colors.leaves.push((id, slot));
            colors.by_node[id.index()] = Some(slot);
        }
        colors
    }

    fn intern(&mut self, key: K) -> usize {
        if let Some(&slot) = self.slots.get(&key) {
            return slot;
        }
        let slot = self.domain.len();
        self.slots.insert(key.clone(), slot);
        self.domain.push(key);
        slot
    }
}

impl<K, C> OrdinalColors<K, C>
where
    K: Eq + Hash,
{
    /// The distinct group keys, in palette order.
    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    /// The palette colors are drawn from.
    pub fn palette(&self) -> &[C] {
        &self.palette
    }

    /// The color for a group key, if it is in the domain.
    pub fn color_for(&self, key: &K) -> Option<&C> {
        self.slots.get(key).and_then(|&slot| self.palette_entry(slot))
    }

    /// The color assigned to `node`, if it is a colored leaf.
    pub fn color(&self, node: NodeId) -> Option<&C> {
        self.by_node
            .get(node.index())
            .copied()
            .flatten()
            .and_then(|slot| self.palette_entry(slot))
    }

    /// Every colored leaf with its color, in the leaf order seen by
    /// [`assign`](Self::assign).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &C)> + '_ {
        self.leaves
            .iter()
            .filter_map(|&(id, slot)| Some((id, self.palette_entry(slot)?)))
    }

    fn palette_entry(&self, slot: usize) -> Option<&C> {
        if self.palette.is_empty() {
            None
        } else {
            self.palette.get(slot % self.palette.len())
        }
    }
}
