// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable sibling ordering.

use core::cmp::Ordering;

use crate::hierarchy::Hierarchy;
use crate::node::Node;

impl<T> Hierarchy<T> {
    /// Reorders every node's children with `compare`.
    ///
    /// The sort is stable: siblings that compare equal keep their previous
    /// relative order. Only children lists change; [`NodeId`](crate::NodeId)s
    /// stay valid.
    pub fn sort_by<F>(&mut self, mut compare: F) -> &mut Self
    where
        F: FnMut(&Node<T>, &Node<T>) -> Ordering,
    {
        for idx in 0..self.nodes.len() {
            if self.nodes[idx].children.len() < 2 {
                continue;
            }
            let mut children = core::mem::take(&mut self.nodes[idx].children);
            children.sort_by(|&a, &b| compare(&self.nodes[a.index()], &self.nodes[b.index()]));
            self.nodes[idx].children = children;
        }
        self
    }

    /// Like [`sort_by`](Self::sort_by), leaving the order unchanged for `None`.
    pub fn sort<F>(&mut self, compare: Option<F>) -> &mut Self
    where
        F: FnMut(&Node<T>, &Node<T>) -> Ordering,
    {
        match compare {
            Some(compare) => self.sort_by(compare),
            None => self,
        }
    }
}

/// Orders larger values first.
///
/// Values that cannot be compared (NaN) are treated as equal.
pub fn descending_value<T>(a: &Node<T>, b: &Node<T>) -> Ordering {
    b.value().partial_cmp(&a.value()).unwrap_or(Ordering::Equal)
}

/// Orders taller subtrees first.
pub fn descending_height<T>(a: &Node<T>, b: &Node<T>) -> Ordering {
    b.height().cmp(&a.height())
}

#[cfg(test)]
    use alloc::borrow::ToOwned;
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use alloc::{format, vec};

    use super::*;
    use crate::{Input, split_path};

    fn flat(records: Vec<(&'static str, f64)>) -> Hierarchy<(&'static str, f64)> {
        let mut h = Hierarchy::build(Input::Paths {
            records,
            path: Box::new(|r: &(&'static str, f64)| split_path(r.0)),
        })
        .unwrap();
        h.sum(|r| Some(r.1));
        h
    }

    fn child_names<T>(h: &Hierarchy<T>) -> Vec<&str> {
        h.children(h.root())
            .iter()
            .map(|&c| h[c].id().rsplit('/').next().unwrap_or_default())
            .collect()
    }

    #[test]
    fn descending_value_is_stable() {
        let mut h = flat(vec![
            ("r/a", 1.0),
            ("r/b", 3.0),
            ("r/c", 1.0),
            ("r/d", 3.0),
        ]);
        h.sort_by(descending_value);
        assert_eq!(child_names(&h), ["b", "d", "a", "c"]);
    }

    #[test]
    fn equal_comparator_keeps_input_order() {
        let names: Vec<_> = (0..20).map(|i| format!("r/n{i:02}")).collect();
        let mut h = Hierarchy::build(Input::Paths {
            records: names.clone(),
            path: Box::new(|p: &alloc::string::String| split_path(p)),
        })
        .unwrap();
        let before = child_names(&h).into_iter().map(str::to_owned).collect::<Vec<_>>();
        h.sort_by(|_, _| Ordering::Equal);
        assert_eq!(child_names(&h), before);
    }

    #[test]
    fn sort_none_is_a_no_op_and_ids_stay_valid() {
        let mut h = flat(vec![("r/a", 1.0), ("r/b", 2.0)]);
        let b = h.find("/r/b").unwrap();
        h.sort(None::<fn(&Node<_>, &Node<_>) -> Ordering>);
        assert_eq!(child_names(&h), ["a", "b"]);
        h.sort(Some(descending_value));
        assert_eq!(child_names(&h), ["b", "a"]);
        assert_eq!(h[b].value(), 2.0);
    }

    #[test]
    fn descending_height_puts_deeper_branches_first() {
        let mut h = flat(vec![("r/a", 1.0), ("r/b/x/y", 1.0)]);
        h.sort_by(descending_height);
        assert_eq!(child_names(&h), ["b", "a"]);
    }
}
