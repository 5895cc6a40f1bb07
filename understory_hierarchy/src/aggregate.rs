// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom-up value aggregation.

use crate::hierarchy::Hierarchy;

impl<T> Hierarchy<T> {
    /// Sets every node's value to the number of leaves below it.
    ///
    /// A leaf counts as `1`.
    pub fn count(&mut self) -> &mut Self {
        self.fold_values(|_| 1.0)
    }

    /// Sets every leaf's value from `value`, and every internal node's value
    /// to the sum of its children's.
    ///
    /// `value` is only evaluated at leaves. `None`, NaN, and infinite results
    /// count as `0.0`; negative results are clamped to `0.0`. Leaves without a
    /// payload contribute `0.0`.
    ///
    /// ```rust
    /// use understory_hierarchy::{Hierarchy, Input, split_path};
    ///
    /// let mut h = Hierarchy::build(Input::Paths {
    ///     records: vec![("root/a", 3.0), ("root/b", -1.0)],
    ///     path: Box::new(|r: &(&str, f64)| split_path(r.0)),
    /// })
    /// .unwrap();
    /// h.sum(|r| Some(r.1));
    /// assert_eq!(h.root_node().value(), 3.0);
    /// ```
    pub fn sum<F>(&mut self, value: F) -> &mut Self
    where
        F: Fn(&T) -> Option<f64>,
    {
        self.fold_values(|payload| {
            payload
                .and_then(&value)
                .filter(|v| v.is_finite())
                .map_or(0.0, |v| v.max(0.0))
        })
    }

    /// Runs [`sum`](Self::sum) if `value` is given, [`count`](Self::count) otherwise.
    pub fn aggregate<F>(&mut self, value: Option<F>) -> &mut Self
    where
        F: Fn(&T) -> Option<f64>,
    {
        match value {
            Some(value) => self.sum(value),
            None => self.count(),
        }
    }

    fn fold_values(&mut self, mut leaf: impl FnMut(Option<&T>) -> f64) -> &mut Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("aggregate", nodes = self.nodes.len()).entered();

        for node in &mut self.nodes {
            node.value = if node.children.is_empty() {
                leaf(node.payload.as_ref())
            } else {
                0.0
            };
        }
        // The arena is in pre-order, so a reverse sweep finishes every child
        // before adding it into its parent.
        for idx in (1..self.nodes.len()).rev() {
            let value = self.nodes[idx].value;
            if let Some(parent) = self.nodes[idx].parent {
                self.nodes[parent.index()].value += value;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(total = self.nodes[0].value, "aggregated");
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::ToString;
    use alloc::vec;

    use crate::{Hierarchy, Input};

    type Row = (&'static str, Option<&'static str>, f64);

    fn tree(rows: alloc::vec::Vec<Row>) -> Hierarchy<Row> {
        Hierarchy::build(Input::Stratified {
            records: rows,
            id: Box::new(|r: &Row| Some(r.0.to_string())),
            parent_id: Box::new(|r: &Row| r.1.map(str::to_string)),
        })
        .unwrap()
    }

    #[test]
    fn count_counts_leaves() {
        let mut h = tree(vec![
            ("r", None, 0.0),
            ("a", Some("r"), 0.0),
            ("a1", Some("a"), 0.0),
            ("a2", Some("a"), 0.0),
            ("b", Some("r"), 0.0),
        ]);
        h.count();
        assert_eq!(h.root_node().value(), 3.0);
        assert_eq!(h[h.find("a").unwrap()].value(), 2.0);
        assert_eq!(h[h.find("b").unwrap()].value(), 1.0);
    }

    #[test]
    fn sum_ignores_internal_values_and_sanitizes_leaves() {
        let mut h = tree(vec![
            ("r", None, 100.0),
            ("a", Some("r"), 4.0),
            ("b", Some("r"), -3.0),
            ("c", Some("r"), f64::NAN),
            ("d", Some("r"), f64::INFINITY),
        ]);
        h.sum(|r| Some(r.2));
        assert_eq!(h.root_node().value(), 4.0);
        assert_eq!(h[h.find("b").unwrap()].value(), 0.0);
        assert_eq!(h[h.find("c").unwrap()].value(), 0.0);
        assert_eq!(h[h.find("d").unwrap()].value(), 0.0);
    }

    #[test]
    fn aggregate_dispatches_on_accessor() {
        let mut h = tree(vec![("r", None, 0.0), ("a", Some("r"), 5.0)]);
        h.aggregate(Some(|r: &Row| Some(r.2)));
        assert_eq!(h.root_node().value(), 5.0);
        h.aggregate(None::<fn(&Row) -> Option<f64>>);
        assert_eq!(h.root_node().value(), 1.0);
    }

    #[test]
    fn single_node_counts_as_one() {
        let mut h = tree(vec![("r", None, 7.0)]);
        h.count();
        assert_eq!(h.root_node().value(), 1.0);
        h.sum(|r| Some(r.2));
        assert_eq!(h.root_node().value(), 7.0);
    }
}
