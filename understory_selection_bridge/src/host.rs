// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small in-memory selection host keyed by row key.

use alloc::vec::Vec;

use crate::bridge::{SelectionHost, SelectionMode, SelectionRequest};
use crate::filter::{DataFilter, KeyFilter, Keyed};

/// An in-memory selection model over row keys.
///
/// `RowSelection` accepts [`KeyFilter`] requests and doubles as the "current
/// selection" filter for [`is_selected`](crate::is_selected). Like a list
/// selection, it keeps keys unique in first-selected order and tracks a
/// revision that bumps only when the set of selected keys changes.
///
/// Execute requests do not touch the selection; the most recent one is kept
/// for the application to act on.
#[derive(Clone, Debug)]
pub struct RowSelection<K> {
    selected: Vec<K>,
    revision: u64,
    executed: Option<KeyFilter<K>>,
}

impl<K> Default for RowSelection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RowSelection<K> {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: Vec::new(),
            revision: 0,
            executed: None,
        }
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected keys in first-selected order.
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.selected
    }

    /// Bumps whenever the selected keys change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The filter of the most recent execute request, if any.
    pub fn last_executed(&self) -> Option<&KeyFilter<K>> {
        self.executed.as_ref()
    }

    /// Takes the pending execute request's filter.
    pub fn take_executed(&mut self) -> Option<KeyFilter<K>> {
        self.executed.take()
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.bump_revision();
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<K: PartialEq + Clone> RowSelection<K> {
    /// Returns `true` if `key` is selected.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// The current selection as a filter.
    pub fn to_filter(&self) -> KeyFilter<K> {
        KeyFilter::new(self.selected.iter().cloned())
    }

    /// Applies `filter` to the selection according to `mode`.
    ///
    /// Toggling a filter with several keys deselects them all if every one
    /// is already selected, and otherwise selects the missing ones.
    pub fn apply(&mut self, filter: &KeyFilter<K>, mode: SelectionMode) {
        let changed = match mode {
            SelectionMode::Toggle => {
                if !filter.is_empty() && filter.keys().iter().all(|k| self.contains(k)) {
                    self.remove_keys(filter.keys())
                } else {
                    self.add_keys(filter.keys())
                }
            }
            SelectionMode::Replace => {
                let unchanged = self.selected.len() == filter.len()
                    && filter.keys().iter().all(|k| self.contains(k));
                if !unchanged {
                    self.selected = filter.keys().to_vec();
                }
                !unchanged
            }
            SelectionMode::Add => self.add_keys(filter.keys()),
            SelectionMode::Remove => self.remove_keys(filter.keys()),
        };
        if changed {
            self.bump_revision();
        }
    }

    fn add_keys(&mut self, keys: &[K]) -> bool {
        let before = self.selected.len();
        for key in keys {
            if !self.contains(key) {
                self.selected.push(key.clone());
            }
        }
        self.selected.len() != before
    }

    fn remove_keys(&mut self, keys: &[K]) -> bool {
        let before = self.selected.len();
        self.selected.retain(|k| !keys.contains(k));
        self.selected.len() != before
    }
}

impl<K: PartialEq + Clone> SelectionHost<KeyFilter<K>> for RowSelection<K> {
    fn dispatch(&mut self, request: SelectionRequest<KeyFilter<K>>) {
        match request {
            SelectionRequest::Select { filter, mode } => self.apply(&filter, mode),
            SelectionRequest::Execute { filter } => self.executed = Some(filter),
        }
    }
}

impl<K, R> DataFilter<R> for RowSelection<K>
where
    K: PartialEq,
    R: Keyed<Key = K> + ?Sized,
{
    fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn matches(&self, row: &R) -> bool {
        self.selected.contains(row.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(keys: &[u32]) -> KeyFilter<u32> {
        KeyFilter::new(keys.iter().copied())
    }

    #[test]
    fn toggle_many_adds_missing_then_removes_all() {
        let mut sel = RowSelection::new();
        sel.apply(&filter(&[1]), SelectionMode::Add);
        sel.apply(&filter(&[1, 2]), SelectionMode::Toggle);
        assert_eq!(sel.keys(), &[1, 2]);
        sel.apply(&filter(&[1, 2]), SelectionMode::Toggle);
        assert!(sel.is_empty());
        assert_eq!(sel.revision(), 3);
    }

    #[test]
    fn replace_and_remove_bump_only_on_change() {
        let mut sel = RowSelection::new();
        sel.apply(&filter(&[4, 5]), SelectionMode::Replace);
        assert_eq!(sel.revision(), 1);
        sel.apply(&filter(&[5, 4]), SelectionMode::Replace);
        assert_eq!(sel.revision(), 1);
        sel.apply(&filter(&[9]), SelectionMode::Remove);
        assert_eq!(sel.revision(), 1);
        sel.apply(&filter(&[4]), SelectionMode::Remove);
        assert_eq!(sel.keys(), &[5]);
        assert_eq!(sel.revision(), 2);
        sel.apply(&KeyFilter::empty(), SelectionMode::Toggle);
        assert_eq!(sel.revision(), 2);
    }

    #[test]
    fn execute_leaves_selection_alone() {
        let mut sel = RowSelection::new();
        sel.dispatch(SelectionRequest::Execute { filter: filter(&[7]) });
        assert!(sel.is_empty());
        assert_eq!(sel.revision(), 0);
        assert_eq!(sel.take_executed(), Some(filter(&[7])));
        assert_eq!(sel.last_executed(), None);
    }
}
