// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data filters: predicates over the host's rows.

use alloc::vec::Vec;

/// A predicate over data rows of type `R`.
///
/// Hosts use filters both to describe a selection request ("the row behind
/// this node") and to report their current selection.
pub trait DataFilter<R: ?Sized> {
    /// Returns `true` if this filter selects nothing at all.
    fn is_empty(&self) -> bool;

    /// Returns `true` if `row` passes this filter.
    fn matches(&self, row: &R) -> bool;
}

impl<R: ?Sized, F: DataFilter<R> + ?Sized> DataFilter<R> for &F {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn matches(&self, row: &R) -> bool {
        (**self).matches(row)
    }
}

/// Rows that carry a comparable key.
pub trait Keyed {
    /// The key type.
    type Key: PartialEq;

    /// Returns this row's key.
    fn key(&self) -> &Self::Key;
}

impl<T: Keyed + ?Sized> Keyed for &T {
    type Key = T::Key;

    fn key(&self) -> &Self::Key {
        (**self).key()
    }
}

/// A filter matching rows whose key is one of a set of keys.
///
/// Keys are kept unique, in first-added order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFilter<K> {
    keys: Vec<K>,
}

impl<K> Default for KeyFilter<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K> KeyFilter<K> {
    /// A filter that matches nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self { keys: Vec::new() }
    }

    /// A filter matching exactly one key.
    #[must_use]
    pub fn single(key: K) -> Self {
        Self {
            keys: alloc::vec![key],
        }
    }

    /// The keys this filter matches.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the filter has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: PartialEq> KeyFilter<K> {
    /// A filter matching any of `keys`; duplicates are dropped.
    pub fn new<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut filter = Self::empty();
        for key in keys {
            if !filter.contains(&key) {
                filter.keys.push(key);
            }
        }
        filter
    }

    /// Returns `true` if `key` is one of this filter's keys.
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }
}

impl<K: PartialEq> FromIterator<K> for KeyFilter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<K, R> DataFilter<R> for KeyFilter<K>
where
    K: PartialEq,
    R: Keyed<Key = K> + ?Sized,
{
    fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn matches(&self, row: &R) -> bool {
        self.contains(row.key())
    }
}
