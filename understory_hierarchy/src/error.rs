// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// Reasons a hierarchy could not be built from its input.
///
/// Construction errors abort the whole update: no partial hierarchy is
/// returned. The same malformed input always fails the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HierarchyError {
    /// There were no records, or no nested root record.
    EmptyInput,
    /// Two records resolved to the same identifier.
    DuplicateId(String),
    /// A record names a parent that no record provides.
    OrphanReference {
        /// Identifier of the record with the dangling reference.
        id: String,
        /// The parent identifier that could not be resolved.
        parent_id: String,
    },
    /// More than one record is marked as having no parent.
    MultipleRoots {
        /// Identifier of the first root encountered.
        first: String,
        /// Identifier of the second root encountered.
        second: String,
    },
    /// Records were supplied but none of them is a root.
    MissingRoot,
    /// Some records are not reachable from the root; their parent links form a cycle.
    Cycle {
        /// Identifier of one record on the cycle.
        id: String,
    },
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("no root: input is empty"),
            Self::DuplicateId(id) => write!(f, "duplicate node id {id:?}"),
            Self::OrphanReference { id, parent_id } => {
                write!(f, "node {id:?} references missing parent {parent_id:?}")
            }
            Self::MultipleRoots { first, second } => {
                write!(f, "multiple roots: {first:?} and {second:?}")
            }
            Self::MissingRoot => f.write_str("no root: every record has a parent"),
            Self::Cycle { id } => write!(f, "node {id:?} is part of a parent cycle"),
        }
    }
}

impl core::error::Error for HierarchyError {}
