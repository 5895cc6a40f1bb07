// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hierarchy --heading-base-level=0

//! Understory Hierarchy: rooted trees built from records, ready for layout.
//!
//! This crate turns flat or nested records into a single-rooted [`Hierarchy`]
//! and prepares it for a layout pass:
//!
//! 1. **Build** from one of three explicitly declared input shapes ([`Input`]):
//!    - `Paths`: each record yields path segments; shared prefixes become
//!      imputed internal nodes.
//!    - `Stratified`: each record names its id and its parent's id.
//!    - `Nested`: one root record exposes its children.
//! 2. **Aggregate** values bottom-up with [`Hierarchy::sum`] or [`Hierarchy::count`].
//! 3. **Sort** siblings with a stable comparator ([`Hierarchy::sort_by`]).
//!
//! Layout strategies (radial tree, treemap) live in `understory_hierarchy_layout`
//! and write [`Geometry`] back into each [`Node`].
//!
//! Hierarchies are plain owned data, rebuilt from scratch on every update.
//! Nodes are stored in an arena and addressed by [`NodeId`]; only shared
//! references to nodes are handed out.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_hierarchy::{Hierarchy, Input, descending_value, split_path};
//!
//! let records = vec![("root/a", 3.0), ("root/b", 1.0)];
//! let mut h = Hierarchy::build(Input::Paths {
//!     records,
//!     path: Box::new(|r: &(&str, f64)| split_path(r.0)),
//! })
//! .unwrap();
//!
//! h.sum(|r| Some(r.1)).sort_by(descending_value);
//!
//! let root = h.root_node();
//! assert_eq!(root.id(), "/root");
//! assert_eq!(root.value(), 4.0);
//! let values: Vec<f64> = root.children().iter().map(|&c| h[c].value()).collect();
//! assert_eq!(values, [3.0, 1.0]);
//! ```
//!
//! ## Choosing a mode from optional accessors
//!
//! Callers that receive accessors from configuration can let [`Accessors`]
//! pick the mode: a path accessor wins, then id/parent accessors, and nested
//! mode applies otherwise.
//!
//! ```rust
//! use understory_hierarchy::{Accessors, Data, HierarchyError};
//!
//! let rows = vec![("a", None), ("a", None::<&str>)];
//! let err = Accessors {
//!     id: Some(Box::new(|r: &(&str, Option<&str>)| Some(r.0.to_string()))),
//!     parent_id: Some(Box::new(|r: &(&str, Option<&str>)| r.1.map(str::to_string))),
//!     ..Accessors::default()
//! }
//! .build(Data::Records(rows))
//! .unwrap_err();
//! assert_eq!(err, HierarchyError::DuplicateId("a".into()));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo's `std` feature.
//! - `libm`: `no_std` builds with Kurbo's `libm` math.
//! - `tracing`: emit spans and events from the build and aggregate stages.

#![no_std]

extern crate alloc;

mod aggregate;
mod build;
mod error;
mod hierarchy;
mod node;
mod sort;

pub use build::{Accessors, ChildrenFn, Data, IdFn, Input, PathFn, Segments, join_path, split_path};
pub use error::HierarchyError;
pub use hierarchy::Hierarchy;
pub use node::{Geometry, Node, NodeId, Polar};
pub use sort::{descending_height, descending_value};
