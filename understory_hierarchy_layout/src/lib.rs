// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hierarchy_layout --heading-base-level=0

//! Understory Hierarchy Layout: radial trees and treemaps.
//!
//! This crate assigns geometry to every node of an
//! [`understory_hierarchy::Hierarchy`]. Two interchangeable strategies are
//! provided:
//!
//! - [`RadialTreeLayout`]: a tidy tree in polar coordinates. Each node gets a
//!   [`Polar`](understory_hierarchy::Polar) angle in `[0, 2π)` and a radius
//!   proportional to its depth, or, as a cluster, with every leaf on the
//!   outer ring.
//! - [`TreemapLayout`]: recursive space partitioning. Each node gets a
//!   [`kurbo::Rect`] whose area is proportional to its value, divided among
//!   siblings by one of five [`TileStrategy`]s.
//!
//! Both read only the tree shape, sibling order, depth, and value, so run
//! aggregation and sorting first. Layout is pure geometry: nothing here draws.
//!
//! ## Example
//!
//! ```rust
//! use understory_hierarchy::{Hierarchy, Input, descending_value, split_path};
//! use understory_hierarchy_layout::{Padding, TileStrategy, TreemapLayout};
//!
//! let mut h = Hierarchy::build(Input::Paths {
//!     records: vec![("fruit/apple", 5.0), ("fruit/pear", 3.0), ("veg/kale", 2.0)],
//!     path: Box::new(|r: &(&str, f64)| split_path(r.0)),
//! })
//! .unwrap();
//! h.sum(|r| Some(r.1)).sort_by(descending_value);
//!
//! let tile = TileStrategy::from_name("squarify").unwrap();
//! TreemapLayout::new(640.0, 400.0)
//!     .with_padding(Padding::uniform(1.0))
//!     .with_tile(tile)
//!     .with_round(true)
//!     .layout(&mut h)
//!     .unwrap();
//!
//! for id in h.leaves() {
//!     let cell = h[id].layout().and_then(|g| g.as_rect()).unwrap();
//!     assert!(cell.area() > 0.0);
//! }
//! ```
//!
//! ## Features
//!
//! - `std` (default) and `libm` select Kurbo's float backend.
//! - `tracing`: emit a span per layout pass.
//! - `serde`: deserialize [`TileStrategy`] by name, [`RadialAlgorithm`], and [`Padding`] with defaults.

#![no_std]

extern crate alloc;

mod error;
mod radial;
mod tile;
mod treemap;

pub use error::LayoutError;
pub use radial::{RadialAlgorithm, RadialTreeLayout, Separation};
pub use tile::{PHI, TileStrategy, squarify_ratio};
pub use treemap::{Padding, TreemapLayout};
