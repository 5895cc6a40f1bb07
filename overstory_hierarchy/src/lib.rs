// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=overstory_hierarchy --heading-base-level=0

//! Overstory Hierarchy: treemap and radial tree charts over tabular records.
//!
//! This crate composes the Understory hierarchy kernels into two ready-made
//! chart pipelines:
//!
//! - [`TreemapChart`]: build → aggregate → color → sort → treemap layout.
//! - [`RadialTreeChart`]: build → aggregate → sort → radial layout.
//!
//! Each run takes an [`Input`](understory_hierarchy::Input) and a set of
//! [`Encodings`] and returns a frame: the laid-out hierarchy plus one
//! drawable mark per leaf (treemap) or per node (radial tree), in chart
//! coordinates. Frames hit-test points back to nodes and forward clicks to a
//! [`SelectionBridge`](understory_selection_bridge::SelectionBridge).
//!
//! Configurations enumerate every option with a documented default and are
//! validated once per run. [`OrdinalColors`] is also usable on its own.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_hierarchy::{Input, split_path};
//! use understory_selection_bridge::{KeyFilter, RowSelection, SelectionBridge};
//! use overstory_hierarchy::{Encodings, TreemapChart};
//!
//! type Sale = (&'static str, f64);
//!
//! let sales: Vec<Sale> = vec![("east/north", 30.0), ("east/south", 10.0), ("west", 40.0)];
//! let chart = TreemapChart::new(200.0, 100.0);
//! let encodings = Encodings::default()
//!     .with_value(|r: &Sale| Some(r.1))
//!     .with_group(|r: &Sale| split_path(r.0)[0].clone())
//!     .with_label(|n| n.id().to_string());
//!
//! let frame = chart
//!     .run(
//!         Input::Paths {
//!             records: sales,
//!             path: Box::new(|r: &Sale| split_path(r.0)),
//!         },
//!         &encodings,
//!     )
//!     .unwrap();
//! assert_eq!(frame.marks.len(), 3);
//! assert_eq!(frame.colors.as_ref().unwrap().domain(), ["east", "west"]);
//!
//! let bridge = SelectionBridge::new(|r: &Sale| KeyFilter::single(r.0));
//! let mut host = RowSelection::new();
//! let west = frame.marks[2].rect.center();
//! assert!(frame.click(west, &bridge, &mut host));
//! assert_eq!(host.keys(), ["west"]);
//! assert!(!frame.click(Point::new(-5.0, -5.0), &bridge, &mut host));
//! ```
//!
//! ## Features
//!
//! - `std` (default) and `libm` select the float backend.
//! - `tracing`: emit a span per chart run, and enable tracing in the kernels.
//! - `serde`: deserialize chart configurations; omitted fields take their defaults.

#![no_std]

extern crate alloc;

mod chart;
mod color;
mod error;
mod radial;
mod treemap;

pub use chart::{Encodings, GroupFn, Margins, SiblingOrder, TextFn, ValueFn};
pub use color::{OrdinalColors, tableau10};
pub use error::ChartError;
pub use radial::{
    LabelAnchor, RADIAL_BRANCH_FILL, RADIAL_LEAF_FILL, RadialFrame, RadialMark, RadialTreeChart,
};
pub use treemap::{TREEMAP_FILL, TreemapChart, TreemapFrame, TreemapMark};
