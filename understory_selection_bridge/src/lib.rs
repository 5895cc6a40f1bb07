// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_selection_bridge --heading-base-level=0

//! Understory Selection Bridge: from clicks on hierarchy nodes to data selection.
//!
//! A laid-out hierarchy shows one visual node per data row. This crate maps
//! the two pointer gestures users make on those nodes back onto the host's
//! data model, and answers the question renderers ask while drawing:
//!
//! - [`SelectionBridge::on_click`]: dispatch a **toggle-select** request for the node's row.
//! - [`SelectionBridge::on_double_click`]: dispatch an **execute** request (drill down).
//! - [`is_selected`]: does the host's current selection filter match this node's row?
//!
//! The bridge does not own selection state. The host implements
//! [`SelectionHost`] to receive [`SelectionRequest`]s and exposes its current
//! selection as any [`DataFilter`]. [`RowSelection`] is a small in-memory
//! host keyed by [`Keyed`] rows, useful on its own and as a model for real
//! hosts.
//!
//! Nothing here depends on layout geometry, so one bridge serves radial trees
//! and treemaps alike.
//!
//! ## Example
//!
//! ```rust
//! use understory_hierarchy::{Hierarchy, Input};
//! use understory_selection_bridge::{KeyFilter, Keyed, RowSelection, SelectionBridge};
//!
//! struct Sale {
//!     region: &'static str,
//!     parent: Option<&'static str>,
//! }
//!
//! impl Keyed for Sale {
//!     type Key = &'static str;
//!     fn key(&self) -> &&'static str {
//!         &self.region
//!     }
//! }
//!
//! let h = Hierarchy::build(Input::Stratified {
//!     records: vec![
//!         Sale { region: "world", parent: None },
//!         Sale { region: "north", parent: Some("world") },
//!     ],
//!     id: Box::new(|s: &Sale| Some(s.region.to_string())),
//!     parent_id: Box::new(|s: &Sale| s.parent.map(str::to_string)),
//! })
//! .unwrap();
//!
//! let bridge = SelectionBridge::new(|s: &Sale| KeyFilter::single(s.region));
//! let mut host = RowSelection::new();
//! let north = &h[h.find("north").unwrap()];
//!
//! assert!(!bridge.is_selected(north, Some(&host)));
//! bridge.on_click(north, &mut host);
//! assert!(bridge.is_selected(north, Some(&host)));
//! bridge.on_click(north, &mut host);
//! assert!(!bridge.is_selected(north, Some(&host)));
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit a `debug` event for every dispatched request.

#![no_std]

extern crate alloc;

mod bridge;
mod filter;
mod host;

pub use bridge::{SelectionBridge, SelectionHost, SelectionMode, SelectionRequest, is_selected};
pub use filter::{DataFilter, KeyFilter, Keyed};
pub use host::RowSelection;
