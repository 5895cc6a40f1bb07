// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture → request translation.

use understory_hierarchy::Node;

use crate::filter::DataFilter;

/// How a selection request combines with the host's current selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// Deselect the filtered rows if they are all selected, otherwise select them.
    #[default]
    Toggle,
    /// Make the filtered rows the whole selection.
    Replace,
    /// Add the filtered rows to the selection.
    Add,
    /// Remove the filtered rows from the selection.
    Remove,
}

/// A request sent to the host's selection model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionRequest<F> {
    /// Change the selection.
    Select {
        /// Rows the request applies to.
        filter: F,
        /// How to combine with the current selection.
        mode: SelectionMode,
    },
    /// Act on the rows (drill down, open, navigate).
    Execute {
        /// Rows the request applies to.
        filter: F,
    },
}

impl<F> SelectionRequest<F> {
    /// The filter carried by this request.
    pub fn filter(&self) -> &F {
        match self {
            Self::Select { filter, .. } | Self::Execute { filter } => filter,
        }
    }

    /// Consumes the request, returning its filter.
    pub fn into_filter(self) -> F {
        match self {
            Self::Select { filter, .. } | Self::Execute { filter } => filter,
        }
    }
}

/// The host side of the selection contract.
///
/// Dispatch is fire-and-forget: the bridge does not wait for, or observe, the
/// outcome. Implementations must return promptly.
pub trait SelectionHost<F> {
    /// Handles one request.
    fn dispatch(&mut self, request: SelectionRequest<F>);
}

impl<F, H: SelectionHost<F> + ?Sized> SelectionHost<F> for &mut H {
    fn dispatch(&mut self, request: SelectionRequest<F>) {
        (**self).dispatch(request);
    }
}

/// Translates pointer gestures on hierarchy nodes into selection requests.
///
/// The bridge holds only a filter factory, which scopes a filter to one
/// node's payload. It never looks at layout geometry, so the same bridge
/// serves radial trees and treemaps alike.
///
/// Nodes without a payload (ancestors imputed from record paths) have no
/// row to refer to: gestures on them dispatch nothing and they are never
/// reported as selected.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionBridge<M> {
    make_filter: M,
}

impl<M> SelectionBridge<M> {
    /// Creates a bridge from a filter factory.
    pub const fn new(make_filter: M) -> Self {
        Self { make_filter }
    }

    /// Builds the filter scoped to `node`'s payload, if it has one.
    pub fn filter_for<T, F>(&self, node: &Node<T>) -> Option<F>
    where
        M: Fn(&T) -> F,
    {
        node.payload().map(&self.make_filter)
    }

    /// Single click: asks the host to toggle the node's row in the selection.
    ///
    /// Returns `true` if a request was dispatched.
    pub fn on_click<T, F, H>(&self, node: &Node<T>, host: &mut H) -> bool
    where
        M: Fn(&T) -> F,
        H: SelectionHost<F> + ?Sized,
    {
        let Some(filter) = self.filter_for(node) else {
            return false;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(node = node.id(), "toggle-select");
        host.dispatch(SelectionRequest::Select {
            filter,
            mode: SelectionMode::Toggle,
        });
        true
    }

    /// Double click: asks the host to execute (drill into) the node's row.
    ///
    /// Telling a double click apart from two single clicks is up to the host's
    /// input layer; this only maps the gesture it reports.
    ///
    /// Returns `true` if a request was dispatched.
    pub fn on_double_click<T, F, H>(&self, node: &Node<T>, host: &mut H) -> bool
    where
        M: Fn(&T) -> F,
        H: SelectionHost<F> + ?Sized,
    {
        let Some(filter) = self.filter_for(node) else {
            return false;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(node = node.id(), "execute");
        host.dispatch(SelectionRequest::Execute { filter });
        true
    }

    /// Returns `true` if `current` is a non-empty filter matching `node`'s row.
    ///
    /// This is a pure read and does not depend on the filter factory.
    pub fn is_selected<T, C>(&self, node: &Node<T>, current: Option<&C>) -> bool
    where
        C: DataFilter<T> + ?Sized,
    {
        is_selected(node, current)
    }
}

/// Returns `true` if `current` is a non-empty filter matching `node`'s row.
///
/// An absent or empty filter selects nothing, so renderers can treat "no
/// selection" and "everything unselected" the same way.
pub fn is_selected<T, C>(node: &Node<T>, current: Option<&C>) -> bool
where
    C: DataFilter<T> + ?Sized,
{
    match (current, node.payload()) {
        (Some(filter), Some(row)) => !filter.is_empty() && filter.matches(row),
        _ => false,
    }
}
