// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchy construction from paths, id/parent pairs, or nested records.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::HierarchyError;
use crate::hierarchy::{Draft, Hierarchy, Linked};

/// Path segments from the root to a record, root-most first.
pub type Segments = SmallVec<[String; 4]>;

/// Accessor returning a record's path segments.
pub type PathFn<'a, T> = Box<dyn Fn(&T) -> Segments + 'a>;

/// Accessor returning a record's identifier (or its parent's).
///
/// For parent accessors, `None` (or an empty string) marks the root.
pub type IdFn<'a, T> = Box<dyn Fn(&T) -> Option<String> + 'a>;

/// Accessor returning a nested record's children.
pub type ChildrenFn<'a, T> = Box<dyn FnMut(&T) -> Vec<T> + 'a>;

/// An explicitly declared input shape.
///
/// Exactly one construction strategy applies per variant; nothing is inferred
/// from the shape of the data.
pub enum Input<'a, T> {
    /// Flat records placed by their path; missing ancestors are imputed.
    Paths {
        /// The records, in input order.
        records: Vec<T>,
        /// Path accessor.
        path: PathFn<'a, T>,
    },
    /// Flat records linked by explicit id and parent id.
    Stratified {
        /// The records, in input order.
        records: Vec<T>,
        /// Id accessor. `None` gives the node a positional id no record can reference.
        id: IdFn<'a, T>,
        /// Parent id accessor. `None` or `""` marks the root.
        parent_id: IdFn<'a, T>,
    },
    /// A single record that exposes its own children.
    Nested {
        /// The root record.
        root: T,
        /// Children accessor; an empty result ends recursion.
        children: ChildrenFn<'a, T>,
        /// Optional id accessor; ids are synthesized from child indices otherwise.
        id: Option<IdFn<'a, T>>,
    },
}

impl<T> core::fmt::Debug for Input<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Paths { records, .. } => f
                .debug_struct("Paths")
                .field("records", &records.len())
                .finish_non_exhaustive(),
            Self::Stratified { records, .. } => f
                .debug_struct("Stratified")
                .field("records", &records.len())
                .finish_non_exhaustive(),
            Self::Nested { id, .. } => f
                .debug_struct("Nested")
                .field("has_id", &id.is_some())
                .finish_non_exhaustive(),
        }
    }
}

/// Input data for [`Accessors::build`].
#[derive(Clone, Debug)]
pub enum Data<T> {
    /// An ordered sequence of flat records.
    Records(Vec<T>),
    /// A single nested root record.
    Nested(T),
}

/// Optional accessors resolved into an [`Input`] by precedence.
///
/// - `path` set: path mode.
/// - otherwise `id` or `parent_id` set: id/parent mode (a missing accessor
///   yields `None` for every record).
/// - otherwise nested mode, walking `children` (a missing accessor makes the
///   root a leaf).
pub struct Accessors<'a, T> {
    /// Path accessor.
    pub path: Option<PathFn<'a, T>>,
    /// Id accessor.
    pub id: Option<IdFn<'a, T>>,
    /// Parent id accessor.
    pub parent_id: Option<IdFn<'a, T>>,
    /// Children accessor.
    pub children: Option<ChildrenFn<'a, T>>,
}

impl<T> Default for Accessors<'_, T> {
    fn default() -> Self {
        Self {
            path: None,
            id: None,
            parent_id: None,
            children: None,
        }
    }
}

impl<T> core::fmt::Debug for Accessors<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Accessors")
            .field("path", &self.path.is_some())
            .field("id", &self.id.is_some())
            .field("parent_id", &self.parent_id.is_some())
            .field("children", &self.children.is_some())
            .finish()
    }
}

impl<'a, T: 'a> Accessors<'a, T> {
    /// Resolves the construction strategy for `data`.
    ///
    /// Tabular modes accept a nested root as a one-record table. Nested mode
    /// accepts a record list only if it holds exactly one record.
    pub fn into_input(self, data: Data<T>) -> Result<Input<'a, T>, HierarchyError> {
        let records = |data: Data<T>| match data {
            Data::Records(records) => records,
            Data::Nested(root) => alloc::vec![root],
        };
        if let Some(path) = self.path {
            return Ok(Input::Paths {
                records: records(data),
                path,
            });
        }
        if self.id.is_some() || self.parent_id.is_some() {
            return Ok(Input::Stratified {
                records: records(data),
                id: self.id.unwrap_or_else(no_id),
                parent_id: self.parent_id.unwrap_or_else(no_id),
            });
        }
        let root = match data {
            Data::Nested(root) => root,
            Data::Records(records) => {
                let mut records = records.into_iter();
                let Some(root) = records.next() else {
                    return Err(HierarchyError::EmptyInput);
                };
                if records.next().is_some() {
                    return Err(HierarchyError::MultipleRoots {
                        first: "0".to_string(),
                        second: "1".to_string(),
                    });
                }
                root
            }
        };
        Ok(Input::Nested {
            root,
            children: self.children.unwrap_or_else(no_children),
            id: self.id,
        })
    }

    /// Resolves the construction strategy for `data` and builds the hierarchy.
    pub fn build(self, data: Data<T>) -> Result<Hierarchy<T>, HierarchyError> {
        Hierarchy::build(self.into_input(data)?)
    }
}

fn no_id<'a, T: 'a>() -> IdFn<'a, T> {
    Box::new(|_: &T| None::<String>)
}

fn no_children<'a, T: 'a>() -> ChildrenFn<'a, T> {
    Box::new(|_: &T| Vec::<T>::new())
}

impl<T> Hierarchy<T> {
    /// Builds a hierarchy from an explicitly declared input shape.
    ///
    /// Values are all `0.0` afterwards; run [`Hierarchy::count`] or
    /// [`Hierarchy::sum`] before laying out.
    pub fn build(input: Input<'_, T>) -> Result<Self, HierarchyError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("build").entered();

        let hierarchy = match input {
            Input::Paths { records, path } => build_paths(records, &*path)?,
            Input::Stratified {
                records,
                id,
                parent_id,
            } => build_stratified(records, &*id, &*parent_id)?,
            Input::Nested { root, children, id } => build_nested(root, children, id),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = hierarchy.len(),
            max_depth = hierarchy.max_depth(),
            "hierarchy built"
        );
        Ok(hierarchy)
    }
}

/// Joins path segments into a unique node id.
///
/// The result starts with `/` and separates segments with `/`. Backslashes and
/// slashes inside a segment are escaped with a backslash, so distinct segment
/// sequences always produce distinct ids. The empty path is the empty string,
/// which no non-empty path can produce; a single empty segment is `/`.
///
/// ```rust
/// use understory_hierarchy::join_path;
///
/// assert_eq!(join_path(&["root", "a"]), "/root/a");
/// assert_eq!(join_path(&["a/b"]), "/a\\/b");
/// assert_eq!(join_path(&[""]), "/");
/// assert_eq!(join_path::<&str>(&[]), "");
/// ```
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        for ch in segment.as_ref().chars() {
            if ch == '/' || ch == '\\' {
                out.push('\\');
            }
            out.push(ch);
        }
    }
    out
}

/// Splits a `/`-delimited path into segments, honoring `\` escapes.
///
/// Leading, trailing, and repeated separators are ignored.
///
/// ```rust
/// use understory_hierarchy::split_path;
///
/// assert_eq!(split_path("root/a").as_slice(), ["root", "a"]);
/// assert_eq!(split_path("/x\\/y/z/").as_slice(), ["x/y", "z"]);
/// ```
pub fn split_path(path: &str) -> Segments {
    let mut segments = Segments::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '/' => {
                if !current.is_empty() {
                    segments.push(core::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn build_paths<T>(
    records: Vec<T>,
    path: &dyn Fn(&T) -> Segments,
) -> Result<Hierarchy<T>, HierarchyError> {
    if records.is_empty() {
        return Err(HierarchyError::EmptyInput);
    }

    // Slot 0 is the synthetic top for the empty path.
    let mut drafts: Vec<Draft<T>> = alloc::vec![Draft::new(join_path::<&str>(&[]), None, None)];
    let mut by_id: HashMap<String, usize> = HashMap::new();
    by_id.insert(drafts[0].id.clone(), 0);

    for record in records {
        let segments = path(&record);
        let mut parent = 0;
        for depth in 1..segments.len() {
            let id = join_path(&segments[..depth]);
            parent = match by_id.get(&id) {
                Some(&existing) => existing,
                None => {
                    let idx = drafts.len();
                    by_id.insert(id.clone(), idx);
                    drafts.push(Draft::new(id, None, Some(parent)));
                    idx
                }
            };
        }
        let id = join_path(&segments);
        match by_id.get(&id) {
            Some(&existing) => {
                let slot = &mut drafts[existing].payload;
                if slot.is_some() {
                    return Err(HierarchyError::DuplicateId(id));
                }
                *slot = Some(record);
            }
            None => {
                by_id.insert(id.clone(), drafts.len());
                drafts.push(Draft::new(id, Some(record), Some(parent)));
            }
        }
    }

    // Only introduce imputed roots where they join several branches.
    let mut child_counts = alloc::vec![0_usize; drafts.len()];
    let mut only_child = alloc::vec![None; drafts.len()];
    for (idx, draft) in drafts.iter().enumerate() {
        if let Some(parent) = draft.parent {
            child_counts[parent] += 1;
            only_child[parent] = Some(idx);
        }
    }
    let mut root = 0;
    while drafts[root].payload.is_none()
        && child_counts[root] == 1
        && let Some(child) = only_child[root]
    {
        root = child;
    }

    let Linked { hierarchy, .. } = Hierarchy::link(drafts, root);
    Ok(hierarchy)
}

fn build_stratified<T>(
    records: Vec<T>,
    id: &dyn Fn(&T) -> Option<String>,
    parent_id: &dyn Fn(&T) -> Option<String>,
) -> Result<Hierarchy<T>, HierarchyError> {
    if records.is_empty() {
        return Err(HierarchyError::EmptyInput);
    }

    let mut by_id: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut keyed: Vec<(Option<String>, Option<String>, T)> = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        let node_id = id(&record);
        if let Some(node_id) = &node_id
            && by_id.insert(node_id.clone(), idx).is_some()
        {
            return Err(HierarchyError::DuplicateId(node_id.clone()));
        }
        let parent = parent_id(&record).filter(|p| !p.is_empty());
        keyed.push((node_id, parent, record));
    }

    let mut root: Option<usize> = None;
    let mut drafts = Vec::with_capacity(keyed.len());
    for (idx, (node_id, parent, record)) in keyed.into_iter().enumerate() {
        let node_id = match node_id {
            Some(node_id) => node_id,
            None => {
                let positional = format!("#{idx}");
                if by_id.contains_key(&positional) {
                    return Err(HierarchyError::DuplicateId(positional));
                }
                positional
            }
        };
        let parent = match parent {
            Some(parent_id) => match by_id.get(&parent_id) {
                Some(&p) => Some(p),
                None => {
                    return Err(HierarchyError::OrphanReference {
                        id: node_id,
                        parent_id,
                    });
                }
            },
            None => {
                if let Some(first) = root {
                    let first: &Draft<T> = &drafts[first];
                    return Err(HierarchyError::MultipleRoots {
                        first: first.id.clone(),
                        second: node_id,
                    });
                }
                root = Some(idx);
                None
            }
        };
        drafts.push(Draft::new(node_id, Some(record), parent));
    }

    let Some(root) = root else {
        return Err(HierarchyError::MissingRoot);
    };
    let Linked {
        hierarchy,
        unreachable,
    } = Hierarchy::link(drafts, root);
    if let Some(stray) = unreachable.into_iter().next() {
        return Err(HierarchyError::Cycle { id: stray.id });
    }
    Ok(hierarchy)
}

fn build_nested<T>(
    root: T,
    mut children: ChildrenFn<'_, T>,
    id: Option<IdFn<'_, T>>,
) -> Hierarchy<T> {
    let mut drafts: Vec<Draft<T>> = Vec::new();
    // (record, parent slot, positional id)
    let mut stack: Vec<(T, Option<usize>, String)> = alloc::vec![(root, None, String::new())];
    while let Some((record, parent, position)) = stack.pop() {
        let idx = drafts.len();
        let kids = children(&record);
        let node_id = id
            .as_ref()
            .and_then(|id| id(&record))
            .unwrap_or_else(|| position.clone());
        for (i, kid) in kids.into_iter().enumerate().rev() {
            let child_position = if position.is_empty() {
                i.to_string()
            } else {
                format!("{position}/{i}")
            };
            stack.push((kid, Some(idx), child_position));
        }
        drafts.push(Draft::new(node_id, Some(record), parent));
    }
    Hierarchy::link(drafts, 0).hierarchy
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: &'static str,
        parent: Option<&'static str>,
    }

    fn stratify(rows: Vec<Row>) -> Result<Hierarchy<Row>, HierarchyError> {
        Hierarchy::build(Input::Stratified {
            records: rows,
            id: Box::new(|r: &Row| Some(r.id.to_string())),
            parent_id: Box::new(|r: &Row| r.parent.map(str::to_string)),
        })
    }

    fn row(id: &'static str, parent: Option<&'static str>) -> Row {
        Row { id, parent }
    }

    #[test]
    fn join_and_split_are_inverse_for_escaped_segments() {
        let segments = ["a/b", "c\\d", "e"];
        let joined = join_path(&segments);
        assert_eq!(joined, "/a\\/b/c\\\\d/e");
        assert_eq!(split_path(&joined).as_slice(), segments);
    }

    #[test]
    fn stratified_links_children_in_input_order() {
        let h = stratify(vec![
            row("c2", Some("r")),
            row("r", None),
            row("c1", Some("r")),
            row("g", Some("c1")),
        ])
        .unwrap();
        let root = h.root_node();
        assert_eq!(root.id(), "r");
        let kids: Vec<&str> = root.children().iter().map(|&c| h[c].id()).collect();
        assert_eq!(kids, ["c2", "c1"]);
        let g = h.find("g").unwrap();
        assert_eq!(h[g].depth(), 2);
        assert_eq!(root.height(), 2);
    }

    #[test]
    fn stratified_rejects_duplicates_before_orphans() {
        let err = stratify(vec![row("a", Some("missing")), row("a", None)]).unwrap_err();
        assert_eq!(err, HierarchyError::DuplicateId("a".into()));
    }

    #[test]
    fn stratified_rejects_second_root() {
        let err = stratify(vec![row("a", None), row("b", None)]).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::MultipleRoots {
                first: "a".into(),
                second: "b".into()
            }
        );
    }

    #[test]
    fn stratified_detects_cycles_off_the_root() {
        let err = stratify(vec![
            row("r", None),
            row("x", Some("y")),
            row("y", Some("x")),
        ])
        .unwrap_err();
        assert_eq!(err, HierarchyError::Cycle { id: "x".into() });

        let err = stratify(vec![row("x", Some("y")), row("y", Some("x"))]).unwrap_err();
        assert_eq!(err, HierarchyError::MissingRoot);
    }

    #[test]
    fn positional_ids_may_not_shadow_explicit_ids() {
        let err = Hierarchy::build(Input::Stratified {
            records: vec![(Some("r"), None), (None, Some("r")), (Some("#1"), Some("r"))],
            id: Box::new(|r: &(Option<&'static str>, Option<&'static str>)| {
                r.0.map(str::to_string)
            }),
            parent_id: Box::new(|r: &(Option<&'static str>, Option<&'static str>)| {
                r.1.map(str::to_string)
            }),
        })
        .unwrap_err();
        assert_eq!(err, HierarchyError::DuplicateId("#1".into()));
    }

    #[test]
    fn empty_parent_string_marks_the_root() {
        let h = Hierarchy::build(Input::Stratified {
            records: vec![("r", ""), ("a", "r")],
            id: Box::new(|r: &(&'static str, &'static str)| Some(r.0.to_string())),
            parent_id: Box::new(|r: &(&'static str, &'static str)| Some(r.1.to_string())),
        })
        .unwrap();
        assert_eq!(h.root_node().id(), "r");
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn paths_impute_shared_prefixes_once() {
        let h = Hierarchy::build(Input::Paths {
            records: vec!["x/a/1", "x/b", "x/a/2"],
            path: Box::new(|p: &&str| split_path(p)),
        })
        .unwrap();
        assert_eq!(h.len(), 5);
        assert_eq!(h.root_node().id(), "/x");
        assert!(h.root_node().payload().is_none());
        let a = h.find("/x/a").unwrap();
        assert!(h[a].payload().is_none());
        let kids: Vec<&str> = h.children(a).iter().map(|&c| h[c].id()).collect();
        assert_eq!(kids, ["/x/a/1", "/x/a/2"]);
        // First-seen order among siblings.
        let top: Vec<&str> = h.children(h.root()).iter().map(|&c| h[c].id()).collect();
        assert_eq!(top, ["/x/a", "/x/b"]);
    }

    #[test]
    fn paths_keep_the_synthetic_top_for_multiple_branches() {
        let h = Hierarchy::build(Input::Paths {
            records: vec!["a", "b"],
            path: Box::new(|p: &&str| split_path(p)),
        })
        .unwrap();
        assert_eq!(h.root_node().id(), "");
        assert_eq!(h.children(h.root()).len(), 2);
    }

    #[test]
    fn paths_keep_a_level_for_blank_segments() {
        assert_ne!(join_path::<&str>(&[]), join_path(&[""]));
        let h = Hierarchy::build(Input::Paths {
            records: vec![vec!["", "x"], vec!["b"]],
            path: Box::new(|p: &Vec<&'static str>| -> Segments {
                p.iter().map(|s| s.to_string()).collect()
            }),
        })
        .unwrap();
        assert_eq!(h.len(), 4);
        assert_eq!(h.root_node().id(), "");
        let blank = h.find("/").unwrap();
        assert!(h[blank].payload().is_none());
        assert_eq!(h[blank].depth(), 1);
        let x = h.find("//x").unwrap();
        assert_eq!(h[x].depth(), 2);
        assert_eq!(h[x].parent(), Some(blank));
    }

    #[test]
    fn paths_fill_imputed_ancestor_with_later_record() {
        let h = Hierarchy::build(Input::Paths {
            records: vec!["r/a/leaf", "r/a", "r/b"],
            path: Box::new(|p: &&str| split_path(p)),
        })
        .unwrap();
        let a = h.find("/r/a").unwrap();
        assert_eq!(h[a].payload(), Some(&"r/a"));
        assert_eq!(h.children(a).len(), 1);
    }

    #[test]
    fn paths_reject_identical_paths() {
        let err = Hierarchy::build(Input::Paths {
            records: vec!["r/a", "r/a"],
            path: Box::new(|p: &&str| split_path(p)),
        })
        .unwrap_err();
        assert_eq!(err, HierarchyError::DuplicateId("/r/a".into()));
    }

    #[derive(Debug)]
    struct Tree {
        name: &'static str,
        children: Vec<Tree>,
    }

    fn tree_children<'a>(tree: &&'a Tree) -> Vec<&'a Tree> {
        tree.children.iter().collect()
    }

    fn leaf(name: &'static str) -> Tree {
        Tree {
            name,
            children: Vec::new(),
        }
    }

    #[test]
    fn nested_walks_children_and_synthesizes_ids() {
        let data = Tree {
            name: "root",
            children: vec![
                Tree {
                    name: "a",
                    children: vec![leaf("a1"), leaf("a2")],
                },
                leaf("b"),
            ],
        };
        let h = Hierarchy::build(Input::Nested {
            root: &data,
            children: Box::new(tree_children),
            id: None,
        })
        .unwrap();
        assert_eq!(h.len(), 5);
        let ids: Vec<&str> = h.pre_order().into_iter().map(|id| h[id].id()).collect();
        assert_eq!(ids, ["", "0", "0/0", "0/1", "1"]);
        let a2 = h.find("0/1").unwrap();
        assert_eq!(h[a2].payload().map(|t| t.name), Some("a2"));
        assert_eq!(h[a2].depth(), 2);
    }

    #[test]
    fn accessors_follow_precedence() {
        // Path wins over id/parent.
        let input = Accessors {
            path: Some(Box::new(|p: &&str| split_path(p))),
            id: Some(Box::new(|_: &&str| None)),
            ..Accessors::default()
        }
        .into_input(Data::Records(vec!["a/b"]))
        .unwrap();
        assert!(matches!(input, Input::Paths { .. }));

        // A lone parent accessor still selects id/parent mode.
        let input = Accessors {
            parent_id: Some(Box::new(|_: &&str| None)),
            ..Accessors::default()
        }
        .into_input(Data::Nested("a"))
        .unwrap();
        assert!(matches!(input, Input::Stratified { ref records, .. } if records.len() == 1));

        // Nothing tabular: nested mode, which needs exactly one record.
        let err = Accessors::<&str>::default()
            .into_input(Data::Records(vec![]))
            .unwrap_err();
        assert_eq!(err, HierarchyError::EmptyInput);
        let h = Accessors::<&str>::default()
            .build(Data::Records(vec!["solo"]))
            .unwrap();
        assert_eq!(h.len(), 1);
        assert!(h.root_node().is_leaf());
    }
}
