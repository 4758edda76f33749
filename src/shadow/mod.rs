//! Shadow Trees
//!
//! A shadow tree mirrors the shape of the data tree only where something was
//! recorded. Each node is either a [`Marker::Leaf`] ("everything from here down
//! is dirty") or a [`Marker::Branch`] continuing finer tracking below.
//!
//! Two invariants hold for every tree built through [`ShadowTree::mark`] and
//! [`ShadowTree::prune`]:
//! - nothing is ever recorded below a leaf (coarse dirty subsumes fine dirty)
//! - no branch is left empty; pruning collapses emptied ancestors

pub mod tracker;

pub use tracker::{DirtyTracker, MarkOutcome};

use crate::tree::Path;
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A node of a shadow tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// The whole subtree at this path is dirty
    Leaf,
    /// Tracking continues per child key
    Branch(BTreeMap<String, Marker>),
}

impl Marker {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Marker::Leaf)
    }
}

/// Leaves serialize as `true`, branches as nested maps
impl Serialize for Marker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Marker::Leaf => serializer.serialize_bool(true),
            Marker::Branch(children) => children.serialize(serializer),
        }
    }
}

/// Root mapping of markers, keyed like the data tree's root
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ShadowTree {
    root: BTreeMap<String, Marker>,
}

impl ShadowTree {
    pub fn new() -> Self {
        ShadowTree::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn clear(&mut self) {
        self.root.clear();
    }

    pub fn root(&self) -> &BTreeMap<String, Marker> {
        &self.root
    }

    /// Marker stored exactly at `path`, if any
    pub fn get(&self, path: &Path) -> Option<&Marker> {
        let (parents, last) = path.split_last();
        let mut current = &self.root;
        for segment in parents {
            match current.get(segment)? {
                Marker::Leaf => return None,
                Marker::Branch(children) => current = children,
            }
        }
        current.get(last)
    }

    /// True when a leaf sits at `path` or at one of its ancestors
    pub fn covers(&self, path: &Path) -> bool {
        let mut current = &self.root;
        for segment in path.segments() {
            match current.get(segment) {
                None => return false,
                Some(Marker::Leaf) => return true,
                Some(Marker::Branch(children)) => current = children,
            }
        }
        false
    }

    /// Dotted paths of every leaf, in key order
    pub fn leaf_paths(&self) -> Vec<String> {
        fn collect(markers: &BTreeMap<String, Marker>, prefix: &str, out: &mut Vec<String>) {
            for (key, marker) in markers {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                match marker {
                    Marker::Leaf => out.push(path),
                    Marker::Branch(children) => collect(children, &path, out),
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.root, "", &mut out);
        out
    }

    /// Write a leaf at `path`, replacing any finer records below it
    ///
    /// Returns false without writing when an ancestor already holds a leaf.
    pub fn mark(&mut self, path: &Path) -> bool {
        let (parents, last) = path.split_last();
        let mut current = &mut self.root;
        for segment in parents {
            let node = current
                .entry(segment.clone())
                .or_insert_with(|| Marker::Branch(BTreeMap::new()));
            match node {
                Marker::Leaf => return false,
                Marker::Branch(children) => current = children,
            }
        }
        current.insert(last.to_string(), Marker::Leaf);
        true
    }

    /// Remove every marker at or below `path`
    ///
    /// Fails, leaving the tree untouched, when a strict ancestor of `path`
    /// holds a leaf. Emptied ancestor branches are removed.
    pub fn prune(&mut self, path: &Path) -> bool {
        prune_in(&mut self.root, path.segments())
    }
}

fn prune_in(markers: &mut BTreeMap<String, Marker>, segments: &[String]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return true;
    };
    if rest.is_empty() {
        markers.remove(first);
        return true;
    }
    let Some(node) = markers.get_mut(first) else {
        return true;
    };
    let (pruned, emptied) = match node {
        Marker::Leaf => return false,
        Marker::Branch(children) => {
            let pruned = prune_in(children, rest);
            (pruned, children.is_empty())
        }
    };
    if emptied {
        markers.remove(first);
    }
    pruned
}
