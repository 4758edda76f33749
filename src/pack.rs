//! Packing Engine
//!
//! Walks both shadow trees alongside the live data tree and flattens them into
//! a path-keyed [`ChangeSet`]. Live data is the authority: markers that
//! disagree with it are dropped silently.

use crate::shadow::{Marker, ShadowTree};
use crate::types::{DataTree, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Flat change-set borrowing its `updated` values from live data
///
/// While a `ChangeSet` is alive the cache that produced it cannot be mutated.
/// Use [`ChangeSet::into_owned`] to keep it longer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet<'a> {
    #[serde(
        skip_serializing_if = "BTreeSet::is_empty",
        serialize_with = "sentinel_set::serialize"
    )]
    pub removed: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub updated: BTreeMap<String, &'a Value>,
}

/// Detached copy of a [`ChangeSet`], as consumed by persistence layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnedChangeSet {
    #[serde(
        default,
        skip_serializing_if = "BTreeSet::is_empty",
        with = "sentinel_set"
    )]
    pub removed: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub updated: BTreeMap<String, Value>,
}

impl<'a> ChangeSet<'a> {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.updated.is_empty()
    }

    /// Number of flattened entries across both sections
    pub fn len(&self) -> usize {
        self.removed.len() + self.updated.len()
    }

    pub fn into_owned(self) -> OwnedChangeSet {
        OwnedChangeSet {
            removed: self.removed,
            updated: self
                .updated
                .into_iter()
                .map(|(path, value)| (path, value.clone()))
                .collect(),
        }
    }

    /// JSON rendering: `{"removed": {path: true}, "updated": {path: value}}`
    pub fn to_value(&self) -> Value {
        render(
            &self.removed,
            self.updated.iter().map(|(path, value)| (path, *value)),
        )
    }
}

impl OwnedChangeSet {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.updated.is_empty()
    }

    pub fn len(&self) -> usize {
        self.removed.len() + self.updated.len()
    }

    pub fn to_value(&self) -> Value {
        render(&self.removed, self.updated.iter())
    }
}

fn render<'v>(
    removed: &BTreeSet<String>,
    updated: impl Iterator<Item = (&'v String, &'v Value)>,
) -> Value {
    let mut out = serde_json::Map::new();
    if !removed.is_empty() {
        let removed = removed
            .iter()
            .map(|path| (path.clone(), Value::Bool(true)))
            .collect();
        out.insert("removed".to_string(), Value::Object(removed));
    }
    let updated: serde_json::Map<String, Value> = updated
        .map(|(path, value)| (path.clone(), value.clone()))
        .collect();
    if !updated.is_empty() {
        out.insert("updated".to_string(), Value::Object(updated));
    }
    Value::Object(out)
}

/// Removed paths travel as `{path: true}`
mod sentinel_set {
    use serde::de::Deserializer;
    use serde::ser::{SerializeMap, Serializer};
    use serde::Deserialize;
    use std::collections::{BTreeMap, BTreeSet};

    pub fn serialize<S: Serializer>(set: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(set.len()))?;
        for path in set {
            map.serialize_entry(path, &true)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
        let map = BTreeMap::<String, bool>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .filter_map(|(path, flag)| flag.then_some(path))
            .collect())
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Flatten both shadow trees against `data`
pub fn pack<'a>(removed: &ShadowTree, updated: &ShadowTree, data: &'a DataTree) -> ChangeSet<'a> {
    let mut change_set = ChangeSet::default();
    pack_removed(removed.root(), data, "", &mut change_set.removed);
    pack_updated(updated.root(), data, "", &mut change_set.updated);
    change_set
}

/// A removal is emitted where its key is gone from live data. A marker whose
/// key is still present was re-created outside tracking and is stale.
fn pack_removed(
    markers: &BTreeMap<String, Marker>,
    live: &DataTree,
    prefix: &str,
    out: &mut BTreeSet<String>,
) {
    for (key, marker) in markers {
        let path = join(prefix, key);
        let Some(value) = live.get(key) else {
            out.insert(path);
            continue;
        };
        match (marker, value) {
            (Marker::Leaf, _) => {
                trace!(path = %path, "Dropping stale removal; path present in live data");
            }
            (Marker::Branch(children), Value::Object(child)) => {
                pack_removed(children, child, &path, out);
            }
            (Marker::Branch(_), _) => {
                trace!(path = %path, "Dropping stale removals below non-mapping value");
            }
        }
    }
}

/// An update is emitted with the current live value; markers whose path no
/// longer exists are stale.
fn pack_updated<'a>(
    markers: &BTreeMap<String, Marker>,
    live: &'a DataTree,
    prefix: &str,
    out: &mut BTreeMap<String, &'a Value>,
) {
    for (key, marker) in markers {
        let path = join(prefix, key);
        let Some(value) = live.get(key) else {
            trace!(path = %path, "Dropping stale update; path absent from live data");
            continue;
        };
        match (marker, value) {
            (Marker::Leaf, value) => {
                out.insert(path, value);
            }
            (Marker::Branch(children), Value::Object(child)) => {
                pack_updated(children, child, &path, out);
            }
            (Marker::Branch(_), _) => {
                trace!(path = %path, "Dropping stale updates below non-mapping value");
            }
        }
    }
}
