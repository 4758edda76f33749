//! Core types for the change-tracking cache.

/// Value: any node of the tracked data tree (scalar, mapping or sequence)
pub type Value = serde_json::Value;

/// DataTree: the root mapping owned by a cache
pub type DataTree = serde_json::Map<String, Value>;

/// Separator between path segments in the external (dotted) representation
pub const PATH_SEPARATOR: char = '.';
