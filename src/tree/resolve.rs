//! Walking paths through the live data tree
//!
//! Only mappings are traversed: an intermediate segment whose value is a
//! sequence or scalar is a type mismatch, never an index.

use crate::error::PathError;
use crate::tree::path::Path;
use crate::types::{DataTree, Value};

/// Dotted form of the first `depth + 1` segments, for error reporting
fn prefix(path: &Path, depth: usize) -> String {
    path.segments()[..=depth].join(".")
}

fn descend<'a>(
    map: &'a DataTree,
    segment: &str,
    path: &Path,
    depth: usize,
) -> Result<&'a DataTree, PathError> {
    match map.get(segment) {
        Some(Value::Object(child)) => Ok(child),
        Some(_) => Err(PathError::TypeMismatch {
            path: prefix(path, depth),
            expected: "mapping",
        }),
        None => Err(PathError::PathNotFound(prefix(path, depth))),
    }
}

fn descend_mut<'a>(
    map: &'a mut DataTree,
    segment: &str,
    path: &Path,
    depth: usize,
) -> Result<&'a mut DataTree, PathError> {
    match map.get_mut(segment) {
        Some(Value::Object(child)) => Ok(child),
        Some(_) => Err(PathError::TypeMismatch {
            path: prefix(path, depth),
            expected: "mapping",
        }),
        None => Err(PathError::PathNotFound(prefix(path, depth))),
    }
}

/// Resolve the mapping holding the path's last segment
///
/// `a.b.c` resolves to `(root[a][b], "c")`. The last segment itself need not
/// exist.
pub fn resolve_container<'a, 'p>(
    root: &'a DataTree,
    path: &'p Path,
) -> Result<(&'a DataTree, &'p str), PathError> {
    let (parents, last) = path.split_last();
    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        current = descend(current, segment, path, depth)?;
    }
    Ok((current, last))
}

/// Mutable counterpart of [`resolve_container`]
pub fn resolve_container_mut<'a, 'p>(
    root: &'a mut DataTree,
    path: &'p Path,
) -> Result<(&'a mut DataTree, &'p str), PathError> {
    let (parents, last) = path.split_last();
    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        current = descend_mut(current, segment, path, depth)?;
    }
    Ok((current, last))
}

/// Resolve the value stored at `path`
pub fn resolve_value<'a>(root: &'a DataTree, path: &Path) -> Result<&'a Value, PathError> {
    let (container, last) = resolve_container(root, path)?;
    container
        .get(last)
        .ok_or_else(|| PathError::PathNotFound(path.to_string()))
}

/// Mutable counterpart of [`resolve_value`]
pub fn resolve_value_mut<'a>(
    root: &'a mut DataTree,
    path: &Path,
) -> Result<&'a mut Value, PathError> {
    let (container, last) = resolve_container_mut(root, path)?;
    container
        .get_mut(last)
        .ok_or_else(|| PathError::PathNotFound(path.to_string()))
}

/// Resolve a sequence at `path`; anything else is a type mismatch
pub fn resolve_sequence_mut<'a>(
    root: &'a mut DataTree,
    path: &Path,
) -> Result<&'a mut Vec<Value>, PathError> {
    match resolve_value_mut(root, path)? {
        Value::Array(items) => Ok(items),
        _ => Err(PathError::TypeMismatch {
            path: path.to_string(),
            expected: "sequence",
        }),
    }
}

/// Resolve a mapping at `path`; anything else is a type mismatch
pub fn resolve_mapping_mut<'a>(
    root: &'a mut DataTree,
    path: &Path,
) -> Result<&'a mut DataTree, PathError> {
    match resolve_value_mut(root, path)? {
        Value::Object(map) => Ok(map),
        _ => Err(PathError::TypeMismatch {
            path: path.to_string(),
            expected: "mapping",
        }),
    }
}
