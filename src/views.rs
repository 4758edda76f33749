//! Tracked Views
//!
//! Mapping- and sequence-like handles over sub-trees of a [`ChangeCache`].
//! A view holds only its path and a borrow of the cache; every edit resolves the
//! path afresh and reports itself to the merge engine. Unlike the core Mutation
//! API, views surface [`PathError`] where the underlying container operation
//! would naturally fail.

use crate::cache::ChangeCache;
use crate::error::PathError;
use crate::tree::resolve::{resolve_mapping_mut, resolve_sequence_mut};
use crate::tree::{resolve_value, Path};
use crate::types::{DataTree, Value};

/// A looked-up value: scalars are copied out, containers stay tracked
#[derive(Debug)]
pub enum Tracked<'a> {
    Scalar(Value),
    Map(TrackedMap<'a>),
    List(TrackedList<'a>),
}

impl<'a> Tracked<'a> {
    /// Wrap whatever lives at `path`
    pub fn wrap(cache: &'a mut ChangeCache, path: Path) -> Result<Tracked<'a>, PathError> {
        let is_map = match resolve_value(cache.data(), &path)? {
            Value::Object(_) => true,
            Value::Array(_) => false,
            scalar => return Ok(Tracked::Scalar(scalar.clone())),
        };
        if is_map {
            Ok(Tracked::Map(TrackedMap { cache, path }))
        } else {
            Ok(Tracked::List(TrackedList { cache, path }))
        }
    }

    /// Plain copy of the underlying value, suitable for storing elsewhere
    pub fn to_value(&self) -> Result<Value, PathError> {
        match self {
            Tracked::Scalar(value) => Ok(value.clone()),
            Tracked::Map(map) => map.raw().map(|m| Value::Object(m.clone())),
            Tracked::List(list) => list.raw().map(|items| Value::Array(items.clone())),
        }
    }

    pub fn as_map(&mut self) -> Option<&mut TrackedMap<'a>> {
        match self {
            Tracked::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&mut self) -> Option<&mut TrackedList<'a>> {
        match self {
            Tracked::List(list) => Some(list),
            _ => None,
        }
    }
}

/// Mapping view at a fixed path
#[derive(Debug)]
pub struct TrackedMap<'a> {
    cache: &'a mut ChangeCache,
    path: Path,
}

impl<'a> TrackedMap<'a> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying mapping, untracked
    pub fn raw(&self) -> Result<&DataTree, PathError> {
        match resolve_value(self.cache.data(), &self.path)? {
            Value::Object(map) => Ok(map),
            _ => Err(PathError::TypeMismatch {
                path: self.path.to_string(),
                expected: "mapping",
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.raw().map_or(0, |map| map.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.raw().map_or(false, |map| map.contains_key(key))
    }

    pub fn keys(&self) -> Vec<String> {
        self.raw()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Tracked view of a child
    pub fn get(&mut self, key: &str) -> Option<Tracked<'_>> {
        let child = self.path.child(key).ok()?;
        Tracked::wrap(&mut *self.cache, child).ok()
    }

    /// Child value without tracking
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.raw().ok()?.get(key)
    }

    /// Child value, or `default` when absent
    pub fn get_or(&mut self, key: &str, default: Value) -> Tracked<'_> {
        if !self.contains_key(key) {
            return Tracked::Scalar(default);
        }
        let Ok(child) = self.path.child(key) else {
            return Tracked::Scalar(default);
        };
        match Tracked::wrap(&mut *self.cache, child) {
            Ok(tracked) => tracked,
            Err(_) => Tracked::Scalar(default),
        }
    }

    /// Write a child and mark it updated
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Result<(), PathError> {
        let child = self.path.child(key)?;
        self.cache.try_set(&child, value.into())
    }

    /// Delete a child and mark it removed; missing keys are an error
    pub fn remove(&mut self, key: &str) -> Result<Value, PathError> {
        let child = self.path.child(key)?;
        self.cache.try_remove(&child)
    }

    /// Delete a child if present
    pub fn pop(&mut self, key: &str) -> Option<Value> {
        if !self.contains_key(key) {
            return None;
        }
        self.remove(key).ok()
    }

    /// Insert `default` when the key is absent, then view the child
    pub fn set_default(&mut self, key: &str, default: impl Into<Value>) -> Result<Tracked<'_>, PathError> {
        let child = self.path.child(key)?;
        if !self.contains_key(key) {
            self.cache.try_set(&child, default.into())?;
        }
        Tracked::wrap(&mut *self.cache, child)
    }

    /// Merge entries in; the whole mapping is marked updated
    pub fn update<I>(&mut self, entries: I) -> Result<(), PathError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.update_untracked(entries)?;
        self.cache.notify_updated(&self.path);
        Ok(())
    }

    /// Merge entries in without recording anything
    pub fn update_untracked<I>(&mut self, entries: I) -> Result<(), PathError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let map = resolve_mapping_mut(self.cache.data_mut(), &self.path)?;
        map.extend(entries);
        Ok(())
    }

    /// Empty the mapping; the whole mapping is marked updated
    pub fn clear(&mut self) -> Result<(), PathError> {
        resolve_mapping_mut(self.cache.data_mut(), &self.path)?.clear();
        self.cache.notify_updated(&self.path);
        Ok(())
    }

    /// Remove and return the first entry in iteration order
    pub fn pop_item(&mut self) -> Result<(String, Value), PathError> {
        let key = self
            .raw()?
            .keys()
            .next()
            .cloned()
            .ok_or_else(|| PathError::EmptyContainer(self.path.to_string()))?;
        let value = self.remove(&key)?;
        Ok((key, value))
    }
}

/// Sequence view at a fixed path
///
/// Sequences are tracked as a whole: every successful edit marks the
/// sequence's own path updated.
#[derive(Debug)]
pub struct TrackedList<'a> {
    cache: &'a mut ChangeCache,
    path: Path,
}

impl<'a> TrackedList<'a> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying sequence, untracked
    pub fn raw(&self) -> Result<&Vec<Value>, PathError> {
        match resolve_value(self.cache.data(), &self.path)? {
            Value::Array(items) => Ok(items),
            _ => Err(PathError::TypeMismatch {
                path: self.path.to_string(),
                expected: "sequence",
            }),
        }
    }

    fn items_mut(&mut self) -> Result<&mut Vec<Value>, PathError> {
        resolve_sequence_mut(self.cache.data_mut(), &self.path)
    }

    fn touched(&mut self) {
        self.cache.notify_updated(&self.path);
    }

    pub fn len(&self) -> usize {
        self.raw().map_or(0, |items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.raw().map_or(false, |items| items.contains(value))
    }

    pub fn count(&self, value: &Value) -> usize {
        self.raw()
            .map_or(0, |items| items.iter().filter(|item| *item == value).count())
    }

    /// Position of the first occurrence of `value`
    pub fn index(&self, value: &Value) -> Result<usize, PathError> {
        self.raw()?
            .iter()
            .position(|item| item == value)
            .ok_or_else(|| PathError::ValueAbsent(self.path.to_string()))
    }

    pub fn append(&mut self, value: impl Into<Value>) -> Result<(), PathError> {
        self.cache
            .try_list_append(&self.path, value.into(), false)
            .map(|_| ())
    }

    /// Append; with `exclusive`, values already present are refused
    pub fn push(&mut self, value: impl Into<Value>, exclusive: bool) -> bool {
        self.cache.list_append(&self.path, value, exclusive)
    }

    /// Remove the first occurrence of `value`, if any
    pub fn pull(&mut self, value: &Value) -> bool {
        self.cache.list_remove_value(&self.path, value)
    }

    /// Remove the first occurrence of `value`; absence is an error
    pub fn remove(&mut self, value: &Value) -> Result<(), PathError> {
        self.cache.try_list_remove_value(&self.path, value)
    }

    pub fn pop(&mut self, index: usize) -> Result<Value, PathError> {
        let path = self.path.to_string();
        let items = self.items_mut()?;
        if items.is_empty() {
            return Err(PathError::EmptyContainer(path));
        }
        if index >= items.len() {
            return Err(PathError::IndexOutOfRange {
                path,
                index,
                len: items.len(),
            });
        }
        let value = items.remove(index);
        self.touched();
        Ok(value)
    }

    pub fn extend<I>(&mut self, values: I) -> Result<(), PathError>
    where
        I: IntoIterator<Item = Value>,
    {
        self.items_mut()?.extend(values);
        self.touched();
        Ok(())
    }

    /// Replace the whole contents
    pub fn reset(&mut self, values: Vec<Value>) -> Result<(), PathError> {
        *self.items_mut()? = values;
        self.touched();
        Ok(())
    }

    /// Overwrite the element at `index`; out of range is refused
    pub fn replace_at(&mut self, index: usize, value: impl Into<Value>) -> bool {
        let Ok(items) = self.items_mut() else {
            return false;
        };
        let Some(slot) = items.get_mut(index) else {
            return false;
        };
        *slot = value.into();
        self.touched();
        true
    }

    /// Overwrite the first occurrence of `old`
    pub fn replace_value(&mut self, old: &Value, new: impl Into<Value>) -> bool {
        match self.index(old) {
            Ok(index) => self.replace_at(index, new),
            Err(_) => false,
        }
    }
}
