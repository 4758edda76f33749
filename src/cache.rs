//! Change Cache
//!
//! Owns the live data tree and its dirty tracker. The Mutation API here edits
//! the data first and records the edit only once it has succeeded, so a call
//! either fully applies (data changed and tracked) or does nothing.

use crate::config::CacheConfig;
use crate::error::PathError;
use crate::pack::{self, ChangeSet};
use crate::shadow::{DirtyTracker, MarkOutcome};
use crate::tree::resolve::{resolve_container_mut, resolve_sequence_mut};
use crate::tree::{resolve_value, IntoPath, Path};
use crate::types::{DataTree, Value};
use crate::views::Tracked;
use tracing::debug;

/// Write-tracking cache over a nested data tree
///
/// One logical owner per instance; nothing here is synchronized.
#[derive(Debug, Clone)]
pub struct ChangeCache {
    data: DataTree,
    tracker: DirtyTracker,
    clear_on_pack: bool,
}

/// Collapse an internal result into the boolean the Mutation API reports
fn succeeded(op: &'static str, result: Result<(), PathError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(op, error = %e, "Mutation rejected");
            false
        }
    }
}

impl ChangeCache {
    /// Start tracking an already-loaded data tree
    pub fn new(data: DataTree) -> Self {
        ChangeCache {
            data,
            tracker: DirtyTracker::new(),
            clear_on_pack: true,
        }
    }

    /// Like [`ChangeCache::new`], for a value that must be a mapping
    pub fn from_value(value: Value) -> Result<Self, PathError> {
        match value {
            Value::Object(data) => Ok(Self::new(data)),
            _ => Err(PathError::TypeMismatch {
                path: "<root>".to_string(),
                expected: "mapping",
            }),
        }
    }

    pub fn with_config(data: DataTree, config: &CacheConfig) -> Self {
        ChangeCache {
            data,
            tracker: DirtyTracker::with_recording(config.cache.recording),
            clear_on_pack: config.cache.clear_on_pack,
        }
    }

    pub fn data(&self) -> &DataTree {
        &self.data
    }

    pub fn into_data(self) -> DataTree {
        self.data
    }

    /// Untracked access for views that report their own edits
    pub(crate) fn data_mut(&mut self) -> &mut DataTree {
        &mut self.data
    }

    pub fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    pub fn is_recording(&self) -> bool {
        self.tracker.is_recording()
    }

    pub fn begin_recording(&mut self) {
        self.tracker.set_recording(true);
    }

    /// Stop recording, e.g. for bulk loads; pending records are kept
    pub fn stop_recording(&mut self) {
        self.tracker.set_recording(false);
    }

    pub fn set_recording(&mut self, recording: bool) {
        self.tracker.set_recording(recording);
    }

    /// True when anything is recorded and not yet flushed
    pub fn is_dirty(&self) -> bool {
        !self.tracker.is_empty()
    }

    /// Forget all pending records without packing them
    pub fn clear_tracking(&mut self) {
        self.tracker.clear();
    }

    /// Raw value at `path`
    pub fn resolve_value(&self, path: impl IntoPath) -> Result<&Value, PathError> {
        let path = path.into_path()?;
        resolve_value(&self.data, &path)
    }

    /// Report a removal made through some other view of the data
    pub fn notify_removed(&mut self, path: &Path) -> MarkOutcome {
        self.tracker.mark_removed(path)
    }

    /// Report a write made through some other view of the data
    pub fn notify_updated(&mut self, path: &Path) -> MarkOutcome {
        self.tracker.mark_updated(path)
    }

    /// Delete the value at `path`
    pub fn remove(&mut self, path: impl IntoPath) -> bool {
        let result = path
            .into_path()
            .and_then(|path| self.try_remove(&path).map(|_| ()));
        succeeded("remove", result)
    }

    /// Overwrite the value at `path`; intermediate mappings must already exist
    pub fn set(&mut self, path: impl IntoPath, value: impl Into<Value>) -> bool {
        let value = value.into();
        let result = path
            .into_path()
            .and_then(|path| self.try_set(&path, value));
        succeeded("set", result)
    }

    /// Remove the first occurrence of `value` from the sequence at `path`
    pub fn list_remove_value(&mut self, path: impl IntoPath, value: &Value) -> bool {
        let result = path
            .into_path()
            .and_then(|path| self.try_list_remove_value(&path, value));
        succeeded("list_remove_value", result)
    }

    /// Append to the sequence at `path`
    ///
    /// With `exclusive`, a value already present is rejected without mutation.
    pub fn list_append(&mut self, path: impl IntoPath, value: impl Into<Value>, exclusive: bool) -> bool {
        let value = value.into();
        let result = path
            .into_path()
            .and_then(|path| self.try_list_append(&path, value, exclusive));
        match result {
            Ok(appended) => appended,
            Err(e) => succeeded("list_append", Err(e)),
        }
    }

    /// Tracked view of a top-level key
    ///
    /// `key` is taken literally; it is not split on dots.
    pub fn get(&mut self, key: &str) -> Option<Tracked<'_>> {
        let path = Path::key(key).ok()?;
        Tracked::wrap(self, path).ok()
    }

    /// Set a top-level key to `default` when absent, then view it
    pub fn get_or_initialize(&mut self, key: &str, default: impl Into<Value>) -> Option<Tracked<'_>> {
        let path = Path::key(key).ok()?;
        if !self.data.contains_key(key) {
            self.try_set(&path, default.into()).ok()?;
        }
        Tracked::wrap(self, path).ok()
    }

    /// Flatten pending records into a change-set
    ///
    /// With `clear`, both shadow trees are emptied once something was packed.
    /// An empty result leaves the trees untouched.
    pub fn pack(&mut self, clear: bool) -> ChangeSet<'_> {
        let ChangeCache { data, tracker, .. } = self;
        let change_set = pack::pack(tracker.removed(), tracker.updated(), data);
        if change_set.is_empty() {
            return change_set;
        }
        debug!(
            removed = change_set.removed.len(),
            updated = change_set.updated.len(),
            clear,
            "Packed change-set"
        );
        if clear {
            tracker.clear();
        }
        change_set
    }

    /// Pack using the configured clearing behavior
    pub fn flush(&mut self) -> ChangeSet<'_> {
        let clear = self.clear_on_pack;
        self.pack(clear)
    }

    /// Pack without clearing
    pub fn preview(&self) -> ChangeSet<'_> {
        pack::pack(self.tracker.removed(), self.tracker.updated(), &self.data)
    }

    pub(crate) fn try_remove(&mut self, path: &Path) -> Result<Value, PathError> {
        let (container, last) = resolve_container_mut(&mut self.data, path)?;
        let removed = container
            .remove(last)
            .ok_or_else(|| PathError::PathNotFound(path.to_string()))?;
        self.tracker.mark_removed(path);
        Ok(removed)
    }

    pub(crate) fn try_set(&mut self, path: &Path, value: Value) -> Result<(), PathError> {
        let (container, last) = resolve_container_mut(&mut self.data, path)?;
        container.insert(last.to_string(), value);
        self.tracker.mark_updated(path);
        Ok(())
    }

    pub(crate) fn try_list_remove_value(&mut self, path: &Path, value: &Value) -> Result<(), PathError> {
        let items = resolve_sequence_mut(&mut self.data, path)?;
        let index = items
            .iter()
            .position(|item| item == value)
            .ok_or_else(|| PathError::ValueAbsent(path.to_string()))?;
        items.remove(index);
        self.tracker.mark_updated(path);
        Ok(())
    }

    /// `Ok(false)` when `exclusive` rejected a duplicate
    pub(crate) fn try_list_append(
        &mut self,
        path: &Path,
        value: Value,
        exclusive: bool,
    ) -> Result<bool, PathError> {
        let items = resolve_sequence_mut(&mut self.data, path)?;
        if exclusive && items.contains(&value) {
            debug!(path = %path, "Exclusive append rejected duplicate");
            return Ok(false);
        }
        items.push(value);
        self.tracker.mark_updated(path);
        Ok(true)
    }
}
