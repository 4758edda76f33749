//! Dirty-Tracking Merge Engine
//!
//! Keeps the `removed` and `updated` shadow trees mutually consistent. Every
//! mark first prunes the path from the opposite tree; only when that prune
//! succeeds is the new record written. A coarser opposite-kind leaf above the
//! path makes the prune fail and suppresses the record, since packing will
//! read that whole ancestor from live data anyway.

use crate::shadow::ShadowTree;
use crate::tree::Path;
use tracing::{debug, trace};

/// Result of a single mark call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// A leaf was written at the path
    Recorded,
    /// A same-kind leaf above the path already covers it
    Subsumed,
    /// An opposite-kind leaf above the path takes precedence
    Suppressed,
    /// Recording is switched off
    Paused,
}

/// The two shadow trees plus the recording switch
///
/// Single owner: no internal synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyTracker {
    removed: ShadowTree,
    updated: ShadowTree,
    recording: bool,
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::with_recording(true)
    }

    pub fn with_recording(recording: bool) -> Self {
        DirtyTracker {
            removed: ShadowTree::new(),
            updated: ShadowTree::new(),
            recording,
        }
    }

    pub fn removed(&self) -> &ShadowTree {
        &self.removed
    }

    pub fn updated(&self) -> &ShadowTree {
        &self.updated
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Toggle recording; accumulated records are kept either way
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.updated.is_empty()
    }

    pub fn clear(&mut self) {
        self.removed.clear();
        self.updated.clear();
    }

    /// Record that the value at `path` was deleted
    pub fn mark_removed(&mut self, path: &Path) -> MarkOutcome {
        if !self.recording {
            return MarkOutcome::Paused;
        }
        if !self.updated.prune(path) {
            debug!(path = %path, "Removal covered by pending ancestor update");
            return MarkOutcome::Suppressed;
        }
        Self::record(&mut self.removed, path, "removed")
    }

    /// Record that the value at `path` was written
    pub fn mark_updated(&mut self, path: &Path) -> MarkOutcome {
        if !self.recording {
            return MarkOutcome::Paused;
        }
        if !self.removed.prune(path) {
            debug!(path = %path, "Update covered by pending ancestor removal");
            return MarkOutcome::Suppressed;
        }
        Self::record(&mut self.updated, path, "updated")
    }

    fn record(tree: &mut ShadowTree, path: &Path, kind: &'static str) -> MarkOutcome {
        if tree.mark(path) {
            trace!(path = %path, kind, "Recorded dirty path");
            MarkOutcome::Recorded
        } else {
            trace!(path = %path, kind, "Dirty path already covered");
            MarkOutcome::Subsumed
        }
    }
}
