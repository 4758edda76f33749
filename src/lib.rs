//! Change Cache: Write-Tracking over Nested State
//!
//! Records which paths of an in-memory tree of mappings and sequences were
//! updated or removed since the last flush, and packs them into a flat,
//! path-keyed change-set read from live data. The whole tree is never diffed.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod ops;
pub mod pack;
pub mod shadow;
pub mod tree;
pub mod types;
pub mod views;

pub use cache::ChangeCache;
pub use error::{ApiError, PathError};
pub use pack::{ChangeSet, OwnedChangeSet};
pub use shadow::{DirtyTracker, MarkOutcome, Marker, ShadowTree};
pub use tree::{IntoPath, Path};
pub use types::{DataTree, Value};
pub use views::{Tracked, TrackedList, TrackedMap};
