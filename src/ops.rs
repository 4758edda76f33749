//! Operation Journal
//!
//! Serializable records of Mutation API calls. A journal replayed against a
//! cache reproduces both the data edits and the tracking they generate, which
//! is what the `change-cache replay` command is built on.

use crate::cache::ChangeCache;
use crate::pack::OwnedChangeSet;
use crate::shadow::MarkOutcome;
use crate::tree::Path;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One journal entry, tagged by `op`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Set {
        path: Path,
        value: Value,
    },
    Remove {
        path: Path,
    },
    /// Remove the first occurrence of `value` from a sequence
    Pull {
        path: Path,
        value: Value,
    },
    /// Append to a sequence; `exclusive` gives set-like semantics
    Push {
        path: Path,
        value: Value,
        #[serde(default)]
        exclusive: bool,
    },
    NotifyUpdated {
        path: Path,
    },
    NotifyRemoved {
        path: Path,
    },
    StopRecording,
    BeginRecording,
    Pack {
        #[serde(default = "default_clear")]
        clear: bool,
    },
}

fn default_clear() -> bool {
    true
}

/// What applying an [`Operation`] produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Mutation API result
    Applied(bool),
    /// Direct merge-engine call
    Marked(MarkOutcome),
    /// Recording switched to the given state
    Recording(bool),
    Packed(OwnedChangeSet),
}

impl Operation {
    pub fn apply(&self, cache: &mut ChangeCache) -> Outcome {
        match self {
            Operation::Set { path, value } => Outcome::Applied(cache.set(path, value.clone())),
            Operation::Remove { path } => Outcome::Applied(cache.remove(path)),
            Operation::Pull { path, value } => {
                Outcome::Applied(cache.list_remove_value(path, value))
            }
            Operation::Push {
                path,
                value,
                exclusive,
            } => Outcome::Applied(cache.list_append(path, value.clone(), *exclusive)),
            Operation::NotifyUpdated { path } => Outcome::Marked(cache.notify_updated(path)),
            Operation::NotifyRemoved { path } => Outcome::Marked(cache.notify_removed(path)),
            Operation::StopRecording => {
                cache.stop_recording();
                Outcome::Recording(false)
            }
            Operation::BeginRecording => {
                cache.begin_recording();
                Outcome::Recording(true)
            }
            Operation::Pack { clear } => Outcome::Packed(cache.pack(*clear).into_owned()),
        }
    }
}

/// Apply every operation in order
pub fn replay(cache: &mut ChangeCache, ops: &[Operation]) -> Vec<Outcome> {
    let outcomes: Vec<Outcome> = ops.iter().map(|op| op.apply(cache)).collect();
    let rejected = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Outcome::Applied(false)))
        .count();
    debug!(operations = ops.len(), rejected, "Replayed journal");
    outcomes
}
