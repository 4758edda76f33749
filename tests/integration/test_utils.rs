//! Shared fixtures

use change_cache::ChangeCache;
use serde_json::json;

/// `{player: {hp: 100, items: [1, 2, 3]}, gold: 50}`
pub fn player_cache() -> ChangeCache {
    ChangeCache::from_value(json!({
        "player": {"hp": 100, "items": [1, 2, 3]},
        "gold": 50
    }))
    .unwrap()
}
