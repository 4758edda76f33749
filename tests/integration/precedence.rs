//! Conflict resolution between removals, updates and list edits

use change_cache::tree::Path;
use change_cache::MarkOutcome;
use serde_json::json;

use crate::integration::test_utils::player_cache;

fn path(s: &str) -> Path {
    Path::parse(s).unwrap()
}

#[test]
fn test_list_edit_after_removal_of_list_wins() {
    let mut cache = player_cache();
    cache.remove("player.items");
    cache.set("player.items", json!([]));
    assert!(cache.list_append("player.items", 9, false));
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"updated": {"player.items": [9]}})
    );
}

#[test]
fn test_removal_of_parent_drops_pending_list_edits() {
    let mut cache = player_cache();
    cache.list_append("player.items", 4, false);
    cache.list_remove_value("player.items", &json!(1));
    cache.set("player.hp", 1);
    assert!(cache.remove("player"));
    assert!(cache.tracker().updated().is_empty());
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"removed": {"player": true}})
    );
}

#[test]
fn test_recreated_parent_update_overrides_removal() {
    let mut cache = player_cache();
    cache.remove("player");
    cache.set("player", json!({"hp": 1}));
    assert!(cache.tracker().removed().is_empty());
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"updated": {"player": {"hp": 1}}})
    );
}

#[test]
fn test_pending_coarse_removal_suppresses_nested_notify() {
    let mut cache = player_cache();
    cache.remove("player");
    assert_eq!(
        cache.notify_updated(&path("player.hp")),
        MarkOutcome::Suppressed
    );
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"removed": {"player": true}})
    );
}

#[test]
fn test_nested_removal_under_coarse_update_is_folded_in() {
    let mut cache = player_cache();
    cache.set("player", json!({"hp": 100, "mp": 20}));
    assert!(cache.remove("player.mp"));
    assert!(cache.tracker().removed().is_empty());
    // The coarse update carries the removal by omission
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"updated": {"player": {"hp": 100}}})
    );
}

#[test]
fn test_finer_removals_collapse_into_coarse_removal() {
    let mut cache = player_cache();
    cache.remove("player.hp");
    cache.remove("player.items");
    assert_eq!(
        cache.tracker().removed().leaf_paths(),
        vec!["player.hp", "player.items"]
    );
    cache.remove("player");
    assert_eq!(cache.tracker().removed().leaf_paths(), vec!["player"]);
}

#[test]
fn test_stale_removal_is_dropped_when_path_reappears_untracked() {
    let mut cache = player_cache();
    cache.remove("gold");
    cache.stop_recording();
    cache.set("gold", 5);
    cache.begin_recording();
    assert!(cache.pack(true).is_empty());
}
