//! Packed change-sets for the documented player scenarios

use change_cache::tree::Path;
use serde_json::json;

use crate::integration::test_utils::player_cache;

#[test]
fn test_set_then_pack_then_empty_pack() {
    let mut cache = player_cache();
    assert!(cache.set("player.hp", 90));
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"updated": {"player.hp": 90}})
    );
    assert_eq!(cache.pack(true).to_value(), json!({}));
}

#[test]
fn test_remove_supersedes_update() {
    let mut cache = player_cache();
    assert!(cache.set("player.hp", 90));
    assert!(cache.remove("player.hp"));
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"removed": {"player.hp": true}})
    );
}

#[test]
fn test_independent_paths_are_both_recorded() {
    let mut cache = player_cache();
    assert!(cache.remove("player"));
    // `player` no longer resolves as a mapping
    assert!(!cache.set("player.hp", 70));
    assert!(cache.set("gold", 60));
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"removed": {"player": true}, "updated": {"gold": 60}})
    );
}

#[test]
fn test_coarse_update_subsumes_later_fine_update() {
    let mut cache = player_cache();
    let player = Path::parse("player").unwrap();
    cache.notify_updated(&player);
    let before = cache.tracker().updated().clone();

    assert!(cache.set("player.hp", 70));
    assert_eq!(cache.tracker().updated(), &before);
    assert_eq!(cache.tracker().updated().leaf_paths(), vec!["player"]);

    assert_eq!(
        cache.pack(true).to_value(),
        json!({"updated": {"player": {"hp": 70, "items": [1, 2, 3]}}})
    );
}

#[test]
fn test_exclusive_append() {
    let mut cache = player_cache();
    assert!(cache.list_append("player.items", 4, true));
    assert_eq!(
        cache.resolve_value("player.items").unwrap(),
        &json!([1, 2, 3, 4])
    );
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"updated": {"player.items": [1, 2, 3, 4]}})
    );

    assert!(!cache.list_append("player.items", 4, true));
    assert_eq!(
        cache.resolve_value("player.items").unwrap(),
        &json!([1, 2, 3, 4])
    );
    assert!(!cache.is_dirty());
    assert!(cache.pack(true).is_empty());
}

#[test]
fn test_non_exclusive_append_allows_duplicates() {
    let mut cache = player_cache();
    assert!(cache.list_append("player.items", 3, false));
    assert_eq!(
        cache.resolve_value("player.items").unwrap(),
        &json!([1, 2, 3, 3])
    );
}

#[test]
fn test_updated_values_reflect_live_data_at_pack_time() {
    let mut cache = player_cache();
    cache.set("gold", 60);
    cache.stop_recording();
    cache.set("gold", 61);
    cache.begin_recording();
    assert_eq!(cache.pack(true).to_value(), json!({"updated": {"gold": 61}}));
}

#[test]
fn test_owned_change_set_survives_further_mutation() {
    let mut cache = player_cache();
    cache.set("gold", 60);
    let owned = cache.pack(true).into_owned();
    cache.set("gold", 70);
    assert_eq!(owned.updated["gold"], json!(60));
    assert_eq!(
        serde_json::to_value(&owned).unwrap(),
        json!({"updated": {"gold": 60}})
    );
}
