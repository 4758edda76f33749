//! Pausing and resuming recording

use serde_json::json;

use crate::integration::test_utils::player_cache;

#[test]
fn test_paused_mutations_change_data_only() {
    let mut cache = player_cache();
    cache.stop_recording();
    assert!(!cache.is_recording());
    assert!(cache.set("gold", 999));
    assert_eq!(cache.resolve_value("gold").unwrap(), &json!(999));
    assert_eq!(cache.pack(true).to_value(), json!({}));

    cache.begin_recording();
    assert!(cache.set("gold", 1000));
    assert_eq!(cache.pack(true).to_value(), json!({"updated": {"gold": 1000}}));
}

#[test]
fn test_pausing_keeps_earlier_records() {
    let mut cache = player_cache();
    cache.set("player.hp", 1);
    cache.stop_recording();
    cache.set("gold", 2);
    cache.remove("player.items");
    cache.begin_recording();
    assert_eq!(
        cache.pack(true).to_value(),
        json!({"updated": {"player.hp": 1}})
    );
}

#[test]
fn test_bulk_load_through_views_is_untracked() {
    let mut cache = player_cache();
    cache.stop_recording();
    {
        let mut player = cache.get("player").unwrap();
        let map = player.as_map().unwrap();
        map.insert("mp", 10).unwrap();
        let mut items = map.get("items").unwrap();
        items.as_list().unwrap().append(4).unwrap();
    }
    cache.set_recording(true);
    assert!(!cache.is_dirty());
    assert_eq!(cache.resolve_value("player.mp").unwrap(), &json!(10));
}
