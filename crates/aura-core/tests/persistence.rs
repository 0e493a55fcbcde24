//! Persisted state across sessions, through the file backend.

mod common;

use aura_core::settings::SettingKey;
use aura_core::state::{LIKED_SONGS, RECENTS_LIMIT};
use aura_core::{FileBackend, LoadOutcome, StateStore};
use serde_json::Value;

use common::{remote_track, KEY};

fn file_store(dir: &std::path::Path) -> StateStore<FileBackend> {
    StateStore::new(FileBackend::new(dir), KEY)
}

#[test]
fn test_old_schema_gets_every_current_key() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("auraPlayerData.json"),
        r#"{"settings":{"musicVisualizer":false,"playerSkin":"","legacyFlag":7},"recents":["x"]}"#,
    )
    .unwrap();

    let mut store = file_store(dir.path());
    assert_eq!(store.load(), LoadOutcome::Loaded);

    let settings = &store.state().settings;
    assert!(settings.has_all_known_keys());
    assert!(!settings.music_visualizer());
    assert_eq!(
        settings.get(SettingKey::PlayerSkin),
        Some(&SettingKey::PlayerSkin.default_value())
    );
    assert_eq!(settings.unknown_keys(), vec!["legacyFlag"]);
    assert!(store.state().liked_songs().is_some_and(|p| p.tracks.is_empty()));
}

#[test]
fn test_unknown_settings_survive_a_save() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("auraPlayerData.json"),
        r#"{"settings":{"legacyFlag":7}}"#,
    )
    .unwrap();

    let mut store = file_store(dir.path());
    store.load();
    assert!(store.save());

    let raw = std::fs::read_to_string(dir.path().join("auraPlayerData.json")).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["settings"]["legacyFlag"], 7);
    assert_eq!(json["settings"]["musicVisualizer"], true);
}

#[test]
fn test_corrupt_record_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("auraPlayerData.json"), "{not json").unwrap();

    let mut store = file_store(dir.path());
    assert_eq!(store.load(), LoadOutcome::Corrupt);
    assert_eq!(store.state().user_name, "Aura User");
    assert_eq!(store.state().last_volume, 1.0);
    assert!(store.state().playlists.contains_key(LIKED_SONGS));
}

#[test]
fn test_state_round_trips_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = file_store(dir.path());
        assert_eq!(store.load(), LoadOutcome::Missing);
        store.set_volume(0.3);
        store.set_user_name("Ada");
        assert!(store.create_playlist("Road"));
        assert!(store.add_to_playlist("Road", remote_track("a")));
        assert!(store.toggle_liked(remote_track("b")));
        for i in 0..25 {
            store.add_recent(&format!("song {i}"));
        }
        store.set_yt_audio_only(true);
    }

    let mut store = file_store(dir.path());
    assert_eq!(store.load(), LoadOutcome::Loaded);
    let state = store.state();
    assert_eq!(state.last_volume, 0.3);
    assert_eq!(state.user_name, "Ada");
    assert_eq!(state.playlists["Road"].tracks.len(), 1);
    assert!(state.is_liked("id-b"));
    assert_eq!(state.recents.len(), RECENTS_LIMIT);
    assert_eq!(state.recents[0], "song 24");
    assert!(state.is_yt_audio_only);
}

#[test]
fn test_recents_move_to_front() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = file_store(dir.path());
    store.load();
    for name in ["C", "B", "A"] {
        store.add_recent(name);
    }
    store.add_recent("B");
    assert_eq!(store.state().recents, vec!["B", "A", "C"]);
}
