//! StateStore: owns [`AppState`] and its persistence.
//!
//! The whole persisted subset lives in one JSON record behind a
//! [`StorageBackend`]. Every mutation goes through the store and is written
//! immediately. Storage failures are logged and swallowed: none of the public
//! entry points return an error or panic on bad data.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::settings::{SettingKey, Settings};
use crate::state::{
    AppState, PersistedState, Playlist, Track, YtVideoInfo, DEFAULT_USER_NAME, LIKED_SONGS,
    RECENTS_LIMIT, YT_HISTORY_LIMIT,
};

/// A named-record key/value store.
pub trait StorageBackend {
    /// `Ok(None)` when no record exists under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each record as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write-then-rename so a crash never leaves a truncated record.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-process backend for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, key: &str, value: impl Into<String>) -> Self {
        self.records.insert(key.to_string(), value.into());
        self
    }

    /// Make every subsequent write fail, as a full or read-only store would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn record(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Backend("storage quota exceeded".to_string()));
        }
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Result of [`StateStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No record stored; defaults kept.
    Missing,
    Loaded,
    /// A record exists but could not be read or parsed; defaults kept.
    Corrupt,
}

pub struct StateStore<B: StorageBackend> {
    backend: B,
    key: String,
    state: AppState,
}

impl<B: StorageBackend> StateStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self::with_state(backend, key, AppState::default())
    }

    pub fn with_state(backend: B, key: impl Into<String>, mut state: AppState) -> Self {
        state.ensure_invariants();
        Self {
            backend,
            key: key.into(),
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Direct access for ephemeral fields (queue, view, playback flags).
    /// Persisted fields should go through the mutation methods so they are saved.
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    // ── Load / save ─────────────────────────────────────────────────────────

    pub fn load(&mut self) -> LoadOutcome {
        let outcome = match self.backend.read(&self.key) {
            Ok(None) => {
                debug!("state: no stored record under {:?}", self.key);
                LoadOutcome::Missing
            }
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(record)) => {
                    self.apply(PersistedState::from_record(record));
                    LoadOutcome::Loaded
                }
                Ok(_) => {
                    warn!("state: stored record is not an object, using defaults");
                    LoadOutcome::Corrupt
                }
                Err(e) => {
                    warn!("state: failed to parse stored record, using defaults: {}", e);
                    LoadOutcome::Corrupt
                }
            },
            Err(e) => {
                warn!("state: failed to read stored record, using defaults: {}", e);
                LoadOutcome::Corrupt
            }
        };
        self.state.ensure_invariants();
        outcome
    }

    fn apply(&mut self, persisted: PersistedState) {
        let stored = persisted.settings.map(Settings::into_map).unwrap_or_default();
        let settings = Settings::merged(stored);
        let unknown = settings.unknown_keys();
        if !unknown.is_empty() {
            info!(
                "state: keeping {} setting(s) not in the current schema: {:?}",
                unknown.len(),
                unknown
            );
        }

        let s = &mut self.state;
        s.settings = settings;
        s.last_volume = match persisted.last_volume {
            Some(v) if v.is_finite() && v > 0.0 => v.min(1.0),
            _ => 1.0,
        };
        s.user_name = persisted
            .user_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
        s.user_profile_pic = persisted.user_profile_pic.unwrap_or_default();
        s.google_auth_token = persisted.google_auth_token.filter(|t| !t.is_empty());
        s.is_yt_audio_only = persisted.is_yt_audio_only.unwrap_or(false);
        s.playlists = persisted.playlists.unwrap_or_default();
        s.recents = persisted.recents.unwrap_or_default();
        s.yt_history = persisted.yt_history.unwrap_or_default();

        info!(
            "state: loaded {} playlist(s), {} recent(s)",
            s.playlists.len(),
            s.recents.len()
        );
    }

    /// Write the persisted subset. Returns `false` (after logging) on failure.
    pub fn save(&mut self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                error!("state: failed to save: {}", e);
                false
            }
        }
    }

    fn try_save(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.state.to_persisted())?;
        self.backend.write(&self.key, &json)
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    /// Move `name` to the front of recents, keeping at most [`RECENTS_LIMIT`].
    pub fn add_recent(&mut self, name: &str) {
        let recents = &mut self.state.recents;
        recents.retain(|r| r != name);
        recents.insert(0, name.to_string());
        recents.truncate(RECENTS_LIMIT);
        self.save();
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.state.last_volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.save();
    }

    pub fn set_setting(&mut self, key: SettingKey, value: impl Into<Value>) {
        self.state.settings.set(key, value);
        self.save();
    }

    /// Flip the master AI switch; returns the new value.
    pub fn toggle_ai_features(&mut self) -> bool {
        let enabled = !self.state.settings.ai_features_enabled();
        self.set_setting(SettingKey::AiFeaturesEnabled, enabled);
        enabled
    }

    pub fn set_user_name(&mut self, name: &str) {
        let name = name.trim();
        self.state.user_name = if name.is_empty() {
            DEFAULT_USER_NAME.to_string()
        } else {
            name.to_string()
        };
        self.save();
    }

    pub fn set_yt_audio_only(&mut self, enabled: bool) {
        self.state.is_yt_audio_only = enabled;
        self.save();
    }

    /// Record a watched video, most recent first, de-duplicated by id.
    pub fn push_yt_history(&mut self, info: YtVideoInfo) {
        if let Some(id) = info.id.as_deref() {
            self.state
                .yt_history
                .retain(|h| h.id.as_deref() != Some(id));
        }
        self.state.yt_history.insert(0, info);
        self.state.yt_history.truncate(YT_HISTORY_LIMIT);
        self.save();
    }

    /// Returns `false` if the name is blank or already taken.
    pub fn create_playlist(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.state.playlists.contains_key(name) {
            return false;
        }
        self.state
            .playlists
            .insert(name.to_string(), Playlist::new(name));
        self.save();
        true
    }

    /// "Liked Songs" cannot be deleted.
    pub fn delete_playlist(&mut self, name: &str) -> bool {
        if name == LIKED_SONGS || self.state.playlists.remove(name).is_none() {
            return false;
        }
        self.save();
        true
    }

    /// Returns `false` if the playlist is unknown or already has the track.
    pub fn add_to_playlist(&mut self, name: &str, track: Track) -> bool {
        let Some(playlist) = self.state.playlists.get_mut(name) else {
            return false;
        };
        if playlist.contains(&track.id) {
            return false;
        }
        playlist.tracks.push(track);
        self.save();
        true
    }

    pub fn remove_from_playlist(&mut self, name: &str, track_id: &str) -> bool {
        let Some(playlist) = self.state.playlists.get_mut(name) else {
            return false;
        };
        let before = playlist.tracks.len();
        playlist.tracks.retain(|t| t.id != track_id);
        if playlist.tracks.len() == before {
            return false;
        }
        self.save();
        true
    }

    /// Add or remove `track` from "Liked Songs"; returns whether it is now liked.
    pub fn toggle_liked(&mut self, track: Track) -> bool {
        if self.state.is_liked(&track.id) {
            self.remove_from_playlist(LIKED_SONGS, &track.id);
            false
        } else {
            self.add_to_playlist(LIKED_SONGS, track);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TrackSource;
    use serde_json::json;

    const KEY: &str = "auraPlayerData";

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            name: format!("{id}.mp3"),
            artist: "Local File".to_string(),
            source: TrackSource::Local {
                path: PathBuf::from(format!("/music/{id}.mp3")),
            },
        }
    }

    fn store_with(record: Option<&str>) -> StateStore<MemoryBackend> {
        let backend = match record {
            Some(r) => MemoryBackend::new().with_record(KEY, r),
            None => MemoryBackend::new(),
        };
        StateStore::new(backend, KEY)
    }

    #[test]
    fn test_load_missing_keeps_defaults() {
        let mut store = store_with(None);
        assert_eq!(store.load(), LoadOutcome::Missing);
        assert_eq!(store.state().user_name, DEFAULT_USER_NAME);
        assert_eq!(store.state().last_volume, 1.0);
        assert!(store.state().liked_songs().unwrap().tracks.is_empty());
    }

    #[test]
    fn test_load_corrupt_keeps_defaults() {
        let mut store = store_with(Some("{not json"));
        assert_eq!(store.load(), LoadOutcome::Corrupt);
        assert!(store.state().settings.has_all_known_keys());
        assert!(store.state().liked_songs().is_some());
    }

    #[test]
    fn test_load_scalar_fallbacks() {
        let record = json!({
            "lastVolume": 0,
            "userName": "",
            "googleAuthToken": "",
            "isYtAudioOnly": true
        });
        let mut store = store_with(Some(&record.to_string()));
        assert_eq!(store.load(), LoadOutcome::Loaded);
        let s = store.state();
        assert_eq!(s.last_volume, 1.0);
        assert_eq!(s.user_name, DEFAULT_USER_NAME);
        assert_eq!(s.google_auth_token, None);
        assert!(s.is_yt_audio_only);
    }

    #[test]
    fn test_load_keeps_valid_fields_next_to_bad_ones() {
        let mut store = store_with(Some(
            r#"{"settings":{"musicVisualizer":false},"recents":["a.mp3"],"isYtAudioOnly":1}"#,
        ));
        assert_eq!(store.load(), LoadOutcome::Loaded);
        let s = store.state();
        assert!(!s.settings.music_visualizer());
        assert!(s.settings.has_all_known_keys());
        assert_eq!(s.recents, vec!["a.mp3"]);
        assert!(!s.is_yt_audio_only);
    }

    #[test]
    fn test_load_accepts_tracks_with_bare_source() {
        let record = json!({
            "userName": "Ada",
            "playlists": {
                "Road": {
                    "name": "Road",
                    "tracks": [{ "name": "a.mp3", "id": "local-a", "artist": "Local File", "source": "local" }]
                }
            }
        });
        let mut store = store_with(Some(&record.to_string()));
        assert_eq!(store.load(), LoadOutcome::Loaded);
        let s = store.state();
        assert_eq!(s.user_name, "Ada");
        assert!(s.playlists["Road"].contains("local-a"));
        assert!(s.liked_songs().is_some());
    }

    #[test]
    fn test_load_non_object_is_corrupt() {
        let mut store = store_with(Some("[1, 2]"));
        assert_eq!(store.load(), LoadOutcome::Corrupt);
        assert_eq!(store.state().user_name, DEFAULT_USER_NAME);
    }

    #[test]
    fn test_add_recent_moves_to_front() {
        let mut store = store_with(None);
        for name in ["C", "B", "A"] {
            store.add_recent(name);
        }
        assert_eq!(store.state().recents, vec!["A", "B", "C"]);
        store.add_recent("B");
        assert_eq!(store.state().recents, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_add_recent_caps_at_limit() {
        let mut store = store_with(None);
        for i in 0..30 {
            store.add_recent(&format!("track-{i}"));
        }
        let recents = &store.state().recents;
        assert_eq!(recents.len(), RECENTS_LIMIT);
        assert_eq!(recents[0], "track-29");
        assert_eq!(recents[RECENTS_LIMIT - 1], "track-10");
    }

    #[test]
    fn test_add_recent_persists() {
        let mut store = store_with(None);
        store.add_recent("song.flac");
        let raw = store.backend().record(KEY).unwrap();
        let persisted: PersistedState = serde_json::from_str(raw).unwrap();
        assert_eq!(persisted.recents, Some(vec!["song.flac".to_string()]));
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let mut store = store_with(None);
        store.backend_mut().set_fail_writes(true);
        assert!(!store.save());
        store.add_recent("still works");
        assert_eq!(store.state().recents, vec!["still works"]);
    }

    #[test]
    fn test_playlists() {
        let mut store = store_with(None);
        assert!(store.create_playlist("Road Trip"));
        assert!(!store.create_playlist("Road Trip"));
        assert!(!store.create_playlist("   "));
        assert!(store.add_to_playlist("Road Trip", track("a")));
        assert!(!store.add_to_playlist("Road Trip", track("a")));
        assert!(!store.add_to_playlist("Nope", track("a")));
        assert!(store.remove_from_playlist("Road Trip", "a"));
        assert!(!store.delete_playlist(LIKED_SONGS));
        assert!(store.delete_playlist("Road Trip"));
    }

    #[test]
    fn test_toggle_liked() {
        let mut store = store_with(None);
        assert!(store.toggle_liked(track("x")));
        assert!(store.state().is_liked("x"));
        assert!(!store.toggle_liked(track("x")));
        assert!(!store.state().is_liked("x"));
    }

    #[test]
    fn test_yt_history_dedup() {
        let mut store = store_with(None);
        let video = |id: &str| YtVideoInfo {
            id: Some(id.to_string()),
            ..YtVideoInfo::default()
        };
        store.push_yt_history(video("aaaaaaaaaaa"));
        store.push_yt_history(video("bbbbbbbbbbb"));
        store.push_yt_history(video("aaaaaaaaaaa"));
        let ids: Vec<_> = store
            .state()
            .yt_history
            .iter()
            .filter_map(|h| h.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb"]);
    }

    #[test]
    fn test_toggle_ai_features() {
        let mut store = store_with(None);
        assert!(!store.toggle_ai_features());
        assert!(!store.state().settings.ai_features_enabled());
        assert!(store.toggle_ai_features());
    }
}
