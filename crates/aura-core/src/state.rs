//! AppState: the single in-memory state of the player.
//!
//! Owned by [`crate::store::StateStore`] and handed out by reference; nothing
//! else keeps a copy. [`PersistedState`] is the subset that goes to storage.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::settings::Settings;
use crate::view::View;

pub const LIKED_SONGS: &str = "Liked Songs";
pub const DEFAULT_USER_NAME: &str = "Aura User";
pub const RECENTS_LIMIT: usize = 20;
pub const YT_HISTORY_LIMIT: usize = 50;

/// Where a track's audio comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TrackSource {
    Local { path: PathBuf },
    Remote { url: String },
    Youtube { video_id: String },
    /// Stored without a usable location, e.g. a local file from an earlier
    /// session. Can only be played after re-importing it into the library.
    #[default]
    Unavailable,
}

/// Older records store `source` as a bare string such as `"local"`.
fn lenient_source<'de, D: Deserializer<'de>>(d: D) -> Result<TrackSource, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A playable track as stored in the library, queue and playlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default, deserialize_with = "lenient_source")]
    pub source: TrackSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }
}

/// Identity of the video currently loaded in the embedded YouTube player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtVideoInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Metadata shown in the now-playing strip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub picture: Option<String>,
}

/// What the track list view is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TracklistSource {
    Library,
    Playlist(String),
    Recents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    None,
    All,
    One,
}

/// The full in-memory state of the application.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Collections ─────────────────────────────────────────────────────────
    /// Imported local tracks; rebuilt every session.
    pub library: Vec<Track>,
    pub playlists: BTreeMap<String, Playlist>,
    /// Track names, most recent first.
    pub recents: Vec<String>,
    pub yt_history: Vec<YtVideoInfo>,

    // ── Identity ────────────────────────────────────────────────────────────
    pub user_name: String,
    pub user_profile_pic: String,
    pub google_auth_token: Option<String>,

    // ── Navigation ──────────────────────────────────────────────────────────
    pub current_view: View,
    pub tracklist_source: TracklistSource,

    // ── Playback ────────────────────────────────────────────────────────────
    pub queue: Vec<Track>,
    pub original_queue: Vec<Track>,
    /// `None` when nothing is loaded, otherwise a valid index into `queue`.
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub is_shuffle: bool,
    pub repeat_mode: RepeatMode,
    pub last_volume: f32,
    pub current_track: TrackMetadata,

    // ── YouTube ─────────────────────────────────────────────────────────────
    pub current_yt_info: YtVideoInfo,
    pub is_yt_audio_only: bool,

    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            library: Vec::new(),
            playlists: BTreeMap::new(),
            recents: Vec::new(),
            yt_history: Vec::new(),
            user_name: DEFAULT_USER_NAME.to_string(),
            user_profile_pic: String::new(),
            google_auth_token: None,
            current_view: View::Home,
            tracklist_source: TracklistSource::Library,
            queue: Vec::new(),
            original_queue: Vec::new(),
            current_index: None,
            is_playing: false,
            is_shuffle: false,
            repeat_mode: RepeatMode::None,
            last_volume: 1.0,
            current_track: TrackMetadata::default(),
            current_yt_info: YtVideoInfo::default(),
            is_yt_audio_only: false,
            settings: Settings::default(),
        }
    }
}

impl AppState {
    /// Track at `current_index`, if one is loaded.
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    pub fn liked_songs(&self) -> Option<&Playlist> {
        self.playlists.get(LIKED_SONGS)
    }

    pub fn is_liked(&self, track_id: &str) -> bool {
        self.liked_songs().map_or(false, |p| p.contains(track_id))
    }

    /// Restore invariants that must hold whatever storage contained.
    pub(crate) fn ensure_invariants(&mut self) {
        self.playlists
            .entry(LIKED_SONGS.to_string())
            .or_insert_with(|| Playlist::new(LIKED_SONGS));
        if let Some(i) = self.current_index {
            if i >= self.queue.len() {
                self.current_index = None;
            }
        }
        self.recents.truncate(RECENTS_LIMIT);
    }

    /// Project the persisted subset.
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            settings: Some(self.settings.clone()),
            recents: Some(self.recents.clone()),
            yt_history: Some(self.yt_history.clone()),
            playlists: Some(self.playlists.clone()),
            last_volume: Some(self.last_volume),
            user_name: Some(self.user_name.clone()),
            user_profile_pic: Some(self.user_profile_pic.clone()),
            google_auth_token: self.google_auth_token.clone(),
            is_yt_audio_only: Some(self.is_yt_audio_only),
        }
    }
}

/// The serialized form of the state record.
///
/// Every field is optional on the way in so that records written by any
/// earlier version still parse; [`crate::store::StateStore::load`] decides
/// what an absent field means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub recents: Option<Vec<String>>,
    #[serde(default)]
    pub yt_history: Option<Vec<YtVideoInfo>>,
    #[serde(default)]
    pub playlists: Option<BTreeMap<String, Playlist>>,
    #[serde(default)]
    pub last_volume: Option<f32>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_profile_pic: Option<String>,
    #[serde(default)]
    pub google_auth_token: Option<String>,
    #[serde(default)]
    pub is_yt_audio_only: Option<bool>,
}

impl PersistedState {
    /// Read a stored record field by field. A field with an unexpected shape
    /// is logged and treated as absent; the rest of the record still loads.
    pub fn from_record(mut record: Map<String, Value>) -> Self {
        Self {
            settings: field(&mut record, "settings"),
            recents: field::<Vec<Value>>(&mut record, "recents")
                .map(|items| lenient_items("recents", items)),
            yt_history: field::<Vec<Value>>(&mut record, "ytHistory")
                .map(|items| lenient_items("ytHistory", items)),
            playlists: field::<Map<String, Value>>(&mut record, "playlists").map(playlists),
            last_volume: field(&mut record, "lastVolume"),
            user_name: field(&mut record, "userName"),
            user_profile_pic: field(&mut record, "userProfilePic"),
            google_auth_token: field(&mut record, "googleAuthToken"),
            is_yt_audio_only: field(&mut record, "isYtAudioOnly"),
        }
    }
}

fn field<T: DeserializeOwned>(record: &mut Map<String, Value>, name: &str) -> Option<T> {
    match record.remove(name)? {
        Value::Null => None,
        value => match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("state: ignoring stored {:?}: {}", name, e);
                None
            }
        },
    }
}

/// Keep the entries that parse, dropping (and logging) the rest.
fn lenient_items<T: DeserializeOwned>(what: &str, items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        warn!("state: dropped {} unreadable {} value(s)", total - kept.len(), what);
    }
    kept
}

fn playlists(stored: Map<String, Value>) -> BTreeMap<String, Playlist> {
    stored
        .into_iter()
        .filter_map(|(key, value)| {
            let Value::Object(mut obj) = value else {
                warn!("state: ignoring playlist {:?}: not an object", key);
                return None;
            };
            let name = match obj.remove("name") {
                Some(Value::String(name)) if !name.is_empty() => name,
                _ => key.clone(),
            };
            let tracks = match obj.remove("tracks") {
                Some(Value::Array(items)) => lenient_items("playlist track", items),
                _ => Vec::new(),
            };
            Some((key, Playlist { name, tracks }))
        })
        .collect()
}
