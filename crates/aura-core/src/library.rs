//! Local library import.
//!
//! The library is rebuilt every session from files the user drops or points
//! at; only playlists and recents that reference its tracks are persisted.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::{debug, info};

use crate::state::{AppState, Track, TrackSource, TracklistSource};

pub const LOCAL_ARTIST: &str = "Local File";

pub fn is_playable_audio_path(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());
    matches!(
        ext.as_deref(),
        Some(
            "mp3" | "flac" | "ogg" | "opus" | "m4a" | "aac" | "wav" | "aiff" | "webm" | "mp4"
                | "m4b"
        )
    )
}

/// Add audio files not already in the library (matched by file name).
/// Returns how many were added.
pub fn import_files(state: &mut AppState, paths: &[PathBuf]) -> usize {
    let mut added = 0;
    for path in paths {
        if !is_playable_audio_path(path) {
            debug!("library: skipping non-audio {}", path.display());
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if state.library.iter().any(|t| t.name == name) {
            continue;
        }
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_millis());
        state.library.push(Track {
            id: format!("local-{name}-{modified}"),
            name,
            artist: LOCAL_ARTIST.to_string(),
            source: TrackSource::Local {
                path: path.clone(),
            },
        });
        added += 1;
    }

    if added > 0 {
        state.tracklist_source = TracklistSource::Library;
        info!("library: {} new song(s) added", added);
    }
    added
}

/// Import every playable file directly inside `dir`, newest first.
pub fn import_dir(state: &mut AppState, dir: &Path) -> usize {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return 0;
    };
    let mut files: Vec<(Option<std::time::SystemTime>, PathBuf)> = rd
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if !path.is_file() {
                return None;
            }
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            Some((modified, path))
        })
        .collect();
    files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    let paths: Vec<PathBuf> = files.into_iter().map(|(_, p)| p).collect();
    import_files(state, &paths)
}
