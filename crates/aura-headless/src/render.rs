//! Plain-text view renderer.

use std::io::Write;

use aura_core::eq::EqPreset;
use aura_core::settings::SettingKey;
use aura_core::state::{Track, TracklistSource};
use aura_core::theme::{self, FONT_STYLES, PRESET_THEMES, SKINS};
use aura_core::view::ViewRenderer;
use aura_core::{AppState, View};
use tracing::warn;

/// How many YouTube history entries the view lists.
const YT_HISTORY_SHOWN: usize = 10;

pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, view: View, state: &AppState) -> std::io::Result<()> {
        let out = &mut self.out;
        writeln!(out, "── {} ──", view.name())?;
        match view {
            View::Home => draw_tracklist(out, state)?,
            View::Player => {
                let title = state.current_track.title.as_deref().unwrap_or("Nothing playing");
                let artist = state.current_track.artist.as_deref().unwrap_or("");
                writeln!(out, "{title}  {artist}")?;
                let liked = state
                    .current_track()
                    .is_some_and(|t| state.is_liked(&t.id));
                writeln!(
                    out,
                    "shuffle: {}  repeat: {:?}  liked: {}  volume: {:.0}%",
                    on_off(state.is_shuffle),
                    state.repeat_mode,
                    on_off(liked),
                    state.last_volume * 100.0
                )?;
            }
            View::Playlist => {
                for playlist in state.playlists.values() {
                    writeln!(out, "{} ({})", playlist.name, playlist.tracks.len())?;
                }
            }
            View::Youtube => {
                match (&state.current_yt_info.id, &state.current_yt_info.title) {
                    (Some(id), title) => writeln!(
                        out,
                        "now: {} [{}]",
                        title.as_deref().unwrap_or("untitled"),
                        id
                    )?,
                    (None, _) => writeln!(out, "no video loaded")?,
                }
                writeln!(
                    out,
                    "audio-only: {}",
                    on_off(state.is_yt_audio_only)
                )?;
                for info in state.yt_history.iter().take(YT_HISTORY_SHOWN) {
                    writeln!(
                        out,
                        "  {}  {}",
                        info.title.as_deref().unwrap_or("untitled"),
                        info.author.as_deref().unwrap_or("")
                    )?;
                }
            }
            View::Settings => {
                writeln!(out, "user: {}", state.user_name)?;
                for key in SettingKey::ALL {
                    let value = state
                        .settings
                        .get(key)
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    writeln!(out, "  {} = {}", key.name(), value)?;
                }
                for key in state.settings.unknown_keys() {
                    writeln!(out, "  {key} (not recognised)")?;
                }
            }
            View::Equalizer => {
                let active = state.settings.eq_preset();
                for preset in EqPreset::ALL {
                    let mark = if preset == active { "*" } else { " " };
                    writeln!(out, "{mark} {}", preset.label())?;
                }
                let eq = state.settings.effective_eq();
                writeln!(
                    out,
                    "low {:+} dB  mid {:+} dB  high {:+} dB",
                    eq.low, eq.mid, eq.high
                )?;
            }
            View::Themes => {
                let active = state.settings.text(SettingKey::ActiveTheme);
                for name in PRESET_THEMES {
                    let mark = if name == active { "*" } else { " " };
                    writeln!(out, "{mark} {name}")?;
                }
                for (label, key, options) in [
                    ("skin", SettingKey::PlayerSkin, &SKINS[..]),
                    ("font", SettingKey::FontStyle, &FONT_STYLES[..]),
                ] {
                    let current = state.settings.text(key);
                    let shown: Vec<String> = options
                        .iter()
                        .map(|o| if *o == current { format!("[{o}]") } else { o.to_string() })
                        .collect();
                    writeln!(out, "{label}: {}", shown.join(" "))?;
                }
                if let Some((primary, _)) = state.settings.custom_colors() {
                    let palette = theme::smart_palette(&primary);
                    writeln!(
                        out,
                        "custom: {} / {}  border {}",
                        palette.primary,
                        palette.secondary,
                        theme::glass_border(&primary).unwrap_or_default()
                    )?;
                }
            }
        }
        out.flush()
    }
}

impl<W: Write> ViewRenderer for TextRenderer<W> {
    fn render(&mut self, view: View, state: &AppState) {
        if let Err(e) = self.draw(view, state) {
            warn!("render: failed to draw {}: {}", view.name(), e);
        }
    }
}

fn draw_tracklist(out: &mut impl Write, state: &AppState) -> std::io::Result<()> {
    match &state.tracklist_source {
        TracklistSource::Library => {
            if state.library.is_empty() {
                return writeln!(out, "library is empty, `add <file>` to import");
            }
            draw_tracks(out, &state.library)
        }
        TracklistSource::Playlist(name) => match state.playlists.get(name) {
            Some(playlist) => draw_tracks(out, &playlist.tracks),
            None => writeln!(out, "no playlist named {name:?}"),
        },
        TracklistSource::Recents => {
            for name in &state.recents {
                writeln!(out, "  {name}")?;
            }
            Ok(())
        }
    }
}

fn draw_tracks(out: &mut impl Write, tracks: &[Track]) -> std::io::Result<()> {
    for (i, track) in tracks.iter().enumerate() {
        writeln!(out, "{:>3}. {}  {}", i + 1, track.name, track.artist)?;
    }
    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
