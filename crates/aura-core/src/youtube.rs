//! Audio-only mode for the embedded YouTube player.
//!
//! The player keeps running the whole time; audio-only mode only hides its
//! video surface and shows a thumbnail in its place. Hiding and showing must
//! never start or stop playback.
//!
//! The saved preference is applied on startup before the player exists, so
//! [`AudioOnlyToggle::set_audio_only_mode`] distinguishes two cases:
//! without a player it only updates the presentation; with a player the call
//! is a user decision and is persisted.

use regex::Regex;
use tracing::{debug, warn};

use crate::state::AppState;
use crate::store::{StateStore, StorageBackend};

pub const THUMBNAIL_URL_TEMPLATE: &str = "https://i.ytimg.com/vi/{videoId}/hqdefault.jpg";

pub fn thumbnail_url(video_id: &str) -> String {
    THUMBNAIL_URL_TEMPLATE.replace("{videoId}", video_id)
}

/// Pull the video id out of an embed URL such as
/// `https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1`.
pub fn video_id_from_embed(src: &str) -> Option<String> {
    let re = Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]{6,})").ok()?;
    let caps = re.captures(src)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// The narrow slice of the YouTube IFrame player this module needs.
pub trait VideoPlayer {
    fn is_playing(&self) -> bool;
}

/// Elements of the YouTube view the toggle reads or creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YtElement {
    ControlsArea,
    PlayerContainer,
    ToggleButton,
    Thumbnail,
    Styles,
}

impl YtElement {
    pub fn dom_id(self) -> &'static str {
        match self {
            YtElement::ControlsArea => "yt-info-and-controls",
            YtElement::PlayerContainer => "yt-player-container",
            YtElement::ToggleButton => "yt-toggle-video-btn",
            YtElement::Thumbnail => "yt-audio-thumbnail",
            YtElement::Styles => "yt-audio-toggle-styles",
        }
    }
}

/// Icon, text and tooltip of the toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleLabel {
    pub icon: &'static str,
    pub text: &'static str,
    pub title: &'static str,
}

/// Shown right after injection, before any mode is applied.
pub const LABEL_INITIAL: ToggleLabel = ToggleLabel {
    icon: "fa-eye-slash",
    text: "Audio-only",
    title: "Toggle Video / Audio-only",
};
/// Shown while audio-only mode is on.
pub const LABEL_SHOW_VIDEO: ToggleLabel = ToggleLabel {
    icon: "fa-eye",
    text: "Video",
    title: "Switch to video view",
};
/// Shown while the video is visible.
pub const LABEL_HIDE_VIDEO: ToggleLabel = ToggleLabel {
    icon: "fa-eye-slash",
    text: "Audio-only",
    title: "Switch to audio-only view",
};

/// The rendered YouTube view, as far as the toggle is concerned.
pub trait YtSurface {
    /// How many copies of `element` are in the document.
    fn count(&self, element: YtElement) -> usize;

    fn contains(&self, element: YtElement) -> bool {
        self.count(element) > 0
    }

    /// Insert the button, thumbnail placeholder (hidden, no image) or style block.
    fn inject(&mut self, element: YtElement);

    fn set_audio_only_class(&mut self, on: bool);
    fn has_audio_only_class(&self) -> bool;

    fn set_thumbnail_hidden(&mut self, hidden: bool);
    fn thumbnail_hidden(&self) -> bool;

    fn set_thumbnail_src(&mut self, src: &str);
    fn thumbnail_src(&self) -> Option<String>;

    fn set_toggle_label(&mut self, label: ToggleLabel);
    fn toggle_label(&self) -> Option<ToggleLabel>;

    /// `src` of the player iframe, if one is embedded.
    fn embed_src(&self) -> Option<String>;
}

/// A headless document holding only the YouTube view's elements.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: Vec<YtElement>,
    audio_only_class: bool,
    thumbnail_hidden: bool,
    thumbnail_src: Option<String>,
    toggle_label: Option<ToggleLabel>,
    embed_src: Option<String>,
}

impl MemorySurface {
    /// A rendered YouTube view: controls area and player container present.
    pub fn with_player_view() -> Self {
        Self {
            elements: vec![YtElement::ControlsArea, YtElement::PlayerContainer],
            ..Self::default()
        }
    }

    pub fn set_embed_src(&mut self, src: Option<String>) {
        self.embed_src = src;
    }
}

impl YtSurface for MemorySurface {
    fn count(&self, element: YtElement) -> usize {
        self.elements.iter().filter(|e| **e == element).count()
    }

    fn inject(&mut self, element: YtElement) {
        match element {
            YtElement::Thumbnail => {
                self.thumbnail_hidden = true;
                self.thumbnail_src = None;
            }
            YtElement::ToggleButton => self.toggle_label = Some(LABEL_INITIAL),
            _ => {}
        }
        self.elements.push(element);
    }

    fn set_audio_only_class(&mut self, on: bool) {
        self.audio_only_class = on;
    }

    fn has_audio_only_class(&self) -> bool {
        self.audio_only_class
    }

    fn set_thumbnail_hidden(&mut self, hidden: bool) {
        self.thumbnail_hidden = hidden;
    }

    fn thumbnail_hidden(&self) -> bool {
        self.thumbnail_hidden
    }

    fn set_thumbnail_src(&mut self, src: &str) {
        self.thumbnail_src = Some(src.to_string());
    }

    fn thumbnail_src(&self) -> Option<String> {
        self.thumbnail_src.clone()
    }

    fn set_toggle_label(&mut self, label: ToggleLabel) {
        self.toggle_label = Some(label);
    }

    fn toggle_label(&self) -> Option<ToggleLabel> {
        self.toggle_label
    }

    fn embed_src(&self) -> Option<String> {
        self.embed_src.clone()
    }
}

/// What a call to [`AudioOnlyToggle::set_audio_only_mode`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Required elements missing; nothing changed.
    Skipped,
    /// Presentation updated; no player yet, preference untouched.
    PresentationOnly,
    /// Presentation updated and the preference saved.
    Persisted,
}

pub struct AudioOnlyToggle {
    surface: Box<dyn YtSurface>,
}

impl AudioOnlyToggle {
    pub fn new(surface: Box<dyn YtSurface>) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &dyn YtSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn YtSurface {
        self.surface.as_mut()
    }

    /// Inject the toggle into a rendered YouTube view and apply the saved
    /// preference. Safe to call every time the view renders.
    pub fn init<B: StorageBackend>(
        &mut self,
        player: Option<&dyn VideoPlayer>,
        store: &mut StateStore<B>,
    ) -> bool {
        let s = self.surface.as_mut();
        if !s.contains(YtElement::ControlsArea) || !s.contains(YtElement::PlayerContainer) {
            return false;
        }
        if s.contains(YtElement::ToggleButton) {
            debug!("yt: toggle already injected");
            return true;
        }
        for element in [YtElement::ToggleButton, YtElement::Thumbnail, YtElement::Styles] {
            if !s.contains(element) {
                debug!("yt: injecting #{}", element.dom_id());
                s.inject(element);
            }
        }

        let saved = store.state().is_yt_audio_only;
        self.set_audio_only_mode(saved, player, store);
        true
    }

    pub fn set_audio_only_mode<B: StorageBackend>(
        &mut self,
        enable: bool,
        player: Option<&dyn VideoPlayer>,
        store: &mut StateStore<B>,
    ) -> ToggleOutcome {
        let required = [
            YtElement::PlayerContainer,
            YtElement::Thumbnail,
            YtElement::ToggleButton,
        ];
        if !required.iter().all(|e| self.surface.contains(*e)) {
            warn!("yt: audio toggle elements not found");
            return ToggleOutcome::Skipped;
        }

        self.apply_presentation(enable, store.state());

        let Some(player) = player else {
            debug!("yt: player not ready, only presentation updated");
            return ToggleOutcome::PresentationOnly;
        };

        // Read only: hiding the surface never starts or stops playback.
        let playing = player.is_playing();
        debug!("yt: audio-only = {} (player playing: {})", enable, playing);
        store.set_yt_audio_only(enable);
        ToggleOutcome::Persisted
    }

    /// The toggle button was clicked.
    pub fn on_toggle_clicked<B: StorageBackend>(
        &mut self,
        player: Option<&dyn VideoPlayer>,
        store: &mut StateStore<B>,
    ) -> ToggleOutcome {
        let target = !store.state().is_yt_audio_only;
        self.set_audio_only_mode(target, player, store)
    }

    /// A new video finished loading; keep the saved mode.
    pub fn on_video_loaded<B: StorageBackend>(
        &mut self,
        player: Option<&dyn VideoPlayer>,
        store: &mut StateStore<B>,
    ) -> ToggleOutcome {
        let saved = store.state().is_yt_audio_only;
        self.set_audio_only_mode(saved, player, store)
    }

    fn apply_presentation(&mut self, enable: bool, state: &AppState) {
        self.surface.set_audio_only_class(enable);
        self.surface.set_thumbnail_hidden(!enable);
        if enable {
            if let Some(id) = self.resolve_video_id(state) {
                self.surface.set_thumbnail_src(&thumbnail_url(&id));
            }
            self.surface.set_toggle_label(LABEL_SHOW_VIDEO);
        } else {
            self.surface.set_toggle_label(LABEL_HIDE_VIDEO);
        }
    }

    fn resolve_video_id(&self, state: &AppState) -> Option<String> {
        if let Some(id) = state.current_yt_info.id.as_deref().filter(|id| !id.is_empty()) {
            return Some(id.to_string());
        }
        self.surface.embed_src().as_deref().and_then(video_id_from_embed)
    }
}
