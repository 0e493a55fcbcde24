//! ViewRouter: switches the active view and re-renders it.
//!
//! Rendering itself belongs to the injected [`ViewRenderer`]. The router only
//! keeps the player widget model in step with what is on screen, so the
//! playback controller knows which progress indicators exist.

use tracing::debug;

use crate::settings::ControlStyle;
use crate::state::{AppState, TracklistSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Player,
    Playlist,
    Youtube,
    Settings,
    Equalizer,
    Themes,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Home,
        View::Player,
        View::Playlist,
        View::Youtube,
        View::Settings,
        View::Equalizer,
        View::Themes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Player => "player",
            View::Playlist => "playlist",
            View::Youtube => "youtube",
            View::Settings => "settings",
            View::Equalizer => "equalizer",
            View::Themes => "themes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

/// Linear seek bar of the standard player layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressBar {
    pub value: f64,
    pub max: f64,
}

/// Circular progress ring of the dial layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dial {
    /// SVG `stroke-dashoffset` of the progress path.
    pub dashoffset: f64,
    pub time_label: String,
}

/// Progress widgets that exist while the player view is rendered.
/// Every field is `None` when the corresponding element is not on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerWidgets {
    pub progress: Option<ProgressBar>,
    pub current_time_label: Option<String>,
    pub total_duration_label: Option<String>,
    pub dial: Option<Dial>,
}

impl PlayerWidgets {
    /// Widgets produced by rendering `view` with the given control style.
    pub fn for_view(view: View, style: ControlStyle) -> Self {
        match (view, style) {
            (View::Player, ControlStyle::Standard) => Self {
                progress: Some(ProgressBar::default()),
                current_time_label: Some(crate::playback::format_time(0.0)),
                total_duration_label: Some(crate::playback::format_time(0.0)),
                dial: None,
            },
            (View::Player, ControlStyle::Dial) => Self {
                dial: Some(Dial {
                    dashoffset: crate::playback::DIAL_CIRCUMFERENCE,
                    time_label: crate::playback::format_time(0.0),
                }),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}

/// Draws a view. Implemented by the UI layer.
pub trait ViewRenderer {
    fn render(&mut self, view: View, state: &AppState);
}

pub struct ViewRouter {
    renderer: Box<dyn ViewRenderer>,
    widgets: PlayerWidgets,
}

impl ViewRouter {
    pub fn new(renderer: Box<dyn ViewRenderer>) -> Self {
        Self {
            renderer,
            widgets: PlayerWidgets::default(),
        }
    }

    pub fn widgets(&self) -> &PlayerWidgets {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut PlayerWidgets {
        &mut self.widgets
    }

    /// Switch to `view`. Home always re-renders (and resets the track list to
    /// the library); other views only when they are not already shown.
    /// Returns whether a render happened.
    pub fn navigate(&mut self, view: View, state: &mut AppState) -> bool {
        if view == View::Home {
            state.tracklist_source = TracklistSource::Library;
        }
        if view == state.current_view && view != View::Home {
            return false;
        }
        debug!("view: {} -> {}", state.current_view.name(), view.name());
        state.current_view = view;
        self.render_current(state);
        true
    }

    /// Re-render whatever view is current.
    pub fn render_current(&mut self, state: &AppState) {
        self.widgets = PlayerWidgets::for_view(state.current_view, state.settings.control_style());
        self.renderer.render(state.current_view, state);
    }

    /// Jump to the player from the now-playing strip, if something is loaded.
    pub fn open_now_playing(&mut self, state: &mut AppState, has_src: bool) -> bool {
        if state.current_view == View::Player {
            return false;
        }
        if state.current_index.is_none() && !has_src {
            return false;
        }
        self.navigate(View::Player, state)
    }
}
