//! PlaybackController: keeps the UI model in step with the media element.
//!
//! ```text
//!  Idle ──play──▶ Playing ◀──play/pause──▶ Paused
//!                    │                        │
//!                    └─────────ended──────────┴──▶ Ended ──play──▶ Playing
//! ```
//!
//! Every handler recomputes from the element's absolute position, so repeated
//! or out-of-order `TimeUpdate`s are harmless.

use tracing::debug;

use crate::events::MediaEvent;
use crate::state::{AppState, Track};
use crate::view::{PlayerWidgets, View};

pub const DIAL_RADIUS: f64 = 45.0;
pub const DIAL_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * DIAL_RADIUS;

/// `m:ss`, minutes unpadded. Anything that is not a finite number is `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() {
        return "0:00".to_string();
    }
    let total = secs.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Stroke offset of the dial ring for the given position.
pub fn dial_dashoffset(current_time: f64, duration: f64) -> f64 {
    DIAL_CIRCUMFERENCE * (1.0 - current_time / duration)
}

/// The playback element the controller observes. Durations and positions
/// are in seconds; `duration` is NaN until metadata has loaded.
pub trait MediaElement {
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    fn paused(&self) -> bool;
    fn src(&self) -> Option<&str>;
    /// Replace the source; playback stays paused until [`MediaElement::play`].
    fn load(&mut self, src: &str);
    fn set_volume(&mut self, volume: f32);
    fn play(&mut self);
    fn pause(&mut self);
    /// Move the playback position, clamped to the known duration.
    fn seek(&mut self, secs: f64);
    /// Wall time passed. Elements with their own clock ignore this.
    fn tick(&mut self, _elapsed: f64) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationHandle(pub u64);

/// Draws the spectrum while music plays on the player view.
pub trait Visualizer {
    fn start(&mut self) -> AnimationHandle;
    fn cancel(&mut self, handle: AnimationHandle);
}

/// Visualizer for surfaces that draw nothing.
#[derive(Debug, Default)]
pub struct NullVisualizer {
    next: u64,
}

impl Visualizer for NullVisualizer {
    fn start(&mut self) -> AnimationHandle {
        self.next += 1;
        AnimationHandle(self.next)
    }

    fn cancel(&mut self, _handle: AnimationHandle) {}
}

/// Picks what plays after the current track ends.
pub trait TrackAdvancer {
    /// Update queue position and return the track to load, or `None` to stop.
    fn play_next(&mut self, state: &mut AppState) -> Option<Track>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayPauseIcon {
    #[default]
    Play,
    Pause,
}

/// Always-visible playback chrome, independent of the current view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlayingChrome {
    pub play_pause: PlayPauseIcon,
    /// Now-playing strip highlighted as playing.
    pub active: bool,
    /// `--progress-width` of the header bar, e.g. `"42.5%"`.
    pub header_progress: Option<String>,
}

pub struct PlaybackController {
    phase: PlaybackPhase,
    animation: Option<AnimationHandle>,
    chrome: NowPlayingChrome,
    visualizer: Box<dyn Visualizer>,
    advancer: Box<dyn TrackAdvancer>,
}

impl PlaybackController {
    pub fn new(visualizer: Box<dyn Visualizer>, advancer: Box<dyn TrackAdvancer>) -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            animation: None,
            chrome: NowPlayingChrome::default(),
            visualizer,
            advancer,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn chrome(&self) -> &NowPlayingChrome {
        &self.chrome
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Apply one media event. Returns the next track to load after `Ended`.
    pub fn handle(
        &mut self,
        event: MediaEvent,
        media: &dyn MediaElement,
        state: &mut AppState,
        widgets: &mut PlayerWidgets,
    ) -> Option<Track> {
        match event {
            MediaEvent::Play => self.on_play(state),
            MediaEvent::Pause => self.on_pause(state),
            MediaEvent::Ended => return self.on_ended(state),
            MediaEvent::TimeUpdate => self.on_time_update(media, widgets),
            MediaEvent::LoadedMetadata => on_loaded_metadata(media, widgets),
        }
        None
    }

    fn on_play(&mut self, state: &mut AppState) {
        self.phase = PlaybackPhase::Playing;
        state.is_playing = true;
        self.sync_affordance(true);
        if state.current_view == View::Player
            && state.settings.music_visualizer()
            && self.animation.is_none()
        {
            let handle = self.visualizer.start();
            debug!("playback: visualizer started ({:?})", handle);
            self.animation = Some(handle);
        }
    }

    fn on_pause(&mut self, state: &mut AppState) {
        // A `pause` arriving after `ended` leaves the phase at `Ended`.
        if self.phase != PlaybackPhase::Ended {
            self.phase = PlaybackPhase::Paused;
        }
        state.is_playing = false;
        self.sync_affordance(false);
        self.cancel_visualizer();
    }

    fn on_ended(&mut self, state: &mut AppState) -> Option<Track> {
        self.phase = PlaybackPhase::Ended;
        let next = self.advancer.play_next(state);
        debug!(
            "playback: ended, next = {:?}",
            next.as_ref().map(|t| t.name.as_str())
        );
        next
    }

    fn on_time_update(&mut self, media: &dyn MediaElement, widgets: &mut PlayerWidgets) {
        let current = media.current_time();
        let duration = media.duration();

        if let Some(bar) = widgets.progress.as_mut() {
            if !current.is_nan() {
                bar.value = current;
                if let Some(label) = widgets.current_time_label.as_mut() {
                    *label = format_time(current);
                }
            }
        }

        if let Some(dial) = widgets.dial.as_mut() {
            if duration.is_finite() && duration > 0.0 {
                dial.dashoffset = dial_dashoffset(current, duration);
                dial.time_label = format_time(current);
            }
        }

        if duration > 0.0 {
            let percent = current / duration * 100.0;
            self.chrome.header_progress = Some(format!("{percent}%"));
        }
    }

    fn sync_affordance(&mut self, playing: bool) {
        self.chrome.play_pause = if playing {
            PlayPauseIcon::Pause
        } else {
            PlayPauseIcon::Play
        };
        self.chrome.active = playing;
    }

    /// Stop the visualizer loop if one is running.
    pub fn cancel_visualizer(&mut self) {
        if let Some(handle) = self.animation.take() {
            self.visualizer.cancel(handle);
            debug!("playback: visualizer cancelled ({:?})", handle);
        }
    }

    /// Play/pause button: does nothing until a source is loaded.
    pub fn toggle_play_pause(&self, media: &mut dyn MediaElement) -> bool {
        if media.src().is_none() {
            return false;
        }
        if media.paused() {
            media.play();
        } else {
            media.pause();
        }
        true
    }
}

fn on_loaded_metadata(media: &dyn MediaElement, widgets: &mut PlayerWidgets) {
    let duration = media.duration();
    if let Some(bar) = widgets.progress.as_mut() {
        if !duration.is_nan() {
            bar.max = duration;
        }
    }
    if let Some(label) = widgets.total_duration_label.as_mut() {
        *label = format_time(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ControlStyle, SettingKey};
    use crate::state::TrackSource;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeMedia {
        time: f64,
        duration: f64,
        paused: bool,
        src: Option<String>,
    }

    impl FakeMedia {
        fn at(time: f64, duration: f64) -> Self {
            Self {
                time,
                duration,
                paused: true,
                src: Some("file:///a.mp3".to_string()),
            }
        }
    }

    impl MediaElement for FakeMedia {
        fn current_time(&self) -> f64 {
            self.time
        }
        fn duration(&self) -> f64 {
            self.duration
        }
        fn paused(&self) -> bool {
            self.paused
        }
        fn src(&self) -> Option<&str> {
            self.src.as_deref()
        }
        fn load(&mut self, src: &str) {
            self.src = Some(src.to_string());
            self.paused = true;
        }
        fn set_volume(&mut self, _volume: f32) {}
        fn play(&mut self) {
            self.paused = false;
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn seek(&mut self, secs: f64) {
            self.time = secs;
        }
    }

    #[derive(Clone, Default)]
    struct VizLog(Rc<RefCell<Vec<String>>>);

    impl Visualizer for VizLog {
        fn start(&mut self) -> AnimationHandle {
            self.0.borrow_mut().push("start".into());
            AnimationHandle(7)
        }
        fn cancel(&mut self, handle: AnimationHandle) {
            self.0.borrow_mut().push(format!("cancel {}", handle.0));
        }
    }

    #[derive(Clone, Default)]
    struct CountingAdvancer(Rc<RefCell<u32>>);

    impl TrackAdvancer for CountingAdvancer {
        fn play_next(&mut self, _state: &mut AppState) -> Option<Track> {
            *self.0.borrow_mut() += 1;
            Some(Track {
                id: "next".into(),
                name: "next.mp3".into(),
                artist: String::new(),
                source: TrackSource::Remote {
                    url: "https://example.com/next.mp3".into(),
                },
            })
        }
    }

    fn controller() -> (PlaybackController, VizLog, CountingAdvancer) {
        let viz = VizLog::default();
        let adv = CountingAdvancer::default();
        let c = PlaybackController::new(Box::new(viz.clone()), Box::new(adv.clone()));
        (c, viz, adv)
    }

    fn player_state() -> AppState {
        AppState {
            current_view: View::Player,
            ..AppState::default()
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(600.9), "10:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn test_dial_half_way() {
        let (mut c, _, _) = controller();
        let mut state = player_state();
        let mut widgets = PlayerWidgets::for_view(View::Player, ControlStyle::Dial);
        let media = FakeMedia::at(30.0, 60.0);
        c.handle(MediaEvent::TimeUpdate, &media, &mut state, &mut widgets);
        let dial = widgets.dial.unwrap();
        assert!((dial.dashoffset - DIAL_CIRCUMFERENCE * 0.5).abs() < 1e-9);
        assert_eq!(dial.time_label, "0:30");
        assert_eq!(c.chrome().header_progress.as_deref(), Some("50%"));
    }

    #[test]
    fn test_time_update_guards_unknown_duration() {
        let (mut c, _, _) = controller();
        let mut state = player_state();
        let mut widgets = PlayerWidgets::for_view(View::Player, ControlStyle::Standard);
        let media = FakeMedia::at(12.0, f64::NAN);
        c.handle(MediaEvent::TimeUpdate, &media, &mut state, &mut widgets);
        assert_eq!(widgets.progress.unwrap().value, 12.0);
        assert_eq!(widgets.current_time_label.as_deref(), Some("0:12"));
        assert_eq!(c.chrome().header_progress, None);

        let media = FakeMedia::at(12.0, 0.0);
        c.handle(MediaEvent::TimeUpdate, &media, &mut state, &mut widgets);
        assert_eq!(c.chrome().header_progress, None);
    }

    #[test]
    fn test_loaded_metadata() {
        let (mut c, _, _) = controller();
        let mut state = player_state();
        let mut widgets = PlayerWidgets::for_view(View::Player, ControlStyle::Standard);
        c.handle(
            MediaEvent::LoadedMetadata,
            &FakeMedia::at(0.0, 185.0),
            &mut state,
            &mut widgets,
        );
        assert_eq!(widgets.progress.unwrap().max, 185.0);
        assert_eq!(widgets.total_duration_label.as_deref(), Some("3:05"));

        c.handle(
            MediaEvent::LoadedMetadata,
            &FakeMedia::at(0.0, f64::NAN),
            &mut state,
            &mut widgets,
        );
        assert_eq!(widgets.progress.unwrap().max, 185.0);
        assert_eq!(widgets.total_duration_label.as_deref(), Some("0:00"));
    }

    #[test]
    fn test_visualizer_only_on_player_view_once() {
        let (mut c, viz, _) = controller();
        let media = FakeMedia::at(0.0, 10.0);
        let mut widgets = PlayerWidgets::default();

        let mut home = AppState::default();
        c.handle(MediaEvent::Play, &media, &mut home, &mut widgets);
        assert!(!c.is_animating());

        let mut state = player_state();
        c.handle(MediaEvent::Play, &media, &mut state, &mut widgets);
        c.handle(MediaEvent::Play, &media, &mut state, &mut widgets);
        assert!(c.is_animating());
        assert_eq!(*viz.0.borrow(), vec!["start"]);
        assert_eq!(c.chrome().play_pause, PlayPauseIcon::Pause);
        assert!(state.is_playing);

        c.handle(MediaEvent::Pause, &media, &mut state, &mut widgets);
        c.handle(MediaEvent::Pause, &media, &mut state, &mut widgets);
        assert_eq!(*viz.0.borrow(), vec!["start", "cancel 7"]);
        assert_eq!(c.phase(), PlaybackPhase::Paused);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_visualizer_respects_setting() {
        let (mut c, viz, _) = controller();
        let mut state = player_state();
        state.settings.set(SettingKey::MusicVisualizer, false);
        c.handle(
            MediaEvent::Play,
            &FakeMedia::at(0.0, 10.0),
            &mut state,
            &mut PlayerWidgets::default(),
        );
        assert!(viz.0.borrow().is_empty());
    }

    #[test]
    fn test_ended_delegates_once() {
        let (mut c, _, adv) = controller();
        let mut state = player_state();
        let media = FakeMedia::at(10.0, 10.0);
        let mut widgets = PlayerWidgets::default();
        c.handle(MediaEvent::Pause, &media, &mut state, &mut widgets);
        let next = c.handle(MediaEvent::Ended, &media, &mut state, &mut widgets);
        assert_eq!(next.map(|t| t.id), Some("next".to_string()));
        assert_eq!(*adv.0.borrow(), 1);
        assert_eq!(c.phase(), PlaybackPhase::Ended);
    }

    #[test]
    fn test_late_pause_keeps_ended_phase() {
        let (mut c, _, _) = controller();
        let mut state = player_state();
        let media = FakeMedia::at(10.0, 10.0);
        let mut widgets = PlayerWidgets::default();
        c.handle(MediaEvent::Play, &media, &mut state, &mut widgets);
        c.handle(MediaEvent::Ended, &media, &mut state, &mut widgets);
        c.handle(MediaEvent::Pause, &media, &mut state, &mut widgets);
        assert_eq!(c.phase(), PlaybackPhase::Ended);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_toggle_play_pause_needs_source() {
        let (c, _, _) = controller();
        let mut media = FakeMedia::at(0.0, 10.0);
        media.src = None;
        assert!(!c.toggle_play_pause(&mut media));
        assert!(media.paused);

        media.src = Some("file:///b.mp3".into());
        assert!(c.toggle_play_pause(&mut media));
        assert!(!media.paused);
        assert!(c.toggle_play_pause(&mut media));
        assert!(media.paused);
    }
}
