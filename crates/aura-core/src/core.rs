/// AuraCore: single-owner event loop for the player.
///
/// Owns the [`StateStore`], the playback element, the [`PlaybackController`],
/// the [`ViewRouter`] and the YouTube [`AudioOnlyToggle`]. Everything that
/// wants to change state emits an [`AppEvent`] on the [`EventHub`]; this loop
/// is the only code that mutates `AppState`, so handlers run strictly one at
/// a time in arrival order.
///
/// Events are handled synchronously by [`AuraCore::handle_event`]; [`AuraCore::run`]
/// only pumps the [`EventQueue`] into it, so tests can drive the core directly.
use tracing::{debug, info, warn};

use crate::clock::SessionClock;
use crate::events::{AppEvent, EventQueue};
use crate::library;
use crate::media::track_src;
use crate::playback::{MediaElement, PlaybackController, TrackAdvancer, Visualizer};
use crate::queue;
use crate::state::{Track, TrackMetadata};
use crate::store::{LoadOutcome, StateStore, StorageBackend};
use crate::view::{View, ViewRenderer, ViewRouter};
use crate::youtube::{AudioOnlyToggle, VideoPlayer, YtSurface};

/// Pluggable pieces supplied by the host surface.
pub struct Collaborators {
    pub renderer: Box<dyn ViewRenderer>,
    pub visualizer: Box<dyn Visualizer>,
    pub advancer: Box<dyn TrackAdvancer>,
    pub yt_surface: Box<dyn YtSurface>,
}

pub struct AuraCore<B: StorageBackend, M: MediaElement> {
    store: StateStore<B>,
    media: M,
    playback: PlaybackController,
    router: ViewRouter,
    yt_toggle: AudioOnlyToggle,
    yt_player: Option<Box<dyn VideoPlayer>>,
    clock: SessionClock,
}

impl<B: StorageBackend, M: MediaElement> AuraCore<B, M> {
    pub fn new(store: StateStore<B>, media: M, parts: Collaborators) -> Self {
        Self {
            store,
            media,
            playback: PlaybackController::new(parts.visualizer, parts.advancer),
            router: ViewRouter::new(parts.renderer),
            yt_toggle: AudioOnlyToggle::new(parts.yt_surface),
            yt_player: None,
            clock: SessionClock::new(),
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn store(&self) -> &StateStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore<B> {
        &mut self.store
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn yt_toggle(&self) -> &AudioOnlyToggle {
        &self.yt_toggle
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Load persisted state, apply the saved volume and render the initial
    /// view.
    pub fn startup(&mut self) -> LoadOutcome {
        let outcome = self.store.load();
        info!("AuraCore: state load {:?}", outcome);
        self.media.set_volume(self.store.state().last_volume);
        self.router.render_current(self.store.state());
        self.init_yt_toggle();
        outcome
    }

    /// The embedded YouTube player became ready.
    pub fn attach_video_player(&mut self, player: Box<dyn VideoPlayer>) {
        self.yt_player = Some(player);
        self.init_yt_toggle();
    }

    pub fn detach_video_player(&mut self) {
        self.yt_player = None;
    }

    /// Pump events until `Shutdown` or until every sender is gone, then save.
    pub async fn run(&mut self, events: &mut EventQueue) {
        info!("AuraCore: starting event loop");
        while let Some(event) = events.recv().await {
            if !self.handle_event(event) {
                info!("AuraCore: shutdown requested");
                break;
            }
        }
        self.playback.cancel_visualizer();
        self.store.save();
        info!("AuraCore: event loop stopped");
    }

    /// Apply one event. Returns `false` once the loop should stop.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Media(media_event) => {
                debug!("AuraCore: media {}", media_event.dom_name());
                let next = self.playback.handle(
                    media_event,
                    &self.media,
                    self.store.state_mut(),
                    self.router.widgets_mut(),
                );
                if let Some(track) = next {
                    if self.load_track(&track) {
                        self.media.play();
                    }
                }
            }
            AppEvent::Navigate(view) => {
                debug!("AuraCore: navigate {}", view.name());
                if view != View::Player {
                    self.playback.cancel_visualizer();
                }
                if self.router.navigate(view, self.store.state_mut()) && view == View::Youtube {
                    self.init_yt_toggle();
                }
            }
            AppEvent::NowPlayingClicked => {
                let has_src = self.media.src().is_some();
                self.router
                    .open_now_playing(self.store.state_mut(), has_src);
            }
            AppEvent::PlayPauseClicked => {
                self.playback.toggle_play_pause(&mut self.media);
            }
            AppEvent::PlayFromLibrary(index) => {
                let tracks = self.store.state().library.clone();
                match queue::play_from(self.store.state_mut(), tracks, index) {
                    Some(track) => {
                        if self.load_track(&track) {
                            self.media.play();
                        }
                    }
                    None => debug!("AuraCore: no library track at {}", index),
                }
            }
            AppEvent::FilesDropped(paths) => {
                if self.store.state().current_view != View::Home {
                    self.router.navigate(View::Home, self.store.state_mut());
                }
                if library::import_files(self.store.state_mut(), &paths) > 0 {
                    self.router.render_current(self.store.state());
                    self.store.save();
                }
            }
            AppEvent::ToggleShuffle => {
                let on = queue::toggle_shuffle(self.store.state_mut());
                info!("AuraCore: shuffle {}", if on { "on" } else { "off" });
            }
            AppEvent::CycleRepeat => {
                let mode = queue::cycle_repeat(self.store.state_mut());
                info!("AuraCore: repeat {:?}", mode);
            }
            AppEvent::ToggleLikeCurrent => {
                if let Some(track) = self.store.state().current_track().cloned() {
                    self.store.toggle_liked(track);
                }
            }
            AppEvent::ToggleAiFeatures => {
                self.store.toggle_ai_features();
            }
            AppEvent::ToggleClock => {
                self.clock.toggle();
                debug!("AuraCore: clock shows {}", self.clock.label());
            }
            AppEvent::SetVolume(volume) => {
                self.store.set_volume(volume);
                self.media.set_volume(self.store.state().last_volume);
            }
            AppEvent::Seek(secs) => {
                self.media.seek(secs);
            }
            AppEvent::Refresh => {
                self.router.render_current(self.store.state());
            }
            AppEvent::YtVideoSelected(info) => {
                debug!("AuraCore: video selected {:?}", info.id);
                self.store.state_mut().current_yt_info = info.clone();
                self.store.push_yt_history(info);
            }
            AppEvent::YtToggleClicked => {
                self.yt_toggle
                    .on_toggle_clicked(self.yt_player.as_deref(), &mut self.store);
            }
            AppEvent::YtVideoLoaded => {
                self.yt_toggle
                    .on_video_loaded(self.yt_player.as_deref(), &mut self.store);
            }
            AppEvent::Tick(elapsed) => {
                self.media.tick(elapsed);
            }
            AppEvent::Shutdown => return false,
        }
        true
    }

    /// Point the element at `track`. Returns `false` when it has no location.
    fn load_track(&mut self, track: &Track) -> bool {
        let Some(src) = track_src(track) else {
            warn!("AuraCore: {} has no playable source", track.name);
            return false;
        };
        info!("AuraCore: loading {}", track.name);
        self.media.load(&src);
        self.store.state_mut().current_track = TrackMetadata {
            title: Some(track.name.clone()),
            artist: Some(track.artist.clone()),
            picture: None,
        };
        self.store.add_recent(&track.name);
        true
    }

    fn init_yt_toggle(&mut self) {
        if self.store.state().current_view != View::Youtube {
            return;
        }
        self.yt_toggle
            .init(self.yt_player.as_deref(), &mut self.store);
    }
}
