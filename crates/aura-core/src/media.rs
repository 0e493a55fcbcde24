//! A headless playback element.
//!
//! Behaves like an HTML audio element without producing sound: it tracks
//! source, position, duration and pause state, and emits the same events on
//! an [`EventHub`]. Used by the headless driver and in tests.

use crate::events::{AppEvent, EventHub, MediaEvent};
use crate::playback::MediaElement;
use crate::state::{Track, TrackSource};

/// URL the playback element should load for `track`, if it has a location.
pub fn track_src(track: &Track) -> Option<String> {
    match &track.source {
        TrackSource::Local { path } => Some(format!("file://{}", path.display())),
        TrackSource::Remote { url } => Some(url.clone()),
        TrackSource::Youtube { video_id } => {
            Some(format!("https://www.youtube.com/embed/{video_id}"))
        }
        TrackSource::Unavailable => None,
    }
}

pub struct HeadlessMedia {
    hub: EventHub,
    src: Option<String>,
    current_time: f64,
    duration: f64,
    paused: bool,
    volume: f32,
    track_length: Option<f64>,
}

impl HeadlessMedia {
    pub fn new(hub: EventHub) -> Self {
        Self {
            hub,
            src: None,
            current_time: 0.0,
            duration: f64::NAN,
            paused: true,
            volume: 1.0,
            track_length: None,
        }
    }

    /// Report this duration for every source as soon as it loads.
    pub fn with_track_length(mut self, secs: f64) -> Self {
        self.track_length = Some(secs).filter(|s| s.is_finite() && *s > 0.0);
        self
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Metadata arrived for the current source.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
        self.emit(MediaEvent::LoadedMetadata);
    }

    /// Advance the clock by `secs` while playing. Reaching the end pauses and
    /// fires `ended`, like a real element.
    pub fn advance(&mut self, secs: f64) {
        if self.paused || self.src.is_none() {
            return;
        }
        self.current_time += secs.max(0.0);
        let finished = self.duration.is_finite() && self.current_time >= self.duration;
        if finished {
            self.current_time = self.duration;
        }
        self.emit(MediaEvent::TimeUpdate);
        if finished {
            self.paused = true;
            self.emit(MediaEvent::Pause);
            self.emit(MediaEvent::Ended);
        }
    }

    fn emit(&self, event: MediaEvent) {
        self.hub.emit(AppEvent::Media(event));
    }
}

impl MediaElement for HeadlessMedia {
    fn current_time(&self) -> f64 {
        self.current_time
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
        if !self.paused {
            self.paused = true;
            self.emit(MediaEvent::Pause);
        }
        self.src = Some(src.to_string());
        self.current_time = 0.0;
        self.duration = f64::NAN;
        if let Some(length) = self.track_length {
            self.set_duration(length);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn play(&mut self) {
        if self.src.is_none() || !self.paused {
            return;
        }
        if self.duration.is_finite() && self.current_time >= self.duration {
            self.current_time = 0.0;
        }
        self.paused = false;
        self.emit(MediaEvent::Play);
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.emit(MediaEvent::Pause);
    }

    fn seek(&mut self, secs: f64) {
        if self.src.is_none() {
            return;
        }
        let upper = if self.duration.is_finite() {
            self.duration
        } else {
            f64::MAX
        };
        self.current_time = secs.clamp(0.0, upper);
        self.emit(MediaEvent::TimeUpdate);
    }

    fn tick(&mut self, elapsed: f64) {
        self.advance(elapsed);
    }
}
