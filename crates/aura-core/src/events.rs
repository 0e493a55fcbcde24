//! Application events.
//!
//! Producers (the media element, the UI layer, the YouTube integration) emit
//! [`AppEvent`]s on an [`EventHub`]. Every event reaches the core through its
//! [`EventQueue`] in emission order; nothing is ever dropped there.
//! Observers that only watch (loggers, status displays) hold a
//! [`Subscription`] instead, which may skip events when it falls behind and
//! unregisters itself when dropped.

use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::state::YtVideoInfo;
use crate::view::View;

/// Backlog each observer may fall behind by before it starts skipping.
pub const OBSERVER_CAPACITY: usize = 256;

/// Events emitted by the playback element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Play,
    Pause,
    Ended,
    TimeUpdate,
    LoadedMetadata,
}

impl MediaEvent {
    /// The HTML media event this corresponds to.
    pub fn dom_name(self) -> &'static str {
        match self {
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::Ended => "ended",
            MediaEvent::TimeUpdate => "timeupdate",
            MediaEvent::LoadedMetadata => "loadedmetadata",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // ── Playback element ─────────────────────────────────────────────────────
    Media(MediaEvent),

    // ── User input ───────────────────────────────────────────────────────────
    Navigate(View),
    NowPlayingClicked,
    PlayPauseClicked,
    /// Play the library track at this index (queue = whole library).
    PlayFromLibrary(usize),
    FilesDropped(Vec<PathBuf>),
    ToggleShuffle,
    CycleRepeat,
    ToggleLikeCurrent,
    ToggleAiFeatures,
    ToggleClock,
    SetVolume(f32),
    /// Seek bar or dial dragged to this position (seconds).
    Seek(f64),
    /// Redraw the current view.
    Refresh,

    // ── YouTube ──────────────────────────────────────────────────────────────
    /// A video was picked; recorded before its `YtVideoLoaded` follows.
    YtVideoSelected(YtVideoInfo),
    YtToggleClicked,
    YtVideoLoaded,

    // ── System ───────────────────────────────────────────────────────────────
    /// Heartbeat carrying the seconds elapsed since the previous one.
    Tick(f64),
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct EventHub {
    tx: mpsc::UnboundedSender<AppEvent>,
    observers: broadcast::Sender<AppEvent>,
}

/// The core's end of the hub.
#[derive(Debug)]
pub struct EventQueue {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHub {
    pub fn channel() -> (Self, EventQueue) {
        Self::with_observer_capacity(OBSERVER_CAPACITY)
    }

    pub fn with_observer_capacity(capacity: usize) -> (Self, EventQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (observers, _) = broadcast::channel(capacity);
        (Self { tx, observers }, EventQueue { rx })
    }

    /// Queue `event` for the core and show it to every live observer.
    pub fn emit(&self, event: AppEvent) {
        if self.observers.receiver_count() > 0 {
            let _ = self.observers.send(event.clone());
        }
        if self.tx.send(event).is_err() {
            debug!("events: core queue closed, event discarded");
        }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.observers.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.observers.receiver_count()
    }
}

impl EventQueue {
    /// Next event, or `None` once every hub handle is gone.
    pub async fn recv(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Next already-queued event, without waiting.
    pub fn try_recv(&mut self) -> Option<AppEvent> {
        self.rx.try_recv().ok()
    }
}

/// A registered observer. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<AppEvent>,
}

impl Subscription {
    /// Next event, or `None` once every hub handle is gone.
    pub async fn recv(&mut self) -> Option<AppEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("events: observer lagged, skipped {} event(s)", n);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-queued event, without waiting.
    pub fn try_recv(&mut self) -> Option<AppEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("events: observer lagged, skipped {} event(s)", n);
                }
                Err(_) => return None,
            }
        }
    }
}
