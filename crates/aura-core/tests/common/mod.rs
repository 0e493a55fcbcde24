#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use aura_core::media::HeadlessMedia;
use aura_core::playback::{AnimationHandle, Visualizer};
use aura_core::queue::QueueAdvancer;
use aura_core::state::{Track, TrackSource};
use aura_core::youtube::{MemorySurface, VideoPlayer};
use aura_core::{
    AppState, AuraCore, Collaborators, EventHub, EventQueue, StateStore, StorageBackend, View,
};

pub const KEY: &str = "auraPlayerData";

/// Views rendered so far, shared with the test body.
pub type RenderLog = Rc<RefCell<Vec<View>>>;

pub struct RecordingRenderer(pub RenderLog);

impl aura_core::view::ViewRenderer for RecordingRenderer {
    fn render(&mut self, view: View, _state: &AppState) {
        self.0.borrow_mut().push(view);
    }
}

/// Counts visualizer starts and cancels.
#[derive(Default)]
pub struct VizCounter {
    pub started: u64,
    pub cancelled: u64,
}

pub struct CountingVisualizer(pub Rc<RefCell<VizCounter>>);

impl Visualizer for CountingVisualizer {
    fn start(&mut self) -> AnimationHandle {
        let mut c = self.0.borrow_mut();
        c.started += 1;
        AnimationHandle(c.started)
    }

    fn cancel(&mut self, _handle: AnimationHandle) {
        self.0.borrow_mut().cancelled += 1;
    }
}

pub struct FixedPlayer(pub bool);

impl VideoPlayer for FixedPlayer {
    fn is_playing(&self) -> bool {
        self.0
    }
}

pub struct Harness<B: StorageBackend> {
    pub hub: EventHub,
    pub queue: EventQueue,
    pub core: AuraCore<B, HeadlessMedia>,
    pub renders: RenderLog,
    pub viz: Rc<RefCell<VizCounter>>,
}

pub fn harness<B: StorageBackend>(store: StateStore<B>) -> Harness<B> {
    let (hub, queue) = EventHub::channel();
    let renders = RenderLog::default();
    let viz = Rc::new(RefCell::new(VizCounter::default()));
    let core = AuraCore::new(
        store,
        HeadlessMedia::new(hub.clone()),
        Collaborators {
            renderer: Box::new(RecordingRenderer(renders.clone())),
            visualizer: Box::new(CountingVisualizer(viz.clone())),
            advancer: Box::new(QueueAdvancer),
            yt_surface: Box::new(MemorySurface::with_player_view()),
        },
    );
    Harness {
        hub,
        queue,
        core,
        renders,
        viz,
    }
}

pub fn remote_track(name: &str) -> Track {
    Track {
        id: format!("id-{name}"),
        name: name.to_string(),
        artist: "Local File".to_string(),
        source: TrackSource::Remote {
            url: format!("https://example.com/{name}.mp3"),
        },
    }
}
