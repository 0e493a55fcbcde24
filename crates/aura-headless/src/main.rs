mod input;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use aura_core::config::Config;
use aura_core::media::HeadlessMedia;
use aura_core::playback::NullVisualizer;
use aura_core::queue::QueueAdvancer;
use aura_core::youtube::{MemorySurface, VideoPlayer};
use aura_core::{
    library, AppEvent, AuraCore, Collaborators, EventHub, FileBackend, LoadOutcome,
    MemoryBackend, StateStore, StorageBackend,
};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::input::{parse_line, HELP};
use crate::render::TextRenderer;

/// Aura - headless music player driven from stdin
#[derive(Parser, Debug)]
#[command(name = "aura", version, about)]
struct Args {
    /// Config file (default: <config dir>/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep state in memory only; nothing is read or written on disk
    #[arg(long)]
    ephemeral: bool,

    /// Import every audio file in this directory at startup
    #[arg(long)]
    library: Option<PathBuf>,

    /// Let the playback clock run in real time
    #[arg(long)]
    realtime: bool,

    /// Duration reported for every loaded track, in seconds
    #[arg(long, default_value_t = 180.0)]
    track_secs: f64,
}

/// The embedded YouTube player as seen by the audio-only toggle.
struct HeadlessVideoPlayer;

impl VideoPlayer for HeadlessVideoPlayer {
    fn is_playing(&self) -> bool {
        false
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    let data_dir = config.storage.data_dir.clone();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("aura.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG wins over the configured filter.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.filter.clone());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("aura log: {}", log_path.display());
    tracing::info!("aura starting…");

    if args.ephemeral {
        let store = StateStore::new(MemoryBackend::new(), config.storage.record_key.clone());
        run(store, &config, &args).await
    } else {
        let backend = FileBackend::new(&data_dir);
        tracing::info!("state stored under {}", backend.dir().display());
        let store = StateStore::new(backend, config.storage.record_key.clone());
        run(store, &config, &args).await
    }
}

async fn run<B: StorageBackend>(
    store: StateStore<B>,
    config: &Config,
    args: &Args,
) -> anyhow::Result<()> {
    let (hub, mut queue) = EventHub::channel();

    let mut core = AuraCore::new(
        store,
        HeadlessMedia::new(hub.clone()).with_track_length(args.track_secs),
        Collaborators {
            renderer: Box::new(TextRenderer::new(std::io::stdout())),
            visualizer: Box::new(NullVisualizer::default()),
            advancer: Box::new(QueueAdvancer),
            yt_surface: Box::new(MemorySurface::with_player_view()),
        },
    );

    if core.startup() == LoadOutcome::Missing {
        core.handle_event(AppEvent::SetVolume(config.player.default_volume));
    }
    core.attach_video_player(Box::new(HeadlessVideoPlayer));
    if let Some(dir) = &args.library {
        let added = library::import_dir(core.store_mut().state_mut(), dir);
        tracing::info!("imported {} file(s) from {}", added, dir.display());
        hub.emit(AppEvent::Navigate(aura_core::View::Home));
    }

    // ── Producers ────────────────────────────────────────────────────────────
    tokio::spawn(read_commands(hub.clone()));
    if args.realtime {
        tokio::spawn(heartbeat(hub.clone()));
    }

    // ── Event loop ───────────────────────────────────────────────────────────
    core.run(&mut queue).await;
    tracing::info!("aura stopped");
    Ok(())
}

/// Turn stdin lines into events. End of input shuts the player down.
async fn read_commands(hub: EventHub) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_line(&line) {
                Ok(Some(input)) => {
                    if !input.emit(&hub) {
                        println!("{HELP}");
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{e}"),
            },
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("stdin: {}", e);
                break;
            }
        }
    }
    hub.emit(AppEvent::Shutdown);
}

/// Real-time clock for the headless element.
async fn heartbeat(hub: EventHub) {
    let period = Duration::from_secs(1);
    let mut tick = tokio::time::interval(period);
    tick.tick().await;
    loop {
        tick.tick().await;
        hub.emit(AppEvent::Tick(period.as_secs_f64()));
    }
}
