//! Aura player state core: persisted state, playback bookkeeping, view
//! routing and the YouTube audio-only toggle, independent of any UI surface.

pub mod clock;
pub mod config;
pub mod core;
pub mod eq;
pub mod error;
pub mod events;
pub mod library;
pub mod media;
pub mod platform;
pub mod playback;
pub mod queue;
pub mod settings;
pub mod state;
pub mod store;
pub mod theme;
pub mod view;
pub mod youtube;

pub use crate::core::{AuraCore, Collaborators};
pub use error::StoreError;
pub use events::{AppEvent, EventHub, EventQueue, MediaEvent, Subscription};
pub use state::AppState;
pub use store::{FileBackend, LoadOutcome, MemoryBackend, StateStore, StorageBackend};
pub use view::View;
