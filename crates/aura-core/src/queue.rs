//! Playback queue: ordering, shuffle and repeat.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::playback::TrackAdvancer;
use crate::state::{AppState, RepeatMode, Track};

/// Replace the queue with `tracks` and start at `index`.
/// Returns the track to load, or `None` if `index` is out of range.
pub fn play_from(state: &mut AppState, tracks: Vec<Track>, index: usize) -> Option<Track> {
    play_from_with(state, tracks, index, &mut rand::thread_rng())
}

pub fn play_from_with<R: Rng + ?Sized>(
    state: &mut AppState,
    tracks: Vec<Track>,
    index: usize,
    rng: &mut R,
) -> Option<Track> {
    if index >= tracks.len() {
        return None;
    }
    state.original_queue = tracks.clone();
    state.queue = tracks;
    state.current_index = Some(index);
    if state.is_shuffle {
        shuffle_keeping_current(state, rng);
    }
    state.current_track().cloned()
}

/// Flip shuffle. Turning it on shuffles everything but the current track,
/// which moves to the front; turning it off restores the original order.
pub fn toggle_shuffle(state: &mut AppState) -> bool {
    toggle_shuffle_with(state, &mut rand::thread_rng())
}

pub fn toggle_shuffle_with<R: Rng + ?Sized>(state: &mut AppState, rng: &mut R) -> bool {
    state.is_shuffle = !state.is_shuffle;
    if state.is_shuffle {
        shuffle_keeping_current(state, rng);
    } else {
        let current_id = state.current_track().map(|t| t.id.clone());
        state.queue = state.original_queue.clone();
        state.current_index = match current_id {
            Some(id) => state.queue.iter().position(|t| t.id == id),
            None => None,
        };
    }
    state.is_shuffle
}

fn shuffle_keeping_current<R: Rng + ?Sized>(state: &mut AppState, rng: &mut R) {
    let current = state.current_index.map(|i| state.queue.remove(i));
    state.queue.shuffle(rng);
    if let Some(track) = current {
        state.queue.insert(0, track);
        state.current_index = Some(0);
    }
}

/// none → all → one → none
pub fn cycle_repeat(state: &mut AppState) -> RepeatMode {
    state.repeat_mode = match state.repeat_mode {
        RepeatMode::None => RepeatMode::All,
        RepeatMode::All => RepeatMode::One,
        RepeatMode::One => RepeatMode::None,
    };
    state.repeat_mode
}

/// Index that should play after the current one, if any.
pub fn next_index(state: &AppState) -> Option<usize> {
    let current = state.current_index?;
    let len = state.queue.len();
    if len == 0 {
        return None;
    }
    match state.repeat_mode {
        RepeatMode::One => Some(current),
        RepeatMode::All => Some((current + 1) % len),
        RepeatMode::None => (current + 1 < len).then_some(current + 1),
    }
}

/// Default [`TrackAdvancer`]: walk the queue honouring the repeat mode.
#[derive(Debug, Default)]
pub struct QueueAdvancer;

impl TrackAdvancer for QueueAdvancer {
    fn play_next(&mut self, state: &mut AppState) -> Option<Track> {
        match next_index(state) {
            Some(i) => {
                state.current_index = Some(i);
                state.queue.get(i).cloned()
            }
            None => {
                state.is_playing = false;
                None
            }
        }
    }
}
