//! Next/previous track selection for linear, repeat and shuffle playback.
//!
//! The sequencer never owns the queue. Callers pass the current queue and the
//! currently playing track on every call; the sequencer only keeps the flags
//! and the shuffle bookkeeping. Tracks are identified by their content hash.

use crate::api::models::Track;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Shuffle bookkeeping for one shuffle cycle.
///
/// `remaining` and the tracks in `history` played during the current cycle
/// never overlap; a repeat refill starts a new cycle.
#[derive(Debug, Clone, Default)]
pub struct ShuffleState {
    remaining: Vec<Track>,
    history: Vec<Track>,
    position: Option<usize>,
}

impl ShuffleState {
    pub fn remaining(&self) -> &[Track] {
        &self.remaining
    }

    pub fn history(&self) -> &[Track] {
        &self.history
    }

    /// Index into `history` of the track last handed out, `None` before the
    /// first shuffled pick.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    fn clear(&mut self) {
        self.remaining.clear();
        self.history.clear();
        self.position = None;
    }

    fn has_redo(&self) -> bool {
        match self.position {
            Some(position) => position + 1 < self.history.len(),
            None => !self.history.is_empty(),
        }
    }

    fn contains_remaining(&self, track: &Track) -> bool {
        self.remaining.iter().any(|candidate| candidate == track)
    }

    fn forget(&mut self, track: &Track) {
        self.remaining.retain(|candidate| candidate != track);

        while let Some(index) = self.history.iter().position(|played| played == track) {
            self.history.remove(index);
            if let Some(position) = self.position {
                if index <= position {
                    self.position = position.checked_sub(1);
                }
            }
        }
    }
}

pub struct PlaybackSequencer {
    shuffle_enabled: bool,
    repeat_enabled: bool,
    shuffle: ShuffleState,
    rng: StdRng,
}

impl Default for PlaybackSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSequencer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic shuffle order, for tests and reproducible sessions.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            shuffle_enabled: false,
            repeat_enabled: false,
            shuffle: ShuffleState::default(),
            rng,
        }
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    pub fn repeat_enabled(&self) -> bool {
        self.repeat_enabled
    }

    pub fn shuffle_state(&self) -> &ShuffleState {
        &self.shuffle
    }

    /// Toggle shuffle. Any toggle starts over: history is dropped and, when
    /// enabling, every queued track becomes a candidate again.
    pub fn set_shuffle_enabled(&mut self, enabled: bool, queue: &[Track]) {
        self.shuffle_enabled = enabled;
        self.reset_shuffle(queue);
    }

    pub fn set_repeat_enabled(&mut self, enabled: bool) {
        self.repeat_enabled = enabled;
    }

    /// Rebuild shuffle state from `queue`. Used on toggle and when the
    /// whole queue is cleared.
    pub fn reset_shuffle(&mut self, queue: &[Track]) {
        self.shuffle.clear();
        if self.shuffle_enabled {
            self.shuffle.remaining.extend(queue.iter().cloned());
        }
        debug!(
            shuffle = self.shuffle_enabled,
            candidates = self.shuffle.remaining.len(),
            "shuffle state rebuilt"
        );
    }

    /// Keep shuffle bookkeeping in step with queue membership changes.
    /// `queue` is the queue after the change. Does nothing in linear mode.
    pub fn on_queue_mutated(&mut self, queue: &[Track], added: &[Track], removed: &[Track]) {
        if !self.shuffle_enabled {
            return;
        }

        for track in removed {
            if queue.contains(track) {
                // Another copy of the same file is still queued.
                continue;
            }
            self.shuffle.forget(track);
        }

        for track in added {
            if queue.contains(track) && !self.shuffle.contains_remaining(track) {
                self.shuffle.remaining.push(track.clone());
            }
        }
    }

    /// Track to play after `current`, or `None` when playback should stop.
    pub fn resolve_next(&mut self, queue: &[Track], current: Option<&Track>) -> Option<Track> {
        let next = if self.shuffle_enabled {
            self.next_shuffled(queue)
        } else {
            current.and_then(|current| self.next_linear(queue, current))
        };

        // Nothing has played yet: start at the top regardless of mode.
        if next.is_none() && current.is_none() {
            return queue.first().cloned();
        }
        next
    }

    /// Track to play before `current`, or `None` when there is none.
    pub fn resolve_prev(&mut self, queue: &[Track], current: Option<&Track>) -> Option<Track> {
        let current = current?;

        if self.shuffle_enabled {
            let position = self.shuffle.position.filter(|position| *position > 0)?;
            self.shuffle.position = Some(position - 1);
            return self.shuffle.history.get(position - 1).cloned();
        }

        let index = queue.iter().position(|track| track == current)?;
        index.checked_sub(1).and_then(|prev| queue.get(prev).cloned())
    }

    fn next_linear(&self, queue: &[Track], current: &Track) -> Option<Track> {
        let index = queue.iter().position(|track| track == current)?;
        match queue.get(index + 1) {
            Some(track) => Some(track.clone()),
            None if self.repeat_enabled => queue.first().cloned(),
            None => None,
        }
    }

    fn next_shuffled(&mut self, queue: &[Track]) -> Option<Track> {
        if self.shuffle.has_redo() {
            let position = self.shuffle.position.map_or(0, |position| position + 1);
            self.shuffle.position = Some(position);
            return self.shuffle.history.get(position).cloned();
        }

        if self.shuffle.remaining.is_empty() && self.repeat_enabled {
            debug!(tracks = queue.len(), "shuffle cycle complete, refilling");
            self.shuffle.clear();
            self.shuffle.remaining.extend(queue.iter().cloned());
        }

        if self.shuffle.remaining.is_empty() {
            return None;
        }

        let pick = self.rng.gen_range(0..self.shuffle.remaining.len());
        let track = self.shuffle.remaining.remove(pick);
        self.shuffle.history.push(track.clone());
        self.shuffle.position = Some(self.shuffle.history.len() - 1);
        Some(track)
    }
}
