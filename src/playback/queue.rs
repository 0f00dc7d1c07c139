use crate::api::models::Track;
use crate::config::ClientConfig;
use crate::playback::sequencer::PlaybackSequencer;
use crate::utils::file_extension;
use std::collections::HashSet;
use tracing::debug;

/// The "now playing" list plus the sequencer that walks it.
pub struct PlaylistQueue {
    tracks: Vec<Track>,
    sequencer: PlaybackSequencer,
    player_filetypes: Vec<String>,
    busy: bool,
}

impl PlaylistQueue {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_sequencer(config, PlaybackSequencer::new())
    }

    pub fn with_sequencer(config: &ClientConfig, sequencer: PlaybackSequencer) -> Self {
        Self {
            tracks: Vec::new(),
            sequencer,
            player_filetypes: config
                .player_filetypes
                .iter()
                .map(|filetype| filetype.to_ascii_lowercase())
                .collect(),
            busy: false,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Content hashes in queue order, ready for a playlist save.
    pub fn refs(&self) -> Vec<String> {
        self.tracks.iter().map(|track| track.hash.clone()).collect()
    }

    pub fn sequencer(&self) -> &PlaybackSequencer {
        &self.sequencer
    }

    /// Set while a drop or playlist load is filling the queue.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn set_shuffle_enabled(&mut self, enabled: bool) {
        self.sequencer.set_shuffle_enabled(enabled, &self.tracks);
    }

    pub fn set_repeat_enabled(&mut self, enabled: bool) {
        self.sequencer.set_repeat_enabled(enabled);
    }

    fn is_supported(&self, track: &Track) -> bool {
        let extension = file_extension(&track.name).to_ascii_lowercase();
        self.player_filetypes.contains(&extension)
    }

    /// Insert the playable tracks at `at` (appending when `None` or past the
    /// end). Returns how many were inserted.
    pub fn insert_tracks(&mut self, tracks: Vec<Track>, at: Option<usize>) -> usize {
        let supported: Vec<Track> = tracks
            .into_iter()
            .filter(|track| self.is_supported(track))
            .collect();
        if supported.is_empty() {
            return 0;
        }

        let index = at.unwrap_or(self.tracks.len()).min(self.tracks.len());
        let inserted = supported.len();
        let tail = self.tracks.split_off(index);
        self.tracks.extend(supported.iter().cloned());
        self.tracks.extend(tail);
        self.sequencer.on_queue_mutated(&self.tracks, &supported, &[]);

        debug!(inserted, total = self.tracks.len(), "tracks queued");
        inserted
    }

    /// Remove every queued track whose hash is in `hashes`. Returns the track
    /// to select afterwards: the one below the bottom-most removed track,
    /// else the last remaining one.
    pub fn remove_tracks(&mut self, hashes: &[String]) -> Option<Track> {
        let doomed: HashSet<&str> = hashes.iter().map(String::as_str).collect();
        let bottom = self
            .tracks
            .iter()
            .rposition(|track| doomed.contains(track.hash.as_str()))?;
        let next = self.tracks.get(bottom + 1).cloned();

        let (removed, kept): (Vec<Track>, Vec<Track>) = self
            .tracks
            .drain(..)
            .partition(|track| doomed.contains(track.hash.as_str()));
        self.tracks = kept;
        self.sequencer.on_queue_mutated(&self.tracks, &[], &removed);

        debug!(removed = removed.len(), total = self.tracks.len(), "tracks removed");
        next.or_else(|| self.tracks.last().cloned())
    }

    pub fn remove_all_tracks(&mut self) {
        self.tracks.clear();
        self.sequencer.reset_shuffle(&self.tracks);
    }

    pub fn next(&mut self, current: Option<&Track>) -> Option<Track> {
        self.sequencer.resolve_next(&self.tracks, current)
    }

    pub fn prev(&mut self, current: Option<&Track>) -> Option<Track> {
        self.sequencer.resolve_prev(&self.tracks, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(hash: &str, name: &str) -> Track {
        Track {
            hash: hash.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn queue_with(hashes: &[&str]) -> PlaylistQueue {
        let mut queue =
            PlaylistQueue::with_sequencer(&ClientConfig::default(), PlaybackSequencer::with_seed(1));
        let tracks = hashes
            .iter()
            .map(|hash| track(hash, &format!("{hash}.mp3")))
            .collect();
        queue.insert_tracks(tracks, None);
        queue
    }

    #[test]
    fn unsupported_files_are_not_queued() {
        let mut queue = queue_with(&[]);
        let inserted = queue.insert_tracks(
            vec![
                track("a", "one.MP3"),
                track("b", "cover.jpg"),
                track("c", "notes"),
            ],
            None,
        );
        assert_eq!(inserted, 1);
        assert_eq!(queue.refs(), vec!["a"]);
    }

    #[test]
    fn insert_at_position() {
        let mut queue = queue_with(&["a", "d"]);
        queue.insert_tracks(vec![track("b", "b.mp3"), track("c", "c.mp3")], Some(1));
        assert_eq!(queue.refs(), vec!["a", "b", "c", "d"]);

        queue.insert_tracks(vec![track("e", "e.mp3")], Some(99));
        assert_eq!(queue.refs(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn removal_selects_track_below_bottom_most_removed() {
        let mut queue = queue_with(&["a", "b", "c", "d"]);
        let next = queue.remove_tracks(&["b".to_string(), "a".to_string()]);
        assert_eq!(next.map(|t| t.hash), Some("c".to_string()));
        assert_eq!(queue.refs(), vec!["c", "d"]);
    }

    #[test]
    fn removing_the_tail_selects_the_last_remaining_track() {
        let mut queue = queue_with(&["a", "b", "c"]);
        let next = queue.remove_tracks(&["c".to_string()]);
        assert_eq!(next.map(|t| t.hash), Some("b".to_string()));

        let mut single = queue_with(&["a"]);
        assert_eq!(single.remove_tracks(&["a".to_string()]), None);
        assert!(single.is_empty());
    }

    #[test]
    fn removing_unknown_hashes_changes_nothing() {
        let mut queue = queue_with(&["a", "b"]);
        assert_eq!(queue.remove_tracks(&["zz".to_string()]), None);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn shuffle_candidates_follow_queue_changes() {
        let mut queue = queue_with(&["a", "b"]);
        queue.set_shuffle_enabled(true);
        assert_eq!(queue.sequencer().shuffle_state().remaining().len(), 2);

        queue.insert_tracks(vec![track("c", "c.mp3")], None);
        assert_eq!(queue.sequencer().shuffle_state().remaining().len(), 3);

        queue.remove_tracks(&["a".to_string()]);
        assert_eq!(queue.sequencer().shuffle_state().remaining().len(), 2);

        queue.remove_all_tracks();
        assert!(queue.sequencer().shuffle_state().remaining().is_empty());
        assert!(queue.sequencer().shuffle_enabled());
    }

    #[test]
    fn next_and_prev_walk_the_queue() {
        let mut queue = queue_with(&["a", "b"]);
        let first = queue.next(None).unwrap();
        assert_eq!(first.hash, "a");
        let second = queue.next(Some(&first)).unwrap();
        assert_eq!(second.hash, "b");
        assert_eq!(queue.prev(Some(&second)).map(|t| t.hash), Some("a".to_string()));
    }
}
