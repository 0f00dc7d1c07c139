//! Drag and drop into the play queue.

use crate::api::backend::{IndexBackend, PlaylistBackend};
use crate::api::models::{IndexEntry, Track};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::playback::queue::PlaylistQueue;
use crate::transfer::ChunkedTransferEngine;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Where a drop came from.
#[derive(Debug, Clone)]
pub enum DropSource {
    /// Explorer selection: files and directories
    Explorer(Vec<IndexEntry>),
    /// Rows dragged within the queue itself
    Queue(Vec<Track>),
    /// A saved playlist, by id
    Playlist(String),
}

/// Whether the drop target should accept `source`. An explorer selection is
/// rejected when any plain file in it cannot be played.
pub fn validate_drop(source: &DropSource, config: &ClientConfig) -> bool {
    match source {
        DropSource::Explorer(entries) => entries
            .iter()
            .all(|entry| entry.directory || config.is_playable(&entry.track.name)),
        DropSource::Queue(_) | DropSource::Playlist(_) => true,
    }
}

/// Resolve a drop into tracks, in the order they should be queued.
pub async fn load_drop<B>(
    source: DropSource,
    backend: &B,
    engine: &ChunkedTransferEngine,
    cancel: &CancellationToken,
) -> Result<Vec<Track>>
where
    B: IndexBackend + PlaylistBackend,
{
    match source {
        DropSource::Explorer(entries) => Ok(expand_entries(entries, backend).await),
        DropSource::Queue(tracks) => Ok(tracks),
        DropSource::Playlist(playlist_id) => {
            let refs = backend.fetch_playlist_item_refs(&playlist_id).await?;
            let report = engine.load_tracks(backend, &refs, cancel).await?;
            Ok(report.records)
        }
    }
}

/// Depth-first expansion: a directory's children take its place at the
/// front of the work list. Directories whose listing fails are skipped.
async fn expand_entries<B: IndexBackend>(entries: Vec<IndexEntry>, backend: &B) -> Vec<Track> {
    let mut pending: VecDeque<IndexEntry> = entries.into();
    let mut tracks = Vec::new();

    while let Some(entry) = pending.pop_front() {
        if !entry.directory {
            tracks.push(Track::from(entry));
            continue;
        }
        if !entry.has_children() {
            continue;
        }

        match backend
            .list_directory(&entry.track.share_id, &entry.track.hash)
            .await
        {
            Ok(children) => {
                debug!(hash = %entry.track.hash, children = children.len(), "expanded directory");
                for child in children.into_iter().rev() {
                    pending.push_front(child);
                }
            }
            Err(err) => warn!(hash = %entry.track.hash, "skipping directory: {err}"),
        }
    }

    tracks
}

/// Load a drop and insert it into `queue` at `at`. The queue is marked busy
/// while loading. Returns the number of tracks queued.
pub async fn drop_into_queue<B>(
    queue: &mut PlaylistQueue,
    source: DropSource,
    at: Option<usize>,
    backend: &B,
    engine: &ChunkedTransferEngine,
    cancel: &CancellationToken,
) -> Result<usize>
where
    B: IndexBackend + PlaylistBackend,
{
    queue.set_busy(true);
    let loaded = load_drop(source, backend, engine, cancel).await;
    queue.set_busy(false);
    Ok(queue.insert_tracks(loaded?, at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Playlist;
    use crate::error::Error;
    use std::collections::HashMap;

    fn file(hash: &str, name: &str) -> IndexEntry {
        IndexEntry {
            track: Track {
                hash: hash.to_string(),
                name: name.to_string(),
                share_id: "1".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn dir(hash: &str, files: u32) -> IndexEntry {
        IndexEntry {
            track: Track {
                hash: hash.to_string(),
                name: hash.to_string(),
                share_id: "1".to_string(),
                ..Default::default()
            },
            directory: true,
            files,
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct FakeIndex {
        listings: HashMap<String, Vec<IndexEntry>>,
        playlist: Vec<String>,
    }

    impl IndexBackend for FakeIndex {
        async fn resolve_items_by_reference(&self, refs: &[String]) -> Result<Vec<Track>> {
            Ok(refs
                .iter()
                .map(|hash| file(hash, &format!("{hash}.mp3")).track)
                .collect())
        }

        async fn list_directory(&self, _share_id: &str, hash: &str) -> Result<Vec<IndexEntry>> {
            self.listings
                .get(hash)
                .cloned()
                .ok_or_else(|| Error::server("no such directory"))
        }
    }

    impl PlaylistBackend for FakeIndex {
        async fn fetch_playlist_item_refs(&self, _playlist_id: &str) -> Result<Vec<String>> {
            Ok(self.playlist.clone())
        }

        async fn push_playlist_items(&self, _: &str, _: &[String], _: bool) -> Result<()> {
            Ok(())
        }

        async fn list_playlists(&self) -> Result<Vec<Playlist>> {
            Ok(Vec::new())
        }

        async fn create_playlist(&self, name: &str) -> Result<Playlist> {
            Ok(Playlist {
                playlist_id: "1".to_string(),
                name: name.to_string(),
            })
        }

        async fn rename_playlist(&self, playlist_id: &str, name: &str) -> Result<Playlist> {
            Ok(Playlist {
                playlist_id: playlist_id.to_string(),
                name: name.to_string(),
            })
        }

        async fn remove_playlist(&self, _: &str) -> Result<bool> {
            Ok(true)
        }
    }

    fn hashes(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|track| track.hash.as_str()).collect()
    }

    #[test]
    fn explorer_drop_rejects_unplayable_files() {
        let config = ClientConfig::default();
        let ok = DropSource::Explorer(vec![file("a", "a.mp3"), dir("d", 3)]);
        let bad = DropSource::Explorer(vec![file("a", "a.mp3"), file("b", "b.flac")]);
        assert!(validate_drop(&ok, &config));
        assert!(!validate_drop(&bad, &config));
        assert!(validate_drop(&DropSource::Playlist("7".to_string()), &config));
    }

    #[tokio::test]
    async fn directories_expand_depth_first_in_order() {
        let mut backend = FakeIndex::default();
        backend
            .listings
            .insert("root".to_string(), vec![file("r1", "r1.mp3"), dir("sub", 1), file("r2", "r2.mp3")]);
        backend
            .listings
            .insert("sub".to_string(), vec![file("s1", "s1.mp3")]);

        let source = DropSource::Explorer(vec![dir("root", 3), file("last", "last.mp3")]);
        let tracks = load_drop(
            source,
            &backend,
            &ChunkedTransferEngine::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(hashes(&tracks), vec!["r1", "s1", "r2", "last"]);
    }

    #[tokio::test]
    async fn empty_and_unreadable_directories_are_skipped() {
        let backend = FakeIndex::default();
        let source = DropSource::Explorer(vec![dir("empty", 0), dir("broken", 2), file("a", "a.mp3")]);
        let tracks = load_drop(
            source,
            &backend,
            &ChunkedTransferEngine::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(hashes(&tracks), vec!["a"]);
    }

    #[tokio::test]
    async fn playlist_drop_loads_through_the_engine() {
        let backend = FakeIndex {
            playlist: vec!["p1".to_string(), "p2".to_string(), "p3".to_string()],
            ..Default::default()
        };
        let engine = ChunkedTransferEngine {
            load_batch_size: 2,
            save_batch_size: 2,
        };
        let mut queue = PlaylistQueue::new(&ClientConfig::default());

        let inserted = drop_into_queue(
            &mut queue,
            DropSource::Playlist("9".to_string()),
            None,
            &backend,
            &engine,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(queue.refs(), vec!["p1", "p2", "p3"]);
        assert!(!queue.is_busy());
    }
}
