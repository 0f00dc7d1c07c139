use crate::api::backend::{IndexBackend, PlaylistBackend};
use crate::api::models::{Playlist, Track};
use crate::error::Result;
use crate::transfer::{ChunkedTransferEngine, LoadReport, SaveReport};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Saved playlists: listing, naming and moving items in and out.
pub struct PlaylistsPlugin<B> {
    backend: B,
    engine: ChunkedTransferEngine,
}

fn refs_of(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|track| track.hash.clone()).collect()
}

impl<B: PlaylistBackend> PlaylistsPlugin<B> {
    pub fn new(backend: B, engine: ChunkedTransferEngine) -> Self {
        Self { backend, engine }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn list(&self) -> Result<Vec<Playlist>> {
        self.backend.list_playlists().await
    }

    pub async fn create(&self, name: &str) -> Result<Playlist> {
        let playlist = self.backend.create_playlist(name).await?;
        info!(id = %playlist.playlist_id, "playlist created");
        Ok(playlist)
    }

    pub async fn rename(&self, playlist_id: &str, name: &str) -> Result<Playlist> {
        self.backend.rename_playlist(playlist_id, name).await
    }

    pub async fn remove(&self, playlist_id: &str) -> Result<bool> {
        let removed = self.backend.remove_playlist(playlist_id).await?;
        info!(id = %playlist_id, removed, "playlist removal");
        Ok(removed)
    }

    /// Overwrite (`clear`) or extend a playlist with `tracks`.
    pub async fn save_playlist(
        &self,
        playlist_id: &str,
        tracks: &[Track],
        clear: bool,
        cancel: &CancellationToken,
    ) -> Result<SaveReport> {
        self.engine
            .save_refs(&self.backend, playlist_id, &refs_of(tracks), clear, cancel)
            .await
    }

    /// Create a playlist named `name` holding `tracks`.
    pub async fn save_as_new(
        &self,
        name: &str,
        tracks: &[Track],
        cancel: &CancellationToken,
    ) -> Result<(Playlist, SaveReport)> {
        let playlist = self.create(name).await?;
        let report = self
            .save_playlist(&playlist.playlist_id, tracks, false, cancel)
            .await?;
        Ok((playlist, report))
    }

    /// Tracks dropped onto a playlist are appended.
    pub async fn append_drop(
        &self,
        playlist_id: &str,
        tracks: &[Track],
        cancel: &CancellationToken,
    ) -> Result<SaveReport> {
        self.save_playlist(playlist_id, tracks, false, cancel).await
    }
}

impl<B: PlaylistBackend + IndexBackend> PlaylistsPlugin<B> {
    /// Fetch a playlist's items and resolve them to tracks.
    pub async fn load_playlist(
        &self,
        playlist_id: &str,
        cancel: &CancellationToken,
    ) -> Result<LoadReport<Track>> {
        let refs = self.backend.fetch_playlist_item_refs(playlist_id).await?;
        self.engine.load_tracks(&self.backend, &refs, cancel).await
    }
}
