//! Server-facing seams consumed by the client core.
//!
//! `VibeClient` implements all of them over HTTP; tests implement them with
//! in-memory fakes.
#![allow(async_fn_in_trait)]

use crate::api::models::{IndexEntry, OnlineUser, Playlist, Track};
use crate::error::Result;

/// Index lookups: resolving content hashes and listing directories.
pub trait IndexBackend {
    /// Resolve content hashes to full track records.
    async fn resolve_items_by_reference(&self, refs: &[String]) -> Result<Vec<Track>>;

    /// List the files and sub-directories below a directory entry.
    async fn list_directory(&self, share_id: &str, hash: &str) -> Result<Vec<IndexEntry>>;
}

/// Saved playlists stored on the server.
pub trait PlaylistBackend {
    /// Enumerate the item references stored in a playlist, in playlist order.
    async fn fetch_playlist_item_refs(&self, playlist_id: &str) -> Result<Vec<String>>;

    /// Append `refs` to a playlist, replacing its contents first when `clear`.
    async fn push_playlist_items(&self, playlist_id: &str, refs: &[String], clear: bool)
        -> Result<()>;

    async fn list_playlists(&self) -> Result<Vec<Playlist>>;

    async fn create_playlist(&self, name: &str) -> Result<Playlist>;

    async fn rename_playlist(&self, playlist_id: &str, name: &str) -> Result<Playlist>;

    async fn remove_playlist(&self, playlist_id: &str) -> Result<bool>;
}

/// Scrobbling relay; the server talks to Last.fm on the client's behalf.
pub trait ScrobbleBackend {
    /// Log in; `Ok(true)` when the handshake was accepted.
    async fn handshake(&self, username: &str, password: &str) -> Result<bool>;

    async fn now_playing(&self, track: &Track) -> Result<()>;

    /// Submit a finished play that started at `started_at` (unix seconds).
    async fn submit(&self, track: &Track, started_at: i64) -> Result<()>;
}

/// Cover art lookup for the now-playing panel.
pub trait CoverBackend {
    /// Hash of a cover image stored in the share, if the server found one.
    async fn lookup_cover(&self, track: &Track) -> Result<Option<String>>;

    /// URL that renders the embedded cover directly when no share image exists.
    fn embedded_cover_url(&self, track: &Track) -> String;
}

/// Server liveness and the list of connected users.
pub trait StatusBackend {
    async fn check_status(&self) -> Result<()>;

    async fn online_users(&self) -> Result<Vec<OnlineUser>>;
}
