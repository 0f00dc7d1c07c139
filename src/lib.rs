//! Client core for the Vibe Streamer web player.
//!
//! Queue sequencing (linear, repeat and shuffle), batched playlist transfer,
//! drag and drop into the queue, and the plugin logic (saved playlists,
//! Last.fm, now playing, online users), all talking to the server through
//! [`api::VibeClient`].

pub mod api;
pub mod config;
pub mod db;
pub mod dd;
pub mod diagnostics;
pub mod error;
pub mod playback;
pub mod plugins;
pub mod status;
pub mod transfer;
pub mod utils;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use playback::{PlaybackSequencer, Player, PlaylistQueue};
pub use transfer::ChunkedTransferEngine;
