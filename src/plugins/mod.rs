pub mod lastfm;
pub mod now_playing;
pub mod online_users;
pub mod playlists;

pub use lastfm::{LastFmPlugin, ScrobbleAction, ScrobbleTracker};
pub use now_playing::{CoverSource, NowPlayingInfo, NowPlayingPlugin};
pub use playlists::PlaylistsPlugin;
