pub mod player;
pub mod queue;
pub mod sequencer;

pub use player::{PlayRequest, Player, PlayerEvent, TrackListener};
pub use queue::PlaylistQueue;
pub use sequencer::{PlaybackSequencer, ShuffleState};
