use crate::api::models::{SessionSettings, Track};
use crate::config::ClientConfig;
use crate::playback::queue::PlaylistQueue;
use tracing::debug;

/// What the audio element needs to start a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub url: String,
    pub details: String,
    pub bitrate: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Started(Track),
    Paused(Track),
    Resumed(Track),
    Stopped { track: Track, completed: bool },
}

impl PlayerEvent {
    pub fn track(&self) -> &Track {
        match self {
            Self::Started(track) | Self::Paused(track) | Self::Resumed(track) => track,
            Self::Stopped { track, .. } => track,
        }
    }
}

/// Receives player transitions for the current track.
pub trait TrackListener {
    fn on_player_event(&mut self, event: &PlayerEvent);
}

/// Holds the current track and turns player callbacks into events.
pub struct Player {
    share_uri: String,
    allow_caching: bool,
    current_track: Option<Track>,
    listeners: Vec<Box<dyn TrackListener>>,
}

impl Player {
    pub fn new(config: &ClientConfig, session: &SessionSettings) -> Self {
        Self {
            share_uri: config.share_uri.clone(),
            allow_caching: session.allow_caching,
            current_track: None,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn TrackListener>) {
        self.listeners.push(listener);
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn stream_url(&self, track: &Track) -> String {
        let mut url = format!("{}{}?play", self.share_uri, track.hash);
        if self.allow_caching {
            url.push_str("&allowcaching");
        }
        url
    }

    /// Make `track` current and build its stream request.
    pub fn play_track(&mut self, track: Track) -> PlayRequest {
        let request = PlayRequest {
            url: self.stream_url(&track),
            details: track.display_line(),
            bitrate: track.bitrate,
        };
        debug!(hash = %track.hash, "playing track");
        self.current_track = Some(track);
        request
    }

    /// Next/play button. `None` when the queue has nothing to play.
    pub fn next(&mut self, queue: &mut PlaylistQueue) -> Option<PlayRequest> {
        let next = queue.next(self.current_track.as_ref())?;
        Some(self.play_track(next))
    }

    pub fn prev(&mut self, queue: &mut PlaylistQueue) -> Option<PlayRequest> {
        let prev = queue.prev(self.current_track.as_ref())?;
        Some(self.play_track(prev))
    }

    pub fn track_started(&mut self) -> Option<PlayerEvent> {
        self.emit(PlayerEvent::Started)
    }

    pub fn track_paused(&mut self) -> Option<PlayerEvent> {
        self.emit(PlayerEvent::Paused)
    }

    pub fn track_resumed(&mut self) -> Option<PlayerEvent> {
        self.emit(PlayerEvent::Resumed)
    }

    /// Player stopped. A completed track advances the queue; when nothing
    /// follows, the current track is cleared.
    pub fn track_stopped(
        &mut self,
        completed: bool,
        queue: &mut PlaylistQueue,
    ) -> (Option<PlayerEvent>, Option<PlayRequest>) {
        let event = self.emit(|track| PlayerEvent::Stopped { track, completed });
        if !completed {
            return (event, None);
        }

        let next = self.next(queue);
        if next.is_none() {
            self.current_track = None;
        }
        (event, next)
    }

    fn emit(&mut self, build: impl FnOnce(Track) -> PlayerEvent) -> Option<PlayerEvent> {
        let event = build(self.current_track.clone()?);
        for listener in &mut self.listeners {
            listener.on_player_event(&event);
        }
        Some(event)
    }
}
