//! Last.fm scrobbling through the server-side relay.

use crate::api::backend::ScrobbleBackend;
use crate::api::models::Track;
use crate::error::{Error, Result};
use crate::playback::player::PlayerEvent;
use tracing::{debug, info, warn};

/// Tracks shorter than this are never submitted, in seconds.
const MIN_SCROBBLE_LENGTH: i64 = 30;
/// Listening this long always qualifies, in seconds.
const ALWAYS_SCROBBLE_AFTER: i64 = 240;

#[derive(Debug, Clone, PartialEq)]
pub enum ScrobbleAction {
    NowPlaying(Track),
    Submit { track: Track, started_at: i64 },
}

/// Listening-time bookkeeping for the current track. Times are unix
/// seconds; zero means "not set".
#[derive(Debug, Default)]
pub struct ScrobbleTracker {
    logged_in: bool,
    started_at: i64,
    paused_at: i64,
    paused_for: i64,
}

impl ScrobbleTracker {
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.logged_in = logged_in;
    }

    /// Feed a player event observed at `now`; returns the request to make,
    /// if any.
    pub fn observe(&mut self, event: &PlayerEvent, now: i64) -> Option<ScrobbleAction> {
        match event {
            PlayerEvent::Started(track) => {
                self.started_at = now;
                (self.logged_in && track.has_artist_and_title())
                    .then(|| ScrobbleAction::NowPlaying(track.clone()))
            }
            PlayerEvent::Paused(_) => {
                self.paused_at = now;
                None
            }
            PlayerEvent::Resumed(_) => {
                if self.paused_at > 0 {
                    self.paused_for += now - self.paused_at;
                }
                self.paused_at = 0;
                None
            }
            PlayerEvent::Stopped { track, .. } => {
                let action = self.submission(track, now);
                self.reset();
                action
            }
        }
    }

    fn submission(&self, track: &Track, now: i64) -> Option<ScrobbleAction> {
        if !self.logged_in || !track.has_artist_and_title() || self.started_at < 1 {
            return None;
        }

        let played = (now - self.started_at) - self.paused_for;
        let length = i64::from(track.length.unwrap_or(0));
        let qualifies = length > MIN_SCROBBLE_LENGTH
            && (played > ALWAYS_SCROBBLE_AFTER || played * 2 > length);
        debug!(hash = %track.hash, played, length, qualifies, "scrobble check");

        qualifies.then(|| ScrobbleAction::Submit {
            track: track.clone(),
            started_at: self.started_at,
        })
    }

    fn reset(&mut self) {
        self.started_at = 0;
        self.paused_at = 0;
        self.paused_for = 0;
    }
}

pub struct LastFmPlugin<B> {
    backend: B,
    tracker: ScrobbleTracker,
}

impl<B: ScrobbleBackend> LastFmPlugin<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            tracker: ScrobbleTracker::default(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.tracker.is_logged_in()
    }

    /// Returns whether the relay accepted the credentials.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<bool> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "username and password are required".to_string(),
            ));
        }
        let accepted = self.backend.handshake(username, password).await?;
        self.tracker.set_logged_in(accepted);
        info!(user = %username, accepted, "last.fm handshake");
        Ok(accepted)
    }

    pub async fn on_player_event(&mut self, event: &PlayerEvent) -> Result<()> {
        self.on_player_event_at(event, chrono::Utc::now().timestamp())
            .await
    }

    pub async fn on_player_event_at(&mut self, event: &PlayerEvent, now: i64) -> Result<()> {
        let Some(action) = self.tracker.observe(event, now) else {
            return Ok(());
        };
        let result = match &action {
            ScrobbleAction::NowPlaying(track) => self.backend.now_playing(track).await,
            ScrobbleAction::Submit { track, started_at } => {
                self.backend.submit(track, *started_at).await
            }
        };
        if let Err(err) = &result {
            warn!("last.fm request failed: {err}");
        }
        result
    }
}
