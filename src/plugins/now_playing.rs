use crate::api::backend::CoverBackend;
use crate::api::models::Track;
use crate::config::ClientConfig;
use crate::utils::format_duration;
use tracing::warn;

const UNKNOWN: &str = "Unknown";

/// Labels shown for the track that just started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingInfo {
    pub title: String,
    pub artist: String,
    /// Album name, suffixed with ` (year)` when the year is known
    pub album: String,
    /// Track length as `MM:SS`, when known
    pub length: Option<String>,
}

impl NowPlayingInfo {
    pub fn from_track(track: &Track) -> Self {
        let mut album = track.album.clone().unwrap_or_else(|| UNKNOWN.to_string());
        if let Some(year) = track.year.filter(|year| *year > 0) {
            album = format!("{album} ({year})");
        }
        Self {
            title: track.title.clone().unwrap_or_else(|| track.name.clone()),
            artist: track.artist.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            album,
            length: track.length.filter(|length| *length > 0).map(format_duration),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    /// Cover image stored as its own file in the share
    Share(String),
    /// Artwork embedded in the audio file, served by the plugin
    Embedded(String),
}

impl CoverSource {
    pub fn url(&self) -> &str {
        match self {
            Self::Share(url) | Self::Embedded(url) => url,
        }
    }
}

pub struct NowPlayingPlugin<B> {
    backend: B,
    share_uri: String,
    last_artist: Option<String>,
    last_album: Option<String>,
}

impl<B: CoverBackend> NowPlayingPlugin<B> {
    pub fn new(backend: B, config: &ClientConfig) -> Self {
        Self {
            backend,
            share_uri: config.share_uri.clone(),
            last_artist: None,
            last_album: None,
        }
    }

    /// Labels for `track`, plus a new cover when artist or album changed
    /// since the last lookup. `None` means keep the current cover. A failed
    /// lookup falls back to the embedded artwork.
    pub async fn track_started(&mut self, track: &Track) -> (NowPlayingInfo, Option<CoverSource>) {
        let info = NowPlayingInfo::from_track(track);
        let unchanged = self.last_artist.as_deref() == Some(info.artist.as_str())
            && self.last_album.as_deref() == Some(info.album.as_str());
        if unchanged {
            return (info, None);
        }

        let cover = match self.backend.lookup_cover(track).await {
            Ok(Some(hash)) => CoverSource::Share(format!("{}{hash}", self.share_uri)),
            Ok(None) => CoverSource::Embedded(self.backend.embedded_cover_url(track)),
            Err(err) => {
                warn!(hash = %track.hash, "cover lookup failed: {err}");
                CoverSource::Embedded(self.backend.embedded_cover_url(track))
            }
        };
        self.last_artist = Some(info.artist.clone());
        self.last_album = Some(info.album.clone());
        (info, Some(cover))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use std::cell::Cell;

    struct FakeCovers {
        cover_hash: Option<String>,
        fail: bool,
        lookups: Cell<usize>,
    }

    impl CoverBackend for FakeCovers {
        async fn lookup_cover(&self, _track: &Track) -> Result<Option<String>> {
            self.lookups.set(self.lookups.get() + 1);
            if self.fail {
                return Err(Error::server("cover lookup failed"));
            }
            Ok(self.cover_hash.clone())
        }

        fn embedded_cover_url(&self, track: &Track) -> String {
            format!("cover.vibe?hash={}", track.hash)
        }
    }

    fn covers(cover_hash: Option<&str>) -> FakeCovers {
        FakeCovers {
            cover_hash: cover_hash.map(str::to_string),
            fail: false,
            lookups: Cell::new(0),
        }
    }

    fn track(hash: &str, album: &str) -> Track {
        Track {
            hash: hash.to_string(),
            name: format!("{hash}.mp3"),
            artist: Some("Artist".to_string()),
            album: Some(album.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn labels_fall_back_for_missing_tags() {
        let bare = Track {
            hash: "x".to_string(),
            name: "x.mp3".to_string(),
            year: Some(1999),
            ..Default::default()
        };
        let info = NowPlayingInfo::from_track(&bare);
        assert_eq!(info.title, "x.mp3");
        assert_eq!(info.artist, "Unknown");
        assert_eq!(info.album, "Unknown (1999)");
        assert_eq!(info.length, None);
    }

    #[test]
    fn length_is_shown_as_minutes_and_seconds() {
        let mut tagged = track("x", "Blue");
        tagged.length = Some(245);
        assert_eq!(NowPlayingInfo::from_track(&tagged).length.as_deref(), Some("04:05"));
    }

    #[test]
    fn zero_year_is_not_shown() {
        let mut tagged = track("x", "Blue");
        tagged.year = Some(0);
        assert_eq!(NowPlayingInfo::from_track(&tagged).album, "Blue");
    }

    #[tokio::test]
    async fn cover_is_fetched_once_per_album() {
        let mut plugin = NowPlayingPlugin::new(covers(Some("c0ver")), &ClientConfig::default());

        let (_, cover) = plugin.track_started(&track("a", "Blue")).await;
        assert_eq!(cover, Some(CoverSource::Share("share/c0ver".to_string())));

        let (_, cover) = plugin.track_started(&track("b", "Blue")).await;
        assert_eq!(cover, None);

        plugin.track_started(&track("c", "Red")).await;
        assert_eq!(plugin.backend.lookups.get(), 2);
    }

    #[tokio::test]
    async fn embedded_cover_is_the_fallback() {
        let mut plugin = NowPlayingPlugin::new(covers(None), &ClientConfig::default());
        let (_, cover) = plugin.track_started(&track("a", "Blue")).await;
        assert_eq!(
            cover.as_ref().map(CoverSource::url),
            Some("cover.vibe?hash=a")
        );
    }

    #[tokio::test]
    async fn failed_lookup_uses_embedded_artwork() {
        let mut failing = covers(None);
        failing.fail = true;
        let mut plugin = NowPlayingPlugin::new(failing, &ClientConfig::default());

        let (_, cover) = plugin.track_started(&track("a", "Blue")).await;
        assert_eq!(cover, Some(CoverSource::Embedded("cover.vibe?hash=a".to_string())));
        let (_, cover) = plugin.track_started(&track("b", "Blue")).await;
        assert_eq!(cover, None);
        assert_eq!(plugin.backend.lookups.get(), 1);
    }
}
