use serde::{Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};

/// Server connection settings for one Vibe Streamer instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl ServerConfig {
    pub fn new(name: String, url: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            url: url.trim_end_matches('/').to_string(),
        }
    }
}

/// One playable media item. Identity is the content `hash`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Track {
    pub hash: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "shareId", alias = "share_id", deserialize_with = "lenient_string")]
    pub share_id: String,
    #[serde(default, rename = "mdArtist", alias = "md_artist", deserialize_with = "blank_as_none")]
    pub artist: Option<String>,
    #[serde(default, rename = "mdTitle", alias = "md_title", deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, rename = "mdAlbum", alias = "md_album", deserialize_with = "blank_as_none")]
    pub album: Option<String>,
    #[serde(default, rename = "mdTrack", alias = "md_track", deserialize_with = "lenient_u32")]
    pub track: Option<u32>,
    #[serde(default, rename = "mdYear", alias = "md_year", deserialize_with = "lenient_u32")]
    pub year: Option<u32>,
    #[serde(default, rename = "mdLength", alias = "md_length", deserialize_with = "lenient_u32")]
    pub length: Option<u32>,
    #[serde(default, rename = "mdBitRate", alias = "md_bit_rate", deserialize_with = "lenient_u32")]
    pub bitrate: Option<u32>,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl Track {
    pub fn has_artist_and_title(&self) -> bool {
        self.artist.is_some() && self.title.is_some()
    }

    /// Single-line label shown by the player: `artist - title`, else the
    /// title, else the file name.
    pub fn display_line(&self) -> String {
        match (self.artist.as_deref(), self.title.as_deref()) {
            (Some(artist), title) => format!("{} - {}", artist, title.unwrap_or_default()),
            (None, Some(title)) => title.to_string(),
            (None, None) => self.name.clone(),
        }
    }
}

/// Explorer entry as returned by the index endpoints. Directories carry
/// child counts; files carry the track metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IndexEntry {
    #[serde(flatten)]
    pub track: Track,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub directory: bool,
    #[serde(default, deserialize_with = "lenient_u32_or_zero")]
    pub directories: u32,
    #[serde(default, deserialize_with = "lenient_u32_or_zero")]
    pub files: u32,
    #[serde(default, alias = "itemId", deserialize_with = "lenient_string")]
    pub item_id: String,
    #[serde(default, alias = "parentItemId", deserialize_with = "lenient_string")]
    pub parent_item_id: String,
}

impl IndexEntry {
    pub fn has_children(&self) -> bool {
        self.directory && (self.directories > 0 || self.files > 0)
    }
}

impl From<IndexEntry> for Track {
    fn from(entry: IndexEntry) -> Self {
        entry.track
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Playlist {
    #[serde(alias = "playlistId", deserialize_with = "lenient_string")]
    pub playlist_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaylistItem {
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OnlineUser {
    #[serde(default)]
    pub guid: String,
    pub name: String,
    #[serde(default, alias = "remoteAddress")]
    pub remote_address: String,
    #[serde(default, alias = "lastLogin", deserialize_with = "lenient_string")]
    pub last_login: String,
    #[serde(default, alias = "lastPlayed", deserialize_with = "lenient_string")]
    pub last_played: String,
}

impl OnlineUser {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.remote_address)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionSettings {
    #[serde(default, alias = "allowCaching", deserialize_with = "lenient_bool")]
    pub allow_caching: bool,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default, alias = "playerBufferTime", deserialize_with = "lenient_u32")]
    pub player_buffer_time: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionUser {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub admin: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub browser: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Session {
    #[serde(default)]
    pub settings: SessionSettings,
    #[serde(default)]
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CoverLookup {
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatusReply {
    #[serde(default)]
    pub status: String,
}

impl StatusReply {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

fn lenient_value_to_u32(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                return u32::try_from(unsigned).ok();
            }
            if let Some(float) = number.as_f64() {
                if float.is_finite() && float >= 0.0 {
                    return u32::try_from(float.round() as u64).ok();
                }
            }
            None
        }
        serde_json::Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_value_to_u32(&value))
}

fn lenient_u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u32(deserializer)?.unwrap_or_default())
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(boolean) => boolean,
        serde_json::Value::String(text) => {
            matches!(text.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        }
        serde_json::Value::Number(number) => number.as_u64().map(|n| n > 0).unwrap_or(false),
        _ => false,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Number(number) => number.to_string(),
        serde_json::Value::Bool(boolean) => boolean.to_string(),
        _ => String::new(),
    })
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_items_accept_string_encoded_numbers() {
        let json = r#"{
            "hash": "abc",
            "name": "01 - Intro.mp3",
            "shareId": 3,
            "mdArtist": "Artist",
            "mdTitle": "",
            "mdYear": "1999",
            "mdLength": 245,
            "directory": false
        }"#;
        let entry: IndexEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.track.share_id, "3");
        assert_eq!(entry.track.year, Some(1999));
        assert_eq!(entry.track.length, Some(245));
        assert_eq!(entry.track.title, None);
        assert!(!entry.directory);
    }

    #[test]
    fn directories_report_children() {
        let json = r#"{"hash":"d1","name":"Album","directory":true,"directories":"0","files":"12"}"#;
        let entry: IndexEntry = serde_json::from_str(json).unwrap();
        assert!(entry.has_children());
    }

    #[test]
    fn tracks_compare_by_hash_only() {
        let a = Track {
            hash: "h".into(),
            name: "a.mp3".into(),
            ..Default::default()
        };
        let b = Track {
            hash: "h".into(),
            name: "renamed.mp3".into(),
            ..Default::default()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn display_line_falls_back_to_file_name() {
        let mut track = Track {
            hash: "h".into(),
            name: "song.mp3".into(),
            ..Default::default()
        };
        assert_eq!(track.display_line(), "song.mp3");
        track.title = Some("Song".into());
        assert_eq!(track.display_line(), "Song");
        track.artist = Some("Band".into());
        assert_eq!(track.display_line(), "Band - Song");
    }

    #[test]
    fn blank_tags_decode_as_missing() {
        let json = r#"{"hash": "h", "name": "a.mp3", "mdArtist": "", "mdTitle": "  ", "mdAlbum": null}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.artist, None);
        assert_eq!(track.title, None);
        assert_eq!(track.album, None);
        assert_eq!(track.display_line(), "a.mp3");
    }
}
