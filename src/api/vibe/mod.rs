use crate::api::backend::*;
use crate::api::models::*;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const SESSION_PATH: &str = "resources/ajax/get-session.vibe";
const STATUS_PATH: &str = "resources/ajax/get-status.vibe";
const INDEX_FILES_PATH: &str = "resources/ajax/get-index-files.vibe";
const INDEX_SEARCH_PATH: &str = "resources/ajax/get-index-searchfiles.vibe";
const INDEX_ITEMS_PATH: &str = "resources/ajax/get-index-items.vibe";

const PLAYLISTS_PATH: &str = "plugins/playlists/resources/ajax/get-playlists.vibe";
const PLAYLIST_ITEMS_PATH: &str = "plugins/playlists/resources/ajax/get-playlistitems.vibe";
const SAVE_PLAYLIST_ITEMS_PATH: &str = "plugins/playlists/resources/ajax/save-playlistitems.vibe";
const CREATE_PLAYLIST_PATH: &str = "plugins/playlists/resources/ajax/create-playlist.vibe";
const UPDATE_PLAYLIST_PATH: &str = "plugins/playlists/resources/ajax/update-playlist.vibe";
const REMOVE_PLAYLIST_PATH: &str = "plugins/playlists/resources/ajax/remove-playlist.vibe";

const LASTFM_HANDSHAKE_PATH: &str = "plugins/lastfm/resources/ajax/request-handshake.vibe";
const LASTFM_NOW_PLAYING_PATH: &str = "plugins/lastfm/resources/ajax/request-nowplaying.vibe";
const LASTFM_SUBMISSION_PATH: &str = "plugins/lastfm/resources/ajax/request-submission.vibe";

const COVER_LOOKUP_PATH: &str = "plugins/nowplaying/resources/ajax/get-cover.vibe";
const COVER_EMBEDDED_PATH: &str = "plugins/nowplaying/resources/ajax/cover.vibe";

const ONLINE_USERS_PATH: &str = "plugins/onlineusers/resources/ajax/get-onlineusers.vibe";

/// HTTP client for the Vibe Streamer AJAX endpoints.
///
/// Every endpoint is a form-encoded `POST` answering with JSON. A `null`
/// body means the server rejected the request.
#[derive(Debug, Clone)]
pub struct VibeClient {
    pub server: ServerConfig,
}

impl VibeClient {
    pub fn new(server: ServerConfig) -> Self {
        Self { server }
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!(%url, params = params.len(), "vibe request");

        let response = HTTP_CLIENT.post(&url).form(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "vibe request rejected");
            return Err(Error::server(format!("{path} answered HTTP {status}")));
        }

        let body = response.text().await?;
        decode_result(path, &body)
    }
}

include!("index_and_status.rs");
include!("playlist_mutations.rs");
include!("plugin_requests.rs");

fn decode_result<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    let value: Option<T> = serde_json::from_str(body)?;
    value.ok_or_else(|| Error::server(format!("{path} returned no result")))
}

/// Comma-joined hash list as the index endpoints expect it.
fn join_hashes(refs: &[String]) -> String {
    refs.join(",")
}

fn first_playlist(path: &str, mut playlists: Vec<Playlist>) -> Result<Playlist> {
    if playlists.is_empty() {
        return Err(Error::server(format!("{path} returned an empty playlist list")));
    }
    Ok(playlists.swap_remove(0))
}
