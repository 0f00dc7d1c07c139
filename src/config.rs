//! Client-wide configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 250;

/// Settings the client core reads at runtime. Defaults match the stock
/// web client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the server, e.g. `http://media.local:8080`
    pub server_url: String,
    /// Prefix for streamed files and cover images, relative to the page
    pub share_uri: String,
    /// File extensions (lowercase, no dot) the player can play
    pub player_filetypes: Vec<String>,
    /// Interval between liveness checks, in milliseconds
    pub status_interval_ms: u64,
    /// Interval between online-user refreshes, in milliseconds
    pub online_users_interval_ms: u64,
    pub load_batch_size: usize,
    pub save_batch_size: usize,
    pub grid_buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            share_uri: "share/".to_string(),
            player_filetypes: vec!["mp3".to_string()],
            status_interval_ms: 10_000,
            online_users_interval_ms: 10_000,
            load_batch_size: DEFAULT_BATCH_SIZE,
            save_batch_size: DEFAULT_BATCH_SIZE,
            grid_buffer_size: 99_999,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.load_batch_size == 0 || self.save_batch_size == 0 {
            return Err(Error::InvalidInput(
                "batch sizes must be greater than zero".to_string(),
            ));
        }
        if self.player_filetypes.is_empty() {
            return Err(Error::InvalidInput(
                "at least one player file type is required".to_string(),
            ));
        }
        if self.status_interval_ms == 0 || self.online_users_interval_ms == 0 {
            return Err(Error::InvalidInput(
                "poll intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `file_name` has an extension the player accepts.
    pub fn is_playable(&self, file_name: &str) -> bool {
        let extension = crate::utils::file_extension(file_name).to_ascii_lowercase();
        self.player_filetypes
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(&extension))
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn online_users_interval(&self) -> Duration {
        Duration::from_millis(self.online_users_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ClientConfig::from_json(r#"{"server_url":"http://nas:8080","save_batch_size":100}"#)
                .unwrap();
        assert_eq!(config.server_url, "http://nas:8080");
        assert_eq!(config.save_batch_size, 100);
        assert_eq!(config.load_batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.share_uri, "share/");
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let result = ClientConfig::from_json(r#"{"load_batch_size":0}"#);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn playable_check_ignores_case() {
        let config = ClientConfig::default();
        assert!(config.is_playable("Track01.MP3"));
        assert!(!config.is_playable("cover.jpg"));
        assert!(!config.is_playable("README"));
    }
}
