use crate::api::models::{ServerConfig, Track};
use crate::error::Result;
use crate::playback::queue::PlaylistQueue;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{errors::StorageError, LocalStorage, Storage};

#[cfg(not(target_arch = "wasm32"))]
const SETTINGS_KEY: &str = "client_settings";
#[cfg(not(target_arch = "wasm32"))]
const QUEUE_KEY: &str = "queue_snapshot";

#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "vibe.client_settings";
#[cfg(target_arch = "wasm32")]
const QUEUE_KEY: &str = "vibe.queue_snapshot";

/// Preferences kept between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClientSettings {
    #[serde(default)]
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub shuffle_enabled: bool,
    #[serde(default)]
    pub repeat_enabled: bool,
    #[serde(default)]
    pub last_playlist_id: Option<String>,
    #[serde(default)]
    pub lastfm_username: Option<String>,
}

/// Queue contents by hash, for restoring the queue on the next start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueueSnapshot {
    pub hashes: Vec<String>,
    pub current: Option<String>,
}

impl QueueSnapshot {
    pub fn capture(queue: &PlaylistQueue, current: Option<&Track>) -> Self {
        Self {
            hashes: queue.refs(),
            current: current.map(|track| track.hash.clone()),
        }
    }
}

/// SQLite-backed key/value store on native targets.
#[cfg(not(target_arch = "wasm32"))]
pub struct Store {
    conn: rusqlite::Connection,
}

#[cfg(not(target_arch = "wasm32"))]
impl Store {
    /// Open the store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("vibe-client");
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| crate::error::Error::storage(format!("Failed to create {}: {e}", data_dir.display())))?;
        Self::open(data_dir.join("vibe-client.db"))
    }

    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::initialize(rusqlite::Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(rusqlite::Connection::open_in_memory()?)
    }

    fn initialize(conn: rusqlite::Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            [key, json.as_str()],
        )?;
        debug!(key, "stored");
        Ok(())
    }

    fn get<T: for<'de> Deserialize<'de> + Default>(&self, key: &str) -> Result<T> {
        use rusqlite::OptionalExtension;

        let json: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(T::default()),
        }
    }
}

/// Browser `localStorage` store on wasm.
#[cfg(target_arch = "wasm32")]
pub struct Store;

#[cfg(target_arch = "wasm32")]
impl Store {
    pub fn open_default() -> Result<Self> {
        Ok(Self)
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        LocalStorage::set(key, value)
            .map_err(|e| crate::error::Error::storage(e.to_string()))?;
        debug!(key, "stored");
        Ok(())
    }

    fn get<T: for<'de> Deserialize<'de> + Default>(&self, key: &str) -> Result<T> {
        match LocalStorage::get(key) {
            Ok(value) => Ok(value),
            Err(StorageError::KeyNotFound(_)) => Ok(T::default()),
            Err(e) => Err(crate::error::Error::storage(e.to_string())),
        }
    }
}

impl Store {
    pub fn save_settings(&self, settings: &ClientSettings) -> Result<()> {
        self.put(SETTINGS_KEY, settings)
    }

    /// Stored settings, or defaults when nothing was saved yet.
    pub fn load_settings(&self) -> Result<ClientSettings> {
        self.get(SETTINGS_KEY)
    }

    pub fn save_queue_snapshot(&self, snapshot: &QueueSnapshot) -> Result<()> {
        self.put(QUEUE_KEY, snapshot)
    }

    pub fn load_queue_snapshot(&self) -> Result<QueueSnapshot> {
        self.get(QUEUE_KEY)
    }
}
