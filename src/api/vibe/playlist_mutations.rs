// Saved playlist read/write endpoints.
impl VibeClient {
    pub async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        self.post_json(PLAYLISTS_PATH, &[]).await
    }

    pub async fn get_playlist_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>> {
        self.post_json(PLAYLIST_ITEMS_PATH, &[("playlistId", playlist_id.to_string())])
            .await
    }

    pub async fn save_playlist_items(
        &self,
        playlist_id: &str,
        hashes: &[String],
        clear: bool,
    ) -> Result<()> {
        let params = [
            ("playlistId", playlist_id.to_string()),
            ("clear", clear.to_string()),
            ("hashes", join_hashes(hashes)),
        ];
        let reply: serde_json::Value = self.post_json(SAVE_PLAYLIST_ITEMS_PATH, &params).await?;
        if reply == serde_json::Value::Bool(false) {
            return Err(Error::server(format!(
                "playlist {playlist_id} rejected {} items",
                hashes.len()
            )));
        }
        Ok(())
    }

    pub async fn create_named_playlist(&self, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("playlist name is required".to_string()));
        }
        let playlists: Vec<Playlist> = self
            .post_json(CREATE_PLAYLIST_PATH, &[("name", name.to_string())])
            .await?;
        first_playlist(CREATE_PLAYLIST_PATH, playlists)
    }

    pub async fn update_playlist(&self, playlist_id: &str, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("playlist name is required".to_string()));
        }
        let params = [
            ("playlistId", playlist_id.to_string()),
            ("name", name.to_string()),
        ];
        let playlists: Vec<Playlist> = self.post_json(UPDATE_PLAYLIST_PATH, &params).await?;
        first_playlist(UPDATE_PLAYLIST_PATH, playlists)
    }

    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<bool> {
        self.post_json(REMOVE_PLAYLIST_PATH, &[("playlistId", playlist_id.to_string())])
            .await
    }
}

impl PlaylistBackend for VibeClient {
    async fn fetch_playlist_item_refs(&self, playlist_id: &str) -> Result<Vec<String>> {
        let items = self.get_playlist_items(playlist_id).await?;
        Ok(items.into_iter().map(|item| item.hash).collect())
    }

    async fn push_playlist_items(
        &self,
        playlist_id: &str,
        refs: &[String],
        clear: bool,
    ) -> Result<()> {
        self.save_playlist_items(playlist_id, refs, clear).await
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        self.get_playlists().await
    }

    async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        self.create_named_playlist(name).await
    }

    async fn rename_playlist(&self, playlist_id: &str, name: &str) -> Result<Playlist> {
        self.update_playlist(playlist_id, name).await
    }

    async fn remove_playlist(&self, playlist_id: &str) -> Result<bool> {
        self.delete_playlist(playlist_id).await
    }
}
