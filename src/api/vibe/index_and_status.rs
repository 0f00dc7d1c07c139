// Session, liveness and index browsing endpoints.
impl VibeClient {
    pub async fn get_session(&self) -> Result<Session> {
        self.post_json(SESSION_PATH, &[]).await
    }

    /// Any non-null answer means the server is reachable.
    pub async fn get_status(&self) -> Result<serde_json::Value> {
        self.post_json(STATUS_PATH, &[]).await
    }

    /// List a share directory. `hash == None` lists the share root.
    pub async fn get_index_files(
        &self,
        share_id: &str,
        hash: Option<&str>,
        include_files: bool,
    ) -> Result<Vec<IndexEntry>> {
        let mut params = vec![
            ("shareId", share_id.to_string()),
            ("directories", "true".to_string()),
        ];
        if include_files {
            params.push(("files", "true".to_string()));
        }
        if let Some(hash) = hash {
            params.push(("hash", hash.to_string()));
        }
        self.post_json(INDEX_FILES_PATH, &params).await
    }

    pub async fn search_index_files(&self, expression: &str) -> Result<Vec<IndexEntry>> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("empty search expression".to_string()));
        }
        let params = [
            ("directories", "true".to_string()),
            ("files", "true".to_string()),
            ("expression", trimmed.to_string()),
        ];
        self.post_json(INDEX_SEARCH_PATH, &params).await
    }

    pub async fn get_index_items(&self, refs: &[String]) -> Result<Vec<Track>> {
        let entries: Vec<IndexEntry> = self
            .post_json(INDEX_ITEMS_PATH, &[("hashes", join_hashes(refs))])
            .await?;
        Ok(entries.into_iter().map(Track::from).collect())
    }
}

impl IndexBackend for VibeClient {
    async fn resolve_items_by_reference(&self, refs: &[String]) -> Result<Vec<Track>> {
        self.get_index_items(refs).await
    }

    async fn list_directory(&self, share_id: &str, hash: &str) -> Result<Vec<IndexEntry>> {
        self.get_index_files(share_id, Some(hash), true).await
    }
}
