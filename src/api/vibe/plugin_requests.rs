// Last.fm relay, cover art and online-user endpoints used by the plugins.
impl VibeClient {
    pub async fn lastfm_handshake(&self, username: &str, password: &str) -> Result<StatusReply> {
        let params = [
            ("username", username.to_string()),
            ("password", password.to_string()),
        ];
        self.post_json(LASTFM_HANDSHAKE_PATH, &params).await
    }

    pub async fn lastfm_now_playing(&self, share_id: &str, hash: &str) -> Result<StatusReply> {
        let params = [("shareId", share_id.to_string()), ("hash", hash.to_string())];
        self.post_json(LASTFM_NOW_PLAYING_PATH, &params).await
    }

    pub async fn lastfm_submission(
        &self,
        share_id: &str,
        hash: &str,
        started_at: i64,
    ) -> Result<StatusReply> {
        let params = [
            ("shareId", share_id.to_string()),
            ("hash", hash.to_string()),
            ("i", started_at.to_string()),
        ];
        self.post_json(LASTFM_SUBMISSION_PATH, &params).await
    }

    pub async fn get_cover(&self, share_id: &str, hash: &str) -> Result<CoverLookup> {
        let params = [("shareId", share_id.to_string()), ("hash", hash.to_string())];
        self.post_json(COVER_LOOKUP_PATH, &params).await
    }

    pub async fn get_online_users(&self) -> Result<Vec<OnlineUser>> {
        self.post_json(ONLINE_USERS_PATH, &[]).await
    }
}

fn require_ok(what: &str, reply: StatusReply) -> Result<()> {
    if reply.is_ok() {
        Ok(())
    } else {
        Err(Error::server(format!("{what} answered status {:?}", reply.status)))
    }
}

impl ScrobbleBackend for VibeClient {
    async fn handshake(&self, username: &str, password: &str) -> Result<bool> {
        match self.lastfm_handshake(username, password).await {
            Ok(reply) => Ok(reply.is_ok()),
            Err(Error::Server(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn now_playing(&self, track: &Track) -> Result<()> {
        let reply = self.lastfm_now_playing(&track.share_id, &track.hash).await?;
        require_ok("now playing", reply)
    }

    async fn submit(&self, track: &Track, started_at: i64) -> Result<()> {
        let reply = self
            .lastfm_submission(&track.share_id, &track.hash, started_at)
            .await?;
        require_ok("submission", reply)
    }
}

impl CoverBackend for VibeClient {
    async fn lookup_cover(&self, track: &Track) -> Result<Option<String>> {
        let lookup = self.get_cover(&track.share_id, &track.hash).await?;
        Ok(lookup.hash.filter(|hash| !hash.trim().is_empty()))
    }

    fn embedded_cover_url(&self, track: &Track) -> String {
        format!(
            "{}?shareId={}&hash={}",
            self.build_url(COVER_EMBEDDED_PATH),
            urlencoding::encode(&track.share_id),
            urlencoding::encode(&track.hash)
        )
    }
}

impl StatusBackend for VibeClient {
    async fn check_status(&self) -> Result<()> {
        self.get_status().await.map(|_| ())
    }

    async fn online_users(&self) -> Result<Vec<OnlineUser>> {
        self.get_online_users().await
    }
}
