use crate::api::backend::StatusBackend;
use crate::api::models::OnlineUser;
use crate::utils::sleep;
use futures_util::future::{select, Either};
use std::pin::pin;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Fetch the current online users. A failed request shows nobody.
pub async fn refresh<B: StatusBackend>(backend: &B) -> Vec<OnlineUser> {
    match backend.online_users().await {
        Ok(users) => users,
        Err(err) => {
            debug!("online users unavailable: {err}");
            Vec::new()
        }
    }
}

/// Refresh immediately, then every `interval` until `cancel` fires.
pub async fn poll<B: StatusBackend>(
    backend: &B,
    interval: Duration,
    cancel: &CancellationToken,
    mut on_update: impl FnMut(Vec<OnlineUser>),
) {
    loop {
        on_update(refresh(backend).await);

        let wait = pin!(sleep(interval));
        let cancelled = pin!(cancel.cancelled());
        if let Either::Right(_) = select(wait, cancelled).await {
            break;
        }
    }
}
