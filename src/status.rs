//! Server liveness tracking.

use crate::api::backend::StatusBackend;
use crate::error::Result;
use crate::utils::sleep;
use futures_util::future::{select, Either};
use std::pin::pin;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Restored,
    Lost,
}

/// Remembers whether the server answered the last status poll and reports
/// only the flips.
#[derive(Debug)]
pub struct ConnectionMonitor {
    connected: bool,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self { connected: true }
    }
}

impl ConnectionMonitor {
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn observe(&mut self, poll: &Result<()>) -> Option<StatusChange> {
        match (poll.is_ok(), self.connected) {
            (true, false) => {
                self.connected = true;
                info!("connection restored");
                Some(StatusChange::Restored)
            }
            (false, true) => {
                self.connected = false;
                if let Err(err) = poll {
                    warn!("connection lost: {err}");
                }
                Some(StatusChange::Lost)
            }
            _ => None,
        }
    }

    /// Poll `backend` every `interval` until `cancel` fires, passing each
    /// transition to `on_change`.
    pub async fn run<B: StatusBackend>(
        &mut self,
        backend: &B,
        interval: Duration,
        cancel: &CancellationToken,
        mut on_change: impl FnMut(StatusChange),
    ) {
        while !cancel.is_cancelled() {
            let wait = pin!(sleep(interval));
            let cancelled = pin!(cancel.cancelled());
            if let Either::Right(_) = select(wait, cancelled).await {
                break;
            }

            let poll = backend.check_status().await;
            if let Some(change) = self.observe(&poll) {
                on_change(change);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::OnlineUser;
    use crate::error::Error;
    use std::cell::RefCell;

    struct ScriptedStatus {
        replies: RefCell<Vec<bool>>,
        cancel: CancellationToken,
    }

    impl StatusBackend for ScriptedStatus {
        async fn check_status(&self) -> Result<()> {
            let mut replies = self.replies.borrow_mut();
            let up = if replies.is_empty() { true } else { replies.remove(0) };
            if replies.is_empty() {
                self.cancel.cancel();
            }
            if up {
                Ok(())
            } else {
                Err(Error::server("no answer"))
            }
        }

        async fn online_users(&self) -> Result<Vec<OnlineUser>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn only_transitions_are_reported() {
        let mut monitor = ConnectionMonitor::default();
        assert_eq!(monitor.observe(&Ok(())), None);
        assert_eq!(
            monitor.observe(&Err(Error::server("down"))),
            Some(StatusChange::Lost)
        );
        assert_eq!(monitor.observe(&Err(Error::server("down"))), None);
        assert!(!monitor.is_connected());
        assert_eq!(monitor.observe(&Ok(())), Some(StatusChange::Restored));
    }

    #[tokio::test]
    async fn polling_loop_reports_changes_until_cancelled() {
        let cancel = CancellationToken::new();
        let backend = ScriptedStatus {
            replies: RefCell::new(vec![true, false, false, true]),
            cancel: cancel.clone(),
        };
        let mut changes = Vec::new();
        let mut monitor = ConnectionMonitor::default();

        monitor
            .run(&backend, Duration::from_millis(1), &cancel, |change| {
                changes.push(change)
            })
            .await;

        assert_eq!(changes, vec![StatusChange::Lost, StatusChange::Restored]);
    }
}
