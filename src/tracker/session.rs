use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::storage::{kv::KeyValueStore, SESSION_KEY};

use super::entities::SessionEntity;

/// Capability supplied by the presentation layer for the destructive
/// "discard ongoing work?" prompt. Starting an epic while another one is
/// active suspends on this exactly once; a dismissed prompt cancels the
/// transition without any state change.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscardConfirmation {
    async fn confirm_discard(&self) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session is running.
    Started,
    /// The requested epic was already the active one, nothing changed.
    AlreadyActive,
    /// The user kept the ongoing work, nothing changed.
    Cancelled,
}

/// Owns the single in-progress session. The state machine has two states,
/// idle and active; every transition persists the `session` key immediately,
/// with the key removed entirely while idle.
pub struct SessionTracker<S> {
    storage: S,
    active: Option<SessionEntity>,
}

impl<S: KeyValueStore> SessionTracker<S> {
    /// Restores the session slice. Absent or corrupted data means idle.
    pub async fn load(storage: S) -> Result<Self> {
        let active = match storage.get(SESSION_KEY).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("Persisted session is corrupted, treating as idle: {e}");
                    None
                }
            },
            None => None,
        };
        Ok(Self { storage, active })
    }

    pub fn active(&self) -> Option<&SessionEntity> {
        self.active.as_ref()
    }

    /// Starts working on `epic_name` at `now_millis`. When a different epic
    /// is already active the transition first awaits `confirmation`; the old
    /// session is discarded only on a confirmed prompt.
    pub async fn start(
        &mut self,
        epic_name: &str,
        now_millis: i64,
        confirmation: &dyn DiscardConfirmation,
    ) -> Result<StartOutcome> {
        if let Some(session) = &self.active {
            if session.epic_name == epic_name {
                return Ok(StartOutcome::AlreadyActive);
            }
            if !confirmation.confirm_discard().await? {
                return Ok(StartOutcome::Cancelled);
            }
            debug!("Discarding session on {}", session.epic_name);
        }

        self.active = Some(SessionEntity {
            epic_name: epic_name.to_owned(),
            started_at: Some(now_millis),
        });
        self.persist().await?;
        Ok(StartOutcome::Started)
    }

    /// Clears the session and hands the previous one back. Whether the
    /// elapsed time gets recorded is the caller's business; stop itself does
    /// no calendar logic.
    pub async fn stop(&mut self) -> Result<Option<SessionEntity>> {
        let previous = self.active.take();
        if previous.is_some() {
            self.persist().await?;
        }
        Ok(previous)
    }

    async fn persist(&self) -> Result<()> {
        match &self.active {
            Some(session) => {
                let raw = serde_json::to_string(session)?;
                self.storage.set(SESSION_KEY, &raw).await
            }
            None => self.storage.remove(SESSION_KEY).await,
        }
    }
}
