//! Core state of the tracker: the epic list, the single in-progress work
//! session, and the operations the panel dispatches into them.

use anyhow::Result;

use crate::{
    calendar::build_event_url,
    storage::kv::KeyValueStore,
    utils::clock::Clock,
};

use self::{
    epics::EpicStore,
    error::TrackerError,
    session::{DiscardConfirmation, SessionTracker, StartOutcome},
};

pub mod entities;
pub mod epics;
pub mod error;
pub mod filter;
pub mod migrate;
pub mod session;

/// What came out of a finished session.
#[derive(Debug, PartialEq, Eq)]
pub struct WorkRecord {
    pub epic_name: String,
    /// Milliseconds since epoch.
    pub started_at: i64,
    pub duration_minutes: i64,
    pub calendar_url: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FinishOutcome {
    Recorded(WorkRecord),
    /// The session was abandoned without recording anything.
    Discarded,
    /// There was nothing in progress to begin with.
    Idle,
}

/// Wires the epic list and the session state machine together and exposes the
/// operations the presentation layer calls.
pub struct Tracker<S> {
    pub epics: EpicStore<S>,
    pub session: SessionTracker<S>,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore + Clone> Tracker<S> {
    pub async fn load(storage: S, clock: Box<dyn Clock>) -> Result<Self> {
        let epics = EpicStore::load(storage.clone()).await?;
        let session = SessionTracker::load(storage).await?;
        Ok(Self {
            epics,
            session,
            clock,
        })
    }
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn active_epic_name(&self) -> Option<&str> {
        self.session.active().map(|session| session.epic_name.as_str())
    }

    /// Minutes elapsed on the ongoing session, if there is one with a start
    /// timestamp.
    pub fn elapsed_minutes(&self) -> Option<i64> {
        let started_at = self.session.active()?.started_at?;
        Some((self.clock.epoch_millis() - started_at) / 60_000)
    }

    /// Starts work on `epic_name`. A session on another epic has to be
    /// discarded first, which goes through `confirmation`. A successful start
    /// also stamps the epic's last-used time.
    pub async fn start_work(
        &mut self,
        epic_name: &str,
        confirmation: &dyn DiscardConfirmation,
    ) -> Result<StartOutcome> {
        let now_millis = self.clock.epoch_millis();
        let outcome = self.session.start(epic_name, now_millis, confirmation).await?;
        if outcome == StartOutcome::Started {
            self.epics.touch(epic_name, now_millis).await?;
        }
        Ok(outcome)
    }

    /// Ends the ongoing session. With `commit` the elapsed time and the
    /// calendar link are computed from the session before it is cleared;
    /// without it the session is simply thrown away.
    ///
    /// A committed session without a start timestamp fails with
    /// [TrackerError::MissingStartTimestamp] but is still cleared, so the
    /// tracker never gets stuck on a session it cannot record.
    pub async fn finish_work(&mut self, commit: bool, template_url: &str) -> Result<FinishOutcome> {
        let Some(session) = self.session.stop().await? else {
            return Ok(FinishOutcome::Idle);
        };
        if !commit {
            return Ok(FinishOutcome::Discarded);
        }
        let Some(started_at) = session.started_at else {
            return Err(TrackerError::MissingStartTimestamp.into());
        };

        let now_millis = self.clock.epoch_millis();
        Ok(FinishOutcome::Recorded(WorkRecord {
            duration_minutes: (now_millis - started_at) / 60_000,
            calendar_url: build_event_url(&session.epic_name, started_at, now_millis, template_url),
            started_at,
            epic_name: session.epic_name,
        }))
    }
}
