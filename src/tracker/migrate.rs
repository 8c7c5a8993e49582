use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

use crate::storage::{kv::KeyValueStore, EPICS_KEY, SCHEMA_KEY, SESSION_KEY};

use super::entities::{EpicEntity, SessionEntity};

/// Name of the flat snapshot file written by schema v1.
pub const LEGACY_STATE_FILE: &str = "state.json";

pub const SCHEMA_VERSION: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStatus {
    /// Not yet determined, nothing should read through the store.
    Unknown,
    /// Legacy data is on disk and must be rewritten first.
    Needed,
    Complete,
}

/// Flat snapshot layout of schema v1, with the original field names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyState {
    #[serde(default)]
    epics: Vec<LegacyEpic>,
    #[serde(default)]
    current_epic: Option<LegacySession>,
}

#[derive(Debug, Deserialize)]
struct LegacyEpic {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySession {
    name: String,
    #[serde(default)]
    work_started_timestamp: Option<i64>,
}

/// One-time upgrade from the flat v1 snapshot to the keyed layout. Runs at
/// startup before anything else touches the store.
///
/// The schema marker is written only after the new layout is fully in place,
/// and the legacy file is removed last. An interrupted run therefore leaves
/// the legacy file behind and the next startup retries the whole rewrite.
pub struct SchemaMigrator<S> {
    storage: S,
    legacy_path: PathBuf,
    status: MigrationStatus,
}

impl<S: KeyValueStore> SchemaMigrator<S> {
    pub fn new(storage: S, application_dir: PathBuf) -> Self {
        Self {
            storage,
            legacy_path: application_dir.join(LEGACY_STATE_FILE),
            status: MigrationStatus::Unknown,
        }
    }

    pub fn status(&self) -> MigrationStatus {
        self.status
    }

    /// Determines which layout is on disk without changing anything.
    pub async fn check(&mut self) -> Result<MigrationStatus> {
        self.status = if self.storage.get(SCHEMA_KEY).await?.is_some() {
            MigrationStatus::Complete
        } else if tokio::fs::try_exists(&self.legacy_path).await? {
            MigrationStatus::Needed
        } else {
            // Fresh directory, there is nothing to carry over.
            MigrationStatus::Complete
        };
        Ok(self.status)
    }

    /// Drives the migration to completion. Idempotent: without legacy data
    /// this only stamps the schema marker.
    pub async fn run(&mut self) -> Result<MigrationStatus> {
        if self.check().await? == MigrationStatus::Complete {
            if self.storage.get(SCHEMA_KEY).await?.is_none() {
                self.storage
                    .set(SCHEMA_KEY, &SCHEMA_VERSION.to_string())
                    .await?;
            }
            return Ok(self.status);
        }

        info!("Migrating legacy state from {:?}", self.legacy_path);
        let raw = tokio::fs::read_to_string(&self.legacy_path).await?;
        let legacy = match serde_json::from_str::<LegacyState>(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!("Legacy state is corrupted, migrating as empty: {e}");
                LegacyState::default()
            }
        };

        let epics = legacy
            .epics
            .into_iter()
            .map(|epic| EpicEntity::new(epic.name, epic.description))
            .collect::<Vec<_>>();
        self.storage
            .set(EPICS_KEY, &serde_json::to_string(&epics)?)
            .await?;

        if let Some(session) = legacy.current_epic {
            let session = SessionEntity {
                epic_name: session.name,
                started_at: session.work_started_timestamp,
            };
            self.storage
                .set(SESSION_KEY, &serde_json::to_string(&session)?)
                .await?;
        }

        self.storage
            .set(SCHEMA_KEY, &SCHEMA_VERSION.to_string())
            .await?;
        // Only after the marker is in place the old snapshot can go.
        tokio::fs::remove_file(&self.legacy_path).await?;

        self.status = MigrationStatus::Complete;
        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        storage::{
            kv::{FileKvStore, KeyValueStore},
            SCHEMA_KEY, SESSION_KEY,
        },
        tracker::{epics::EpicStore, session::SessionTracker},
    };

    use super::{MigrationStatus, SchemaMigrator, LEGACY_STATE_FILE};

    fn store_in(dir: &std::path::Path) -> FileKvStore {
        FileKvStore::new(dir.join("kv")).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_directory_completes_immediately() -> Result<()> {
        let dir = tempdir()?;
        let mut migrator = SchemaMigrator::new(store_in(dir.path()), dir.path().to_owned());

        assert_eq!(migrator.status(), MigrationStatus::Unknown);
        assert_eq!(migrator.check().await?, MigrationStatus::Complete);
        assert_eq!(migrator.run().await?, MigrationStatus::Complete);
        assert!(store_in(dir.path()).get(SCHEMA_KEY).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_legacy_snapshot_is_rewritten() -> Result<()> {
        let dir = tempdir()?;
        let legacy = r#"{
            "epics": [
                { "name": "Alpha", "description": "write docs" },
                { "name": "Beta" }
            ],
            "currentEpic": { "name": "Alpha", "workStartedTimestamp": 1000 }
        }"#;
        std::fs::write(dir.path().join(LEGACY_STATE_FILE), legacy)?;

        let mut migrator = SchemaMigrator::new(store_in(dir.path()), dir.path().to_owned());
        assert_eq!(migrator.check().await?, MigrationStatus::Needed);
        assert_eq!(migrator.run().await?, MigrationStatus::Complete);

        let epics = EpicStore::load(store_in(dir.path())).await?;
        assert_eq!(epics.epics().len(), 2);
        assert_eq!(epics.epics()[0].name, "Alpha");
        assert_eq!(epics.epics()[0].description, "write docs");
        assert_eq!(epics.epics()[1].description, "");

        let session = SessionTracker::load(store_in(dir.path())).await?;
        assert_eq!(session.active().unwrap().epic_name, "Alpha");
        assert_eq!(session.active().unwrap().started_at, Some(1000));

        assert!(!dir.path().join(LEGACY_STATE_FILE).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_second_run_is_a_noop() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join(LEGACY_STATE_FILE),
            r#"{ "epics": [{ "name": "Alpha" }] }"#,
        )?;

        let mut migrator = SchemaMigrator::new(store_in(dir.path()), dir.path().to_owned());
        migrator.run().await?;

        let mut migrator = SchemaMigrator::new(store_in(dir.path()), dir.path().to_owned());
        assert_eq!(migrator.run().await?, MigrationStatus::Complete);

        let epics = EpicStore::load(store_in(dir.path())).await?;
        assert_eq!(epics.epics().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_legacy_without_session_leaves_store_idle() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join(LEGACY_STATE_FILE),
            r#"{ "epics": [{ "name": "Alpha" }] }"#,
        )?;

        let mut migrator = SchemaMigrator::new(store_in(dir.path()), dir.path().to_owned());
        migrator.run().await?;

        assert_eq!(store_in(dir.path()).get(SESSION_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupted_legacy_migrates_as_empty() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join(LEGACY_STATE_FILE), "not json at all")?;

        let mut migrator = SchemaMigrator::new(store_in(dir.path()), dir.path().to_owned());
        assert_eq!(migrator.run().await?, MigrationStatus::Complete);

        let epics = EpicStore::load(store_in(dir.path())).await?;
        assert!(epics.epics().is_empty());
        assert!(!dir.path().join(LEGACY_STATE_FILE).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_existing_marker_skips_legacy_file() -> Result<()> {
        let dir = tempdir()?;
        let store = store_in(dir.path());
        store.set(SCHEMA_KEY, "2").await?;
        // A stray legacy file must not overwrite current data once the
        // marker exists.
        std::fs::write(
            dir.path().join(LEGACY_STATE_FILE),
            r#"{ "epics": [{ "name": "Old" }] }"#,
        )?;
        store.set("epics", r#"[{"name":"Current"}]"#).await?;

        let mut migrator = SchemaMigrator::new(store_in(dir.path()), dir.path().to_owned());
        assert_eq!(migrator.run().await?, MigrationStatus::Complete);

        let epics = EpicStore::load(store_in(dir.path())).await?;
        assert_eq!(epics.epics()[0].name, "Current");
        Ok(())
    }
}
