use anyhow::Result;
use tracing::{debug, warn};

use crate::storage::{kv::KeyValueStore, EPICS_KEY};

use super::{
    entities::{parse_epic_input, EpicEntity},
    error::TrackerError,
};

/// Owns the list of known epics and persists it as one JSON array under the
/// `epics` key. Every mutation writes the whole list back before returning;
/// a storage failure does not roll the in-memory list back.
pub struct EpicStore<S> {
    storage: S,
    epics: Vec<EpicEntity>,
}

impl<S: KeyValueStore> EpicStore<S> {
    /// Restores the epic list. Absent or corrupted data starts an empty list
    /// instead of propagating a parse fault to the user.
    pub async fn load(storage: S) -> Result<Self> {
        let epics = match storage.get(EPICS_KEY).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(epics) => epics,
                Err(e) => {
                    warn!("Persisted epic list is corrupted, starting empty: {e}");
                    vec![]
                }
            },
            None => vec![],
        };
        Ok(Self { storage, epics })
    }

    pub fn epics(&self) -> &[EpicEntity] {
        &self.epics
    }

    pub fn find(&self, name: &str) -> Option<&EpicEntity> {
        self.epics.iter().find(|epic| epic.name == name)
    }

    /// Parses `raw_input` into a new epic and appends it.
    pub async fn add(&mut self, raw_input: &str) -> Result<()> {
        let (name, description) = parse_epic_input(raw_input);
        if name.is_empty() {
            return Err(TrackerError::EmptyName.into());
        }
        if self.find(&name).is_some() {
            return Err(TrackerError::DuplicateName(name).into());
        }

        debug!("Adding epic {name}");
        self.epics.push(EpicEntity::new(name, description));
        self.persist().await
    }

    /// Re-parses `raw_input` and replaces the description of the matching
    /// epic. The name part of the input is ignored, name is identity. Returns
    /// whether anything changed.
    pub async fn update(&mut self, name: &str, raw_input: &str) -> Result<bool> {
        let (_, description) = parse_epic_input(raw_input);
        let Some(epic) = self.epics.iter_mut().find(|epic| epic.name == name) else {
            return Ok(false);
        };
        epic.description = description;
        self.persist().await?;
        Ok(true)
    }

    /// Removes the matching epic. Returns whether anything changed.
    pub async fn delete(&mut self, name: &str) -> Result<bool> {
        let count_before = self.epics.len();
        self.epics.retain(|epic| epic.name != name);
        if self.epics.len() == count_before {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    /// Stamps the epic with the moment work started on it. A missing epic is
    /// ignored: a session may reference an epic that was deleted.
    pub async fn touch(&mut self, name: &str, moment_millis: i64) -> Result<()> {
        let Some(epic) = self.epics.iter_mut().find(|epic| epic.name == name) else {
            return Ok(());
        };
        epic.last_used = Some(moment_millis);
        self.persist().await
    }

    async fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.epics)?;
        self.storage.set(EPICS_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        storage::{
            kv::{FileKvStore, KeyValueStore},
            EPICS_KEY,
        },
        tracker::error::TrackerError,
    };

    use super::EpicStore;

    fn store_in(dir: &std::path::Path) -> FileKvStore {
        FileKvStore::new(dir.to_owned()).unwrap()
    }

    #[tokio::test]
    async fn test_add_without_slash() -> Result<()> {
        let dir = tempdir()?;
        let mut epics = EpicStore::load(store_in(dir.path())).await?;

        epics.add("  Alpha  ").await?;

        assert_eq!(epics.epics().len(), 1);
        assert_eq!(epics.epics()[0].name, "Alpha");
        assert_eq!(epics.epics()[0].description, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_with_description() -> Result<()> {
        let dir = tempdir()?;
        let mut epics = EpicStore::load(store_in(dir.path())).await?;

        epics.add("Alpha / write docs / part 1").await?;

        assert_eq!(epics.epics()[0].name, "Alpha");
        assert_eq!(epics.epics()[0].description, "write docs / part 1");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_duplicate_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let mut epics = EpicStore::load(store_in(dir.path())).await?;
        epics.add("Alpha / write docs").await?;

        let error = epics.add("Alpha / other").await.unwrap_err();

        assert_eq!(
            error.downcast_ref::<TrackerError>(),
            Some(&TrackerError::DuplicateName("Alpha".to_owned()))
        );
        assert_eq!(epics.epics().len(), 1);
        assert_eq!(epics.epics()[0].description, "write docs");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_empty_name_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let mut epics = EpicStore::load(store_in(dir.path())).await?;

        let error = epics.add("   / description only").await.unwrap_err();

        assert_eq!(
            error.downcast_ref::<TrackerError>(),
            Some(&TrackerError::EmptyName)
        );
        assert!(epics.epics().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_epics_survive_reload() -> Result<()> {
        let dir = tempdir()?;
        {
            let mut epics = EpicStore::load(store_in(dir.path())).await?;
            epics.add("Alpha / write docs").await?;
            epics.add("Beta").await?;
        }

        let epics = EpicStore::load(store_in(dir.path())).await?;

        assert_eq!(epics.epics().len(), 2);
        assert_eq!(epics.epics()[0].name, "Alpha");
        assert_eq!(epics.epics()[1].name, "Beta");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_description_only() -> Result<()> {
        let dir = tempdir()?;
        let mut epics = EpicStore::load(store_in(dir.path())).await?;
        epics.add("Alpha / write docs").await?;

        let changed = epics.update("Alpha", "Renamed / review docs").await?;

        assert!(changed);
        assert_eq!(epics.epics()[0].name, "Alpha");
        assert_eq!(epics.epics()[0].description, "review docs");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_is_noop() -> Result<()> {
        let dir = tempdir()?;
        let mut epics = EpicStore::load(store_in(dir.path())).await?;

        assert!(!epics.update("Alpha", "whatever").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete() -> Result<()> {
        let dir = tempdir()?;
        let mut epics = EpicStore::load(store_in(dir.path())).await?;
        epics.add("Alpha").await?;
        epics.add("Beta").await?;

        assert!(epics.delete("Alpha").await?);
        assert!(!epics.delete("Alpha").await?);
        assert_eq!(epics.epics().len(), 1);
        assert_eq!(epics.epics()[0].name, "Beta");
        Ok(())
    }

    #[tokio::test]
    async fn test_touch_sets_last_used() -> Result<()> {
        let dir = tempdir()?;
        let mut epics = EpicStore::load(store_in(dir.path())).await?;
        epics.add("Alpha").await?;

        epics.touch("Alpha", 1000).await?;
        // Touching a deleted epic is fine.
        epics.touch("Gone", 1000).await?;

        assert_eq!(epics.epics()[0].last_used, Some(1000));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupted_list_starts_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = store_in(dir.path());
        store.set(EPICS_KEY, "not json {").await?;

        let epics = EpicStore::load(store).await?;

        assert!(epics.epics().is_empty());
        Ok(())
    }
}
