//! Persistence seam for per-session turn state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portrait_core::TurnState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Turn state plus bookkeeping, as written to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    pub state: TurnState,
    /// Eligible messages processed so far.
    #[serde(default)]
    pub turns: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredState {
    #[must_use]
    pub fn new(state: TurnState) -> Self {
        let now = Utc::now();
        Self {
            state,
            turns: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record one more processed turn.
    pub fn advance(&mut self, state: TurnState) {
        self.state = state;
        self.turns += 1;
        self.updated_at = Utc::now();
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, id: &Uuid) -> anyhow::Result<Option<StoredState>>;
    async fn save(&self, id: &Uuid, stored: &StoredState) -> anyhow::Result<()>;
    async fn clear(&self, id: &Uuid) -> anyhow::Result<bool>;
    async fn list(&self) -> anyhow::Result<Vec<Uuid>>;
}

#[async_trait]
impl<S: StateStore + ?Sized> StateStore for std::sync::Arc<S> {
    async fn load(&self, id: &Uuid) -> anyhow::Result<Option<StoredState>> {
        (**self).load(id).await
    }

    async fn save(&self, id: &Uuid, stored: &StoredState) -> anyhow::Result<()> {
        (**self).save(id, stored).await
    }

    async fn clear(&self, id: &Uuid) -> anyhow::Result<bool> {
        (**self).clear(id).await
    }

    async fn list(&self) -> anyhow::Result<Vec<Uuid>> {
        (**self).list().await
    }
}

/// Process-local store, mostly for hosts that persist elsewhere and tests.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    sessions: RwLock<HashMap<Uuid, StoredState>>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, id: &Uuid) -> anyhow::Result<Option<StoredState>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, id: &Uuid, stored: &StoredState) -> anyhow::Result<()> {
        self.sessions.write().await.insert(*id, stored.clone());
        Ok(())
    }

    async fn clear(&self, id: &Uuid) -> anyhow::Result<bool> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn list(&self) -> anyhow::Result<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self.sessions.read().await.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

/// One `<session-id>.json` file per session under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    dir: PathBuf,
}

impl JsonFileStateStore {
    pub async fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        info!("State directory: {}", dir.display());
        Ok(Self { dir })
    }

    fn path_for(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn load(&self, id: &Uuid) -> anyhow::Result<Option<StoredState>> {
        let path = self.path_for(id);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let stored = serde_json::from_str(&content).map_err(|e| {
                    anyhow::anyhow!("Corrupt state file {}: {e}", path.display())
                })?;
                Ok(Some(stored))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, id: &Uuid, stored: &StoredState) -> anyhow::Result<()> {
        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(stored)?;

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("Saved session state: {}", path.display());
        Ok(())
    }

    async fn clear(&self, id: &Uuid) -> anyhow::Result<bool> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => {
                info!("Cleared session: {id}");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> anyhow::Result<Vec<Uuid>> {
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Uuid::parse_str(s).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portrait_core::Entity;

    fn sample_state() -> TurnState {
        TurnState {
            last_speakers: vec![Entity::new("Blair", "b.png")],
            balance_value: Some(12.5),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trip() -> anyhow::Result<()> {
        let store = MemoryStateStore::new();
        let id = Uuid::now_v7();

        assert!(store.load(&id).await?.is_none());

        let stored = StoredState::new(sample_state());
        store.save(&id, &stored).await?;
        assert_eq!(store.load(&id).await?, Some(stored));
        assert_eq!(store.list().await?, vec![id]);

        assert!(store.clear(&id).await?);
        assert!(!store.clear(&id).await?);
        assert!(store.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn file_store_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStateStore::new(dir.path().join("state")).await?;
        let id = Uuid::now_v7();

        assert!(store.load(&id).await?.is_none());

        let mut stored = StoredState::new(TurnState::default());
        stored.advance(sample_state());
        store.save(&id, &stored).await?;

        let loaded = store.load(&id).await?;
        assert_eq!(loaded.as_ref().map(|s| s.turns), Some(1));
        assert_eq!(loaded.map(|s| s.state), Some(sample_state()));
        assert_eq!(store.list().await?, vec![id]);

        assert!(store.clear(&id).await?);
        assert!(store.load(&id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn file_store_ignores_foreign_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStateStore::new(dir.path()).await?;
        tokio::fs::write(dir.path().join("notes.txt"), "hello").await?;
        tokio::fs::write(dir.path().join("not-a-uuid.json"), "{}").await?;

        assert!(store.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStateStore::new(dir.path()).await?;
        let id = Uuid::now_v7();
        tokio::fs::write(dir.path().join(format!("{id}.json")), "{").await?;

        assert!(store.load(&id).await.is_err());
        Ok(())
    }
}
