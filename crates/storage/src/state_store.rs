//! Alert state persistence over an object store.

use std::sync::Arc;

use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use tracing::{debug, info};
use tripwire_rules::AlertState;

use crate::backend::StorageBackend;
use crate::error::StorageError;

/// Load and save the alert state document.
#[async_trait::async_trait]
pub trait StateStore: Send + Sync {
    /// Read the state. A missing document is an empty state.
    async fn load(&self) -> Result<AlertState, StorageError>;

    /// Replace the stored state.
    async fn save(&self, state: &AlertState) -> Result<(), StorageError>;

    /// Where the state lives, for logs.
    fn location(&self) -> String;
}

/// [`StateStore`] backed by a single JSON object in any `ObjectStore`.
pub struct ObjectStateStore {
    store: Arc<dyn ObjectStore>,
    path: ObjectPath,
    location: String,
}

impl ObjectStateStore {
    pub fn new(store: Arc<dyn ObjectStore>, key: &str) -> Self {
        let path = ObjectPath::from(key);
        Self {
            store,
            location: path.to_string(),
            path,
        }
    }

    /// Store the state under `key`, below the backend's prefix.
    pub fn from_backend(backend: &StorageBackend, key: &str) -> Self {
        let prefix = backend.prefix();
        let full_key = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", prefix, key)
        };
        let mut store = Self::new(backend.store_arc(), &full_key);
        store.location = backend.describe(key);
        store
    }
}

#[async_trait::async_trait]
impl StateStore for ObjectStateStore {
    async fn load(&self) -> Result<AlertState, StorageError> {
        let result = match self.store.get(&self.path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                info!(location = %self.location, "no alert state yet, starting empty");
                return Ok(AlertState::new());
            }
            Err(e) => return Err(e.into()),
        };
        let bytes = result.bytes().await?;
        let state: AlertState = serde_json::from_slice(&bytes)?;
        debug!(location = %self.location, entries = state.len(), "loaded alert state");
        Ok(state)
    }

    async fn save(&self, state: &AlertState) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(state)?;
        self.store
            .put(&self.path, PutPayload::from(Bytes::from(body)))
            .await?;
        info!(location = %self.location, entries = state.len(), "saved alert state");
        Ok(())
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use object_store::memory::InMemory;
    use tripwire_rules::{RuleType, TriggerKey};

    fn sample_state() -> AlertState {
        let mut state = AlertState::new();
        state.record(
            TriggerKey::new("Groceries", RuleType::GoalThreshold, "75%"),
            Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap(),
        );
        state
    }

    #[tokio::test]
    async fn missing_object_is_empty_state() {
        let store = ObjectStateStore::new(Arc::new(InMemory::new()), "state.json");
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = ObjectStateStore::new(Arc::new(InMemory::new()), "state.json");
        let state = sample_state();
        store.save(&state).await.unwrap();
        assert_eq!(store.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn stored_document_shape() {
        let memory = Arc::new(InMemory::new());
        let store = ObjectStateStore::new(memory.clone(), "prod/state.json");
        store.save(&sample_state()).await.unwrap();

        let raw = memory
            .get(&ObjectPath::from("prod/state.json"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            json["last_fired"]["Groceries::goal_threshold::75%"],
            "2026-04-15T12:00:00Z"
        );
    }

    #[tokio::test]
    async fn corrupt_document_is_error() {
        let memory = Arc::new(InMemory::new());
        memory
            .put(&ObjectPath::from("state.json"), PutPayload::from(Bytes::from_static(b"{not json")))
            .await
            .unwrap();
        let store = ObjectStateStore::new(memory, "state.json");
        assert!(matches!(store.load().await, Err(StorageError::Serialize(_))));
    }

    #[tokio::test]
    async fn local_backend_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = StorageBackend::Local(crate::backend::LocalBackend::new(tmp.path()).unwrap());
        let store = ObjectStateStore::from_backend(&backend, "state.json");

        store.save(&sample_state()).await.unwrap();
        assert!(tmp.path().join("state.json").is_file());
        assert_eq!(store.load().await.unwrap(), sample_state());
    }
}
