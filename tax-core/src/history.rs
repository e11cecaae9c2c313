//! Bounded, most-recent-first calculation history.
//!
//! The whole list is serialized as a JSON array and written under a single
//! key on every mutation. Reading tolerates a missing key, unreadable JSON
//! and backend read failures by starting from an empty list.

use tracing::{debug, warn};

use crate::db::{KeyValueStore, StoreError};
use crate::models::HistoryEntry;

/// Key the history list is persisted under.
pub const HISTORY_KEY: &str = "taxHistory";

/// Maximum number of entries kept.
pub const MAX_HISTORY_ENTRIES: usize = 10;

pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
    key: String,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Wraps `store` with an empty in-memory list. Call [`load`](Self::load)
    /// to pick up persisted entries.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(store, HISTORY_KEY)
    }

    pub fn with_key(
        store: Box<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            entries: Vec::new(),
        }
    }

    /// Creates the store and loads persisted entries in one step.
    pub async fn open(store: Box<dyn KeyValueStore>) -> Self {
        let mut history = Self::new(store);
        history.load().await;
        history
    }

    /// Replaces the in-memory list with the persisted one.
    pub async fn load(&mut self) -> &[HistoryEntry] {
        self.entries = match self.store.get(&self.key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(MAX_HISTORY_ENTRIES);
                    entries
                }
                Err(error) => {
                    warn!(key = %self.key, %error, "discarding malformed history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(key = %self.key, %error, "history read failed, starting empty");
                Vec::new()
            }
        };
        debug!(count = self.entries.len(), "history loaded");
        &self.entries
    }

    /// Prepends `entry`, drops anything past [`MAX_HISTORY_ENTRIES`] and
    /// persists the full list.
    ///
    /// The in-memory list is only updated once the write succeeded.
    pub async fn append(
        &mut self,
        entry: HistoryEntry,
    ) -> Result<(), StoreError> {
        let mut entries = Vec::with_capacity(MAX_HISTORY_ENTRIES);
        entries.push(entry);
        entries.extend(
            self.entries
                .iter()
                .take(MAX_HISTORY_ENTRIES - 1)
                .cloned(),
        );

        self.persist(&entries).await?;
        self.entries = entries;
        Ok(())
    }

    /// Empties the list and removes the persisted key.
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(&self.key).await?;
        self.entries.clear();
        debug!(key = %self.key, "history cleared");
        Ok(())
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    async fn persist(
        &self,
        entries: &[HistoryEntry],
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(&self.key, &raw).await
    }
}
