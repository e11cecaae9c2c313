use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::store::{KeyValueStore, MemoryStore, StoreError};

/// Database file used by the `sqlite` backend unless configured otherwise.
pub const DEFAULT_DATABASE: &str = "tax-history.db";

/// Backend-agnostic store configuration.
///
/// `backend` must match the [`StoreFactory::backend_name`] of a registered
/// factory. `connection_string` is passed through to that factory unchanged.
///
/// | backend  | connection_string examples        |
/// |----------|-----------------------------------|
/// | `sqlite` | `tax-history.db`, `:memory:`      |
/// | `memory` | ignored                           |
///
/// Fields missing from a config file fall back to [`StoreConfig::default`],
/// which keeps history in [`DEFAULT_DATABASE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"sqlite"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: DEFAULT_DATABASE.to_string(),
        }
    }
}

/// One implementation per storage backend, registered with a
/// [`StoreRegistry`] at startup.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the backing storage and return a ready store.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError>;
}

/// Factory for [`MemoryStore`], registered as `"memory"`.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}

/// Backends a history store can be opened on, looked up by
/// [`StoreConfig::backend`].
///
/// Backends are kept in name order so listings and error messages are stable.
pub struct StoreRegistry {
    backends: BTreeMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self {
            backends: BTreeMap::new(),
        }
    }

    /// Makes `factory` available under its backend name. A later factory with
    /// the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn StoreFactory>,
    ) {
        let name = factory.backend_name();
        if self.backends.insert(name, factory).is_some() {
            tracing::debug!(backend = name, "store backend replaced");
        }
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.backends.keys().copied().collect()
    }

    /// Opens the key-value store described by `config`.
    ///
    /// # Errors
    /// [`StoreError::Configuration`] naming the requested backend and every
    /// registered one when `config.backend` is unknown; otherwise whatever
    /// the backend's factory reports.
    pub async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let Some(factory) = self.backends.get(config.backend.as_str()) else {
            return Err(StoreError::Configuration(format!(
                "no history store backend named '{}' (registered: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        tracing::debug!(
            backend = %config.backend,
            target = %config.connection_string,
            "opening history store"
        );
        factory.create(config).await
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}
