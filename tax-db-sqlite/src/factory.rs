use std::path::Path;

use async_trait::async_trait;

use tax_core::db::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

use crate::store::SqliteStore;

/// Connection string that selects a private in-memory database.
const IN_MEMORY: &str = ":memory:";

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`tax_core::db::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use tax_core::db::StoreRegistry;
/// use tax_db_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"tax-history.db"`. The file is created if it
    ///   does not exist.
    /// * `":memory:"`, an ephemeral in-memory database.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let target = config.connection_string.trim();
        let store = if target.is_empty() || target == IN_MEMORY {
            SqliteStore::in_memory().await
        } else {
            SqliteStore::open(Path::new(target)).await
        }
        .map_err(|e| StoreError::Connection(format!("{e:#}")))?;

        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Backend(format!("{e:#}")))?;

        Ok(Box::new(store))
    }
}
