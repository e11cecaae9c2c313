pub mod factory;
pub mod store;

pub use factory::{DEFAULT_DATABASE, MemoryStoreFactory, StoreConfig, StoreFactory, StoreRegistry};
pub use store::{KeyValueStore, MemoryStore, StoreError};
