//! Persistence for alert state.
//!
//! The state document lives in an object store: a local directory by
//! default, or an S3 bucket when one is configured.

pub mod backend;
pub mod error;
pub mod state_store;

use tripwire_core::Config;

pub use backend::{LocalBackend, S3Backend, StorageBackend};
pub use error::StorageError;
pub use state_store::{ObjectStateStore, StateStore};

/// Build the configured state store.
pub fn state_store_from_config(config: &Config) -> Result<ObjectStateStore, StorageError> {
    let backend = StorageBackend::from_config(&config.state, &config.aws)?;
    Ok(ObjectStateStore::from_backend(&backend, &config.state.key))
}
