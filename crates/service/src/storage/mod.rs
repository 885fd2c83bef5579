//! Storage abstractions for the session layer
//!
//! The session store only needs a string key-value map with batched writes,
//! the same shape as browser local storage. Two implementations ship here:
//! a JSON file-backed map for real use and an in-memory map for tests and
//! ephemeral sessions.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod json_map_store;
pub mod memory;

pub use json_map_store::JsonMapStore;
pub use memory::MemoryStore;

/// Persistent string key-value store.
///
/// Batched operations must apply all-or-nothing: either every entry is
/// persisted or none is.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;

    /// Insert or overwrite every entry in one persisted step.
    async fn set_all(&self, entries: Vec<(String, String)>) -> Result<(), ServiceError>;

    /// Remove every key in one persisted step. Missing keys are ignored.
    async fn remove_all(&self, keys: &[&str]) -> Result<(), ServiceError>;
}
