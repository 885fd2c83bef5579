#![cfg(test)]
use std::sync::Arc;

use async_trait::async_trait;
use models::{TokenGrant, UserProfile};

use crate::errors::ServiceError;
use crate::session::{ManualClock, SessionStore, StorageKeys};
use crate::storage::{KeyValueStore, MemoryStore};

/// Fixed "now" shared by unit tests (2024-03-01T00:00:00Z).
pub const NOW: i64 = 1_709_251_200_000;

pub fn profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        first_name: "Ana".into(),
        last_name: "Souza".into(),
        phone: None,
        active: true,
        created_at: "2024-01-01T00:00:00".into(),
        updated_at: "2024-01-01T00:00:00".into(),
    }
}

pub fn grant(token: &str, expires_in: i64) -> TokenGrant {
    TokenGrant {
        access_token: token.to_string(),
        token_type: "bearer".into(),
        expires_in,
        user: profile("u1"),
    }
}

/// Empty in-memory session store driven by a manual clock.
pub async fn memory_session(clock: Arc<ManualClock>) -> (Arc<MemoryStore>, Arc<SessionStore>) {
    let storage = Arc::new(MemoryStore::new());
    let store = SessionStore::load(storage.clone(), clock, StorageKeys::default())
        .await
        .expect("load empty session store");
    (storage, Arc::new(store))
}

/// Reads nothing, rejects every write.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, ServiceError> {
        Ok(None)
    }

    async fn set_all(&self, _entries: Vec<(String, String)>) -> Result<(), ServiceError> {
        Err(ServiceError::Storage("disk full".into()))
    }

    async fn remove_all(&self, _keys: &[&str]) -> Result<(), ServiceError> {
        Err(ServiceError::Storage("disk full".into()))
    }
}
