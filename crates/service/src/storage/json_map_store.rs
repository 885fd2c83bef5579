use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file. Every mutation is applied to a
/// copy of the map, written to a sibling temp file and renamed into place;
/// the in-memory map only changes once the file is on disk, so a failed
/// write leaves both sides untouched.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        common::env::ensure_parent_dir(&file_path)
            .await
            .map_err(|e| ServiceError::storage("prepare directory", e))?;

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    // 文件损坏时从空表开始，下一次写入会覆盖
                    warn!(path = %file_path.display(), error = %e, "unreadable store file, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                write_atomically(&file_path, &empty).await?;
                empty
            }
        };

        debug!(path = %file_path.display(), entries = map.len(), "json map store opened");
        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }

    /// Get value by key.
    pub async fn get_value(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Apply a mutation to a copy of the map, persist it, then publish it.
    pub async fn update_map<F>(&self, f: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<(), ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        f(&mut next)?;
        write_atomically(&self.file_path, &next).await?;
        *map = next;
        Ok(())
    }
}

async fn write_atomically<T: serde::Serialize>(path: &std::path::Path, value: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data).await.map_err(|e| ServiceError::storage("write temp file", e))?;
    fs::rename(&tmp, path).await.map_err(|e| ServiceError::storage("replace store file", e))?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for JsonMapStore<String, String> {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    async fn set_all(&self, entries: Vec<(String, String)>) -> Result<(), ServiceError> {
        self.update_map(|m| {
            m.extend(entries);
            Ok(())
        })
        .await
    }

    async fn remove_all(&self, keys: &[&str]) -> Result<(), ServiceError> {
        self.update_map(|m| {
            for key in keys {
                m.remove(*key);
            }
            Ok(())
        })
        .await
    }
}
