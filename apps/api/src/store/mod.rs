//! Mock persistence: a string key-value capability shaped like a browser's
//! local storage, and the repository that keeps users and projects in it.
//!
//! Backends are swapped at startup from `STORE_BACKEND`. The repository never
//! knows which one it is talking to.

pub mod file;
pub mod memory;
pub mod redis_store;
pub mod repository;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, StoreBackend};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use repository::Repository;
pub use session::Session;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whole-value string storage. Every write replaces the value under a key;
/// there are no partial writes, transactions or version checks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Builds the backend selected in config.
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::File => {
            info!("Using file store at {}", config.store_path.display());
            Arc::new(FileStore::open(&config.store_path).await?)
        }
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("REDIS_URL is required when STORE_BACKEND=redis"))?;
            info!("Using Redis store (prefix '{}')", config.redis_key_prefix);
            Arc::new(RedisStore::new(url, config.redis_key_prefix.clone())?)
        }
    };
    Ok(store)
}
