//! Device-local key-value storage
//!
//! The cart persists as a single serialized blob under one fixed key.
//! Backends implement [`KeyValueStore`]; the on-disk [`FileStore`] is used by
//! the CLI and [`MemoryStore`] backs tests and embedders.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::MarketResult;
use async_trait::async_trait;

/// Abstract string key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    async fn get(&self, key: &str) -> MarketResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> MarketResult<()>;

    /// Remove `key`; succeeds if the key does not exist
    async fn remove(&self, key: &str) -> MarketResult<()>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &'static str;
}
