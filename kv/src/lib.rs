//! Key-value stores consumed by the gateway.
//!
//! The gateway reads two registries through the same [`KvStore`] trait: the
//! user registry, keyed by subscription token, and the config registry, keyed
//! by config name. Neither is ever written through this interface.

pub mod config;
pub mod filesystem;
pub mod memory;

use async_trait::async_trait;
use std::io;

pub use config::StoreConfig;
pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

#[derive(thiserror::Error, Debug)]
pub enum KvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Returns the names of all keys currently in the store.
    async fn list(&self) -> Result<Vec<String>, KvError>;

    fn is_ready(&self) -> bool {
        true
    }
}
