use crate::handler::SubscriptionHandler;
use crate::sampler::shuffler_for_seed;
use async_trait::async_trait;
use kv::{KvError, KvStore, MemoryStore};
use std::io;
use std::sync::Arc;

pub const VALID_TOKEN: &str = "tok-1234";

pub fn users() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_iter([(VALID_TOKEN, "{\"plan\":\"monthly\"}")]))
}

/// Config store with `n` entries named `config_00`.. holding `value_00`..
pub fn configs(n: usize) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_iter(
        (0..n).map(|i| (format!("config_{i:02}"), format!("value_{i:02}"))),
    ))
}

pub fn handler_with(
    users: Arc<dyn KvStore>,
    configs: Arc<dyn KvStore>,
    seed: Option<u64>,
) -> SubscriptionHandler {
    SubscriptionHandler::new(users, configs, shuffler_for_seed(seed), 14)
}

/// Lists a fixed set of keys but only holds values for some of them, like a
/// store whose entries are deleted between listing and fetching.
pub struct VanishingStore {
    pub listed: Vec<String>,
    pub values: MemoryStore,
}

#[async_trait]
impl KvStore for VanishingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.values.get(key).await
    }

    async fn list(&self) -> Result<Vec<String>, KvError> {
        Ok(self.listed.clone())
    }
}

/// Every operation fails with an I/O error.
pub struct UnreachableStore;

#[async_trait]
impl KvStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, KvError> {
        Err(io::Error::new(io::ErrorKind::ConnectionRefused, "store unreachable").into())
    }

    async fn list(&self) -> Result<Vec<String>, KvError> {
        Err(io::Error::new(io::ErrorKind::ConnectionRefused, "store unreachable").into())
    }

    fn is_ready(&self) -> bool {
        false
    }
}

/// Lookups fail with an error that names the requested key.
pub struct KeyEchoingStore;

#[async_trait]
impl KvStore for KeyEchoingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Err(io::Error::other(format!("timed out fetching {key}")).into())
    }

    async fn list(&self) -> Result<Vec<String>, KvError> {
        Ok(vec![])
    }
}
