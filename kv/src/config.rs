use crate::{FilesystemStore, KvStore, MemoryStore};
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum StoreConfig {
    Memory {
        #[serde(default)]
        entries: IndexMap<String, String>,
    },
    Filesystem {
        base_dir: String,
    },
}

impl StoreConfig {
    pub fn build(&self) -> Arc<dyn KvStore> {
        match self {
            StoreConfig::Memory { entries } => Arc::new(MemoryStore::from_iter(entries.clone())),
            StoreConfig::Filesystem { base_dir } => Arc::new(FilesystemStore::new(base_dir)),
        }
    }
}
