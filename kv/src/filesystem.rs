//! Directory-backed store: every regular file under the base directory is one
//! entry, named by its file name and holding the file's contents.
use crate::{KvError, KvStore};
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct FilesystemStore {
    base_dir: PathBuf,
    // Set at construction, then refreshed by every listing.
    ready: AtomicBool,
}

impl FilesystemStore {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        let base_dir = base_dir.into();
        let ready = AtomicBool::new(base_dir.is_dir());

        FilesystemStore { base_dir, ready }
    }

    // Keys map directly to file names and must never escape the base directory.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains('/')
            || key.contains('\\')
            || key.contains('\0')
        {
            return None;
        }
        Some(self.base_dir.join(key))
    }
}

#[async_trait]
impl KvStore for FilesystemStore {
    /// Values are text. Bytes that are not valid UTF-8 are replaced with
    /// U+FFFD rather than failing the read.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                // A directory with a key-like name is not an entry
                return match tokio::fs::metadata(&path).await {
                    Ok(metadata) if metadata.is_dir() => Ok(None),
                    _ => Err(err.into()),
                };
            }
        };

        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn list(&self) -> Result<Vec<String>, KvError> {
        let mut read_dir = match tokio::fs::read_dir(&self.base_dir).await {
            Ok(read_dir) => read_dir,
            Err(err) => {
                self.ready.store(false, Ordering::Relaxed);
                return Err(err.into());
            }
        };
        self.ready.store(true, Ordering::Relaxed);

        let mut keys = Vec::new();

        while let Some(entry) = read_dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if !name.starts_with('.') => keys.push(name),
                Ok(_) => {}
                Err(name) => {
                    tracing::warn!(?name, "Skipping entry with non UTF-8 file name");
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn populated_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("beta"), "vmess://beta").unwrap();
        fs::write(dir.path().join("alpha"), "vless://alpha").unwrap();
        fs::write(dir.path().join(".hidden"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_skips_non_entries() {
        let dir = populated_dir();
        let store = FilesystemStore::new(dir.path());

        assert_eq!(store.list().await.unwrap(), vec!["alpha", "beta"]);
        assert!(store.is_ready());
    }

    #[tokio::test]
    async fn test_get() {
        let dir = populated_dir();
        let store = FilesystemStore::new(dir.path());

        assert_eq!(
            store.get("alpha").await.unwrap(),
            Some("vless://alpha".to_string())
        );
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.get("nested").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_cannot_escape_base_dir() {
        let dir = populated_dir();
        let inner = dir.path().join("nested");
        fs::write(inner.join("inside"), "x").unwrap();
        let store = FilesystemStore::new(&inner);

        assert_eq!(store.get("..").await.unwrap(), None);
        assert_eq!(store.get("../alpha").await.unwrap(), None);
        assert_eq!(store.get("").await.unwrap(), None);
        assert_eq!(store.get("inside").await.unwrap(), Some("x".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("binary"), [0x76, 0xff, 0x6c]).unwrap();
        fs::write(dir.path().join("user"), [0xff]).unwrap();
        let store = FilesystemStore::new(dir.path());

        assert_eq!(
            store.get("binary").await.unwrap(),
            Some("v\u{FFFD}l".to_string())
        );
        assert_eq!(store.get("user").await.unwrap(), Some("\u{FFFD}".to_string()));
    }

    #[tokio::test]
    async fn test_readiness_follows_listing() {
        let dir = populated_dir();
        let base = dir.path().join("configs");
        fs::create_dir(&base).unwrap();
        let store = FilesystemStore::new(&base);
        assert!(store.is_ready());

        fs::remove_dir(&base).unwrap();
        assert!(store.list().await.is_err());
        assert!(!store.is_ready());

        fs::create_dir(&base).unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.is_ready());
    }

    #[tokio::test]
    async fn test_missing_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(dir.path().join("does-not-exist"));

        assert!(!store.is_ready());
        assert!(matches!(store.list().await, Err(KvError::Io(_))));
    }
}
