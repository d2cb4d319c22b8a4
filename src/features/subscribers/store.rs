//! Flat JSON file holding the full subscriber snapshot
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Write through a temp file and rename
//! - 1.0.0: Initial release

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{RegistryError, Subscriber};

/// Durable mirror of the roster. Every save rewrites the whole file.
#[derive(Debug, Clone)]
pub struct SubscriberStore {
    path: PathBuf,
}

impl SubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot, creating an empty store when none exists
    pub async fn load(&self) -> Result<Vec<Subscriber>, RegistryError> {
        let read_err = |source| RegistryError::Read {
            path: self.path.clone(),
            source,
        };

        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(read_err)?;

        let contents = fs::read_to_string(&self.path).await.map_err(read_err)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|source| RegistryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the stored snapshot with `subscribers`
    pub async fn save(&self, subscribers: &[Subscriber]) -> Result<(), RegistryError> {
        let storage_err = |source| RegistryError::Storage {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_vec_pretty(subscribers)
            .map_err(io::Error::from)
            .map_err(storage_err)?;

        let tmp = self.temp_path();
        fs::write(&tmp, json).await.map_err(storage_err)?;
        fs::rename(&tmp, &self.path).await.map_err(storage_err)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_creates_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subscribers.json");
        let store = SubscriberStore::new(&path);

        let loaded = store.load().await.unwrap();
        assert!(loaded.is_empty());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubscriberStore::new(dir.path().join("subscribers.json"));
        let subscribers = vec![
            Subscriber::new(1).with_nickname("one"),
            Subscriber::new(2).with_names(Some("Two".into()), Some("Second".into())),
        ];

        store.save(&subscribers).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, subscribers);
        assert_eq!(loaded[1].last_name.as_deref(), Some("Second"));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_reads_legacy_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users_info.json");
        std::fs::write(
            &path,
            r#"[{"chat_id":123,"nickname":"sasha","name":"Alexandra"},{"chat_id":456,"name":"Oleg","surname":"Ivanov"}]"#,
        )
        .unwrap();

        let loaded = SubscriberStore::new(&path).load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].display_name(), "sasha");
        assert_eq!(loaded[1].display_name(), "Oleg Ivanov");
    }

    #[tokio::test]
    async fn test_corrupt_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subscribers.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = SubscriberStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, RegistryError::Corrupt { .. }));
    }
}
