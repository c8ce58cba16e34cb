//! JSON-file store for native hosts

use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;

/// All keys live in one JSON object file, rewritten on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts empty; an unreadable one
    /// is an error so the caller can decide whether to start over.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        log::info!("Opened store at {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Open, or start empty when the existing file cannot be read
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Starting with an empty store: {e:#}");
                Self {
                    path,
                    entries: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    fn flush_logged(&self) {
        if let Err(e) = self.flush() {
            log::warn!("Store write failed: {e:#}");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush_logged();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush_logged();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("arcade_hub_{}_{name}.json", std::process::id()))
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let path = scratch_path("persist");
        {
            let mut store = FileStore::open(&path).unwrap();
            store.set("k", "v");
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = scratch_path("corrupt");
        fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).is_err());
        let store = FileStore::open_or_empty(&path);
        assert_eq!(store.get("k"), None);
        fs::remove_file(path).ok();
    }
}
