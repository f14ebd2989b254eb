//! Key/value storage shared by every session context in the process, with a
//! change feed modelled on the browser `storage` event.

use std::collections::BTreeMap;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use crate::error::StorageError;

const EVENT_CAPACITY: usize = 64;

static NEXT_TAB: AtomicU64 = AtomicU64::new(1);

/// Identifies the context that made a change so it can skip its own events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(u64);

impl TabId {
    pub fn next() -> Self {
        TabId(NEXT_TAB.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub origin: TabId,
}

pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl LocalStorage {
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self::with_entries(None, BTreeMap::new()))
    }

    /// Opens (or starts) a JSON-file backed store. A missing or empty file is
    /// an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Arc<Self>, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == IoErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened storage");
        Ok(Arc::new(Self::with_entries(Some(path), entries)))
    }

    fn with_entries(path: Option<PathBuf>, entries: BTreeMap<String, String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { path, entries: RwLock::new(entries), events }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    pub fn set_item(&self, origin: TabId, key: &str, value: impl Into<String>) {
        self.write(origin, key, Some(value.into()));
    }

    pub fn remove_item(&self, origin: TabId, key: &str) {
        self.write(origin, key, None);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    // Writing the same value again is not a change and publishes nothing.
    fn write(&self, origin: TabId, key: &str, new_value: Option<String>) {
        let old_value = {
            let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            let old_value = match &new_value {
                Some(value) => entries.insert(key.to_string(), value.clone()),
                None => entries.remove(key),
            };
            if old_value == new_value {
                return;
            }
            self.persist(&entries);
            old_value
        };

        // no receivers is fine
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            old_value,
            new_value,
            origin,
        });
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let Some(path) = &self.path else {
            return;
        };
        let result = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or(Ok(()), std::fs::create_dir_all)
            .map_err(StorageError::from)
            .and_then(|_| serde_json::to_string_pretty(entries).map_err(StorageError::from))
            .and_then(|json| std::fs::write(path, json).map_err(StorageError::from));
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "failed to persist storage");
        }
    }
}
