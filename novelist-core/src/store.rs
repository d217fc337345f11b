//! Durable slot storage.
//!
//! The store maps a fixed set of named slots onto a synchronous
//! string-keyed backend, restores them at startup, and writes them back
//! as they change. Durability is best-effort by policy: a backend that is
//! missing or broken yields defaults on read and swallows writes, with a
//! note on the trace channel rather than a user-visible error.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from storage backend operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The fixed slot set.
///
/// Scalars are stored as raw strings (booleans as `"true"`/`"false"`),
/// list slots as JSON arrays of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The manuscript text.
    Draft,
    Title,
    Genre,
    /// JSON array of character records.
    Characters,
    WorldNotes,
    /// JSON array of image records.
    Images,
    AdultContent,
    AgeVerified,
    /// Unix seconds of the last snapshot save.
    LastSaved,
    /// In-app settings copy of the service API key.
    ApiKey,
}

impl Slot {
    pub const ALL: [Slot; 10] = [
        Slot::Draft,
        Slot::Title,
        Slot::Genre,
        Slot::Characters,
        Slot::WorldNotes,
        Slot::Images,
        Slot::AdultContent,
        Slot::AgeVerified,
        Slot::LastSaved,
        Slot::ApiKey,
    ];

    /// The backend key for this slot.
    pub fn key(self) -> &'static str {
        match self {
            Slot::Draft => "draft",
            Slot::Title => "title",
            Slot::Genre => "genre",
            Slot::Characters => "characters",
            Slot::WorldNotes => "world_notes",
            Slot::Images => "images",
            Slot::AdultContent => "adult_content",
            Slot::AgeVerified => "age_verified",
            Slot::LastSaved => "last_saved",
            Slot::ApiKey => "api_key",
        }
    }
}

/// A synchronous string-keyed durable store, local to the device.
///
/// Implementations survive application restarts but are not shared
/// across devices; there is no cross-key transaction.
pub trait StorageBackend: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// File-per-slot backend rooted at a directory.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.slot"))
    }
}

impl StorageBackend for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::write(self.slot_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Ephemeral in-memory backend. Used when no durable location is
/// available, and by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Typed, best-effort access to the slot set over an arbitrary backend.
pub struct DraftStore {
    backend: Box<dyn StorageBackend>,
}

impl DraftStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Open a directory-backed store, falling back to an in-memory
    /// backend when the directory cannot be created. The fallback keeps
    /// the application usable with defaults; writes then land nowhere
    /// durable, which is the documented best-effort policy.
    pub fn open_dir(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        match DirStore::open(&root) {
            Ok(store) => Self::new(store),
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "slot directory unavailable, using in-memory store");
                Self::new(MemoryStore::new())
            }
        }
    }

    /// Strict read of a raw slot value.
    pub fn read_raw(&self, slot: Slot) -> Result<Option<String>, StoreError> {
        self.backend.get(slot.key())
    }

    /// Read a string slot, falling back to `default` when the slot is
    /// absent or the backend errors.
    pub fn read_string(&self, slot: Slot, default: &str) -> String {
        match self.backend.get(slot.key()) {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(e) => {
                tracing::debug!(slot = slot.key(), error = %e, "slot read failed, using default");
                default.to_string()
            }
        }
    }

    /// Read an optional string slot; absent, empty, and erroring all
    /// collapse to `None`.
    pub fn read_optional_string(&self, slot: Slot) -> Option<String> {
        let value = self.read_string(slot, "");
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Read a boolean slot encoded as `"true"`/`"false"`. Anything else
    /// is the default `false`.
    pub fn read_bool(&self, slot: Slot) -> bool {
        self.read_string(slot, "false") == "true"
    }

    /// Read a JSON-list slot. A missing, unreadable, or malformed value
    /// restores as the empty list.
    pub fn read_list<T: DeserializeOwned>(&self, slot: Slot) -> Vec<T> {
        let raw = match self.backend.get(slot.key()) {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::debug!(slot = slot.key(), error = %e, "slot read failed, using empty list");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(slot = slot.key(), error = %e, "malformed slot contents, using empty list");
                Vec::new()
            }
        }
    }

    /// Write a string slot. Failures are swallowed.
    pub fn write_string(&mut self, slot: Slot, value: &str) {
        if let Err(e) = self.backend.put(slot.key(), value) {
            tracing::debug!(slot = slot.key(), error = %e, "slot write failed");
        }
    }

    /// Write a boolean slot as `"true"`/`"false"`.
    pub fn write_bool(&mut self, slot: Slot, value: bool) {
        self.write_string(slot, if value { "true" } else { "false" });
    }

    /// Write a JSON-list slot.
    pub fn write_list<T: Serialize>(&mut self, slot: Slot, values: &[T]) {
        match serde_json::to_string(values) {
            Ok(raw) => self.write_string(slot, &raw),
            Err(e) => {
                tracing::debug!(slot = slot.key(), error = %e, "slot serialization failed");
            }
        }
    }

    /// Clear a slot. Failures are swallowed.
    pub fn clear(&mut self, slot: Slot) {
        if let Err(e) = self.backend.remove(slot.key()) {
            tracing::debug!(slot = slot.key(), error = %e, "slot remove failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{Character, CharacterId};
    use crate::testing::FailingStore;
    use tempfile::TempDir;

    #[test]
    fn test_string_slot_round_trip() {
        let mut store = DraftStore::new(MemoryStore::new());

        store.write_string(Slot::Draft, "Chapter one.\n\nIt began at sea.");
        assert_eq!(
            store.read_string(Slot::Draft, ""),
            "Chapter one.\n\nIt began at sea."
        );

        // The empty string is a valid stored value, distinct from absent.
        store.write_string(Slot::Draft, "");
        assert_eq!(store.read_string(Slot::Draft, "fallback"), "");
    }

    #[test]
    fn test_bool_slot_encoding() {
        let mut store = DraftStore::new(MemoryStore::new());

        assert!(!store.read_bool(Slot::AdultContent));
        store.write_bool(Slot::AdultContent, true);
        assert_eq!(store.read_raw(Slot::AdultContent).unwrap().unwrap(), "true");
        assert!(store.read_bool(Slot::AdultContent));
    }

    #[test]
    fn test_list_slot_round_trip() {
        let mut store = DraftStore::new(MemoryStore::new());
        let characters = vec![
            Character {
                id: CharacterId(1),
                name: "Anya".to_string(),
                bio: "Cartographer".to_string(),
            },
            Character {
                id: CharacterId(2),
                name: "Brin".to_string(),
                bio: String::new(),
            },
        ];

        store.write_list(Slot::Characters, &characters);
        let restored: Vec<Character> = store.read_list(Slot::Characters);
        assert_eq!(restored, characters);
    }

    #[test]
    fn test_malformed_list_restores_empty() {
        let mut store = DraftStore::new(MemoryStore::new());
        store.write_string(Slot::Characters, "not json at all {");

        let restored: Vec<Character> = store.read_list(Slot::Characters);
        assert!(restored.is_empty());
    }

    #[test]
    fn test_failing_backend_yields_defaults() {
        let mut store = DraftStore::new(FailingStore);

        assert_eq!(store.read_string(Slot::Title, "Untitled"), "Untitled");
        assert!(!store.read_bool(Slot::AgeVerified));
        let characters: Vec<Character> = store.read_list(Slot::Characters);
        assert!(characters.is_empty());

        // Writes are swallowed rather than surfaced.
        store.write_string(Slot::Title, "ignored");
        store.write_bool(Slot::AdultContent, true);
        store.clear(Slot::Draft);
    }

    #[test]
    fn test_dir_store_persists_across_instances() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        {
            let mut store = DraftStore::open_dir(dir.path());
            store.write_string(Slot::Title, "The Hollow Season");
            store.write_bool(Slot::AgeVerified, true);
        }

        let store = DraftStore::open_dir(dir.path());
        assert_eq!(store.read_string(Slot::Title, ""), "The Hollow Season");
        assert!(store.read_bool(Slot::AgeVerified));
    }

    #[test]
    fn test_dir_store_missing_slot_is_none() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = DirStore::open(dir.path()).unwrap();
        assert_eq!(store.get("draft").unwrap(), None);
    }

    #[test]
    fn test_clear_slot() {
        let mut store = DraftStore::new(MemoryStore::new());
        store.write_string(Slot::ApiKey, "sk-local");
        assert_eq!(store.read_optional_string(Slot::ApiKey).as_deref(), Some("sk-local"));

        store.clear(Slot::ApiKey);
        assert_eq!(store.read_optional_string(Slot::ApiKey), None);
    }
}
