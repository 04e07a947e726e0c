//! # Binding Store
//!
//! Durable persistence for the binding configuration.
//!
//! Storage is a plain key-value seam: the whole configuration is serialized
//! as JSON under a single key. Corrupt or missing data is never an error at
//! load time, it just degrades to the defaults. Save failures are logged and
//! swallowed; the in-memory configuration stays authoritative for the
//! session either way.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{DinoPadError, Result};

use super::{Action, BindingConfig, StoredBindings};

/// Storage key for the serialized binding configuration.
pub const STORAGE_KEY: &str = "trex_gamepad_mapping_v1";

/// Trait for durable string key-value storage
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed key-value store: one file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DinoPadError::Storage(format!(
                "failed to read key '{}': {}",
                key, e
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            DinoPadError::Storage(format!("failed to create {}: {}", self.dir.display(), e))
        })?;
        fs::write(self.path_for(key), value).map_err(|e| {
            DinoPadError::Storage(format!("failed to write key '{}': {}", key, e))
        })
    }
}

/// Owns the binding configuration and its persistence.
///
/// No other component writes bindings; the poll loop and the overlay both go
/// through this store, which persists immediately on every mutation.
///
/// # Examples
///
/// ```
/// use dino_pad::bindings::store::{BindingStore, KeyValueStore};
/// use dino_pad::bindings::Action;
/// # use dino_pad::error::Result;
/// # struct Nothing;
/// # impl KeyValueStore for Nothing {
/// #     fn get(&self, _: &str) -> Result<Option<String>> { Ok(None) }
/// #     fn set(&mut self, _: &str, _: &str) -> Result<()> { Ok(()) }
/// # }
/// let mut store = BindingStore::load(Nothing);
/// assert_eq!(store.config().jump, 0);
/// store.commit(Action::Jump, 5);
/// assert_eq!(store.config().jump, 5);
/// ```
pub struct BindingStore<S: KeyValueStore> {
    backend: S,
    config: BindingConfig,
}

impl<S: KeyValueStore> BindingStore<S> {
    /// Loads the persisted configuration, merging any valid stored values
    /// over the defaults.
    ///
    /// Never fails: absent, unreadable or unparseable storage degrades to the
    /// built-in defaults.
    pub fn load(backend: S) -> Self {
        let config = match backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<StoredBindings>(&raw) {
                Ok(stored) => stored.merge_over_defaults(),
                Err(e) => {
                    warn!("Stored bindings are corrupt, using defaults: {}", e);
                    BindingConfig::default()
                }
            },
            Ok(None) => {
                debug!("No stored bindings, using defaults");
                BindingConfig::default()
            }
            Err(e) => {
                warn!("Failed to read stored bindings, using defaults: {}", e);
                BindingConfig::default()
            }
        };

        Self { backend, config }
    }

    /// Current binding configuration.
    #[must_use]
    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Re-binds `action` to `index` and persists immediately.
    pub fn commit(&mut self, action: Action, index: u16) {
        self.config.set(action, index);
        self.save();
    }

    /// Restores the built-in defaults and persists them.
    pub fn reset(&mut self) {
        self.config = BindingConfig::default();
        self.save();
    }

    /// Backing store access for tests.
    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Persists the full current configuration.
    ///
    /// A storage failure is logged and swallowed; the in-memory config
    /// remains authoritative.
    pub fn save(&mut self) {
        let stored = StoredBindings::from(self.config);
        let payload = match serde_json::to_string(&stored) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize bindings: {}", e);
                return;
            }
        };

        if let Err(e) = self.backend.set(STORAGE_KEY, &payload) {
            warn!("Failed to save bindings: {}", e);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::MemoryStore;
    use super::*;

    // ==================== Load Tests ====================

    #[test]
    fn test_load_with_empty_storage_yields_defaults() {
        let store = BindingStore::load(MemoryStore::new());
        assert_eq!(*store.config(), BindingConfig::default());
    }

    #[test]
    fn test_load_with_full_payload() {
        let backend = MemoryStore::with_entry(
            STORAGE_KEY,
            r#"{"jump":4,"duck":5,"dpad_up":12,"dpad_down":13}"#,
        );
        let store = BindingStore::load(backend);
        assert_eq!(store.config().jump, 4);
        assert_eq!(store.config().duck, 5);
    }

    #[test]
    fn test_load_with_partial_payload_merges_defaults() {
        let backend = MemoryStore::with_entry(STORAGE_KEY, r#"{"duck":9}"#);
        let store = BindingStore::load(backend);
        assert_eq!(store.config().duck, 9);
        assert_eq!(store.config().jump, 0);
        assert_eq!(store.config().dpad_up, Some(12));
        assert_eq!(store.config().dpad_down, Some(13));
    }

    #[test]
    fn test_load_with_corrupt_payload_yields_defaults() {
        let backend = MemoryStore::with_entry(STORAGE_KEY, "{not json");
        let store = BindingStore::load(backend);
        assert_eq!(*store.config(), BindingConfig::default());
    }

    #[test]
    fn test_load_with_failing_backend_yields_defaults() {
        let mut backend = MemoryStore::new();
        backend.fail_get = true;
        let store = BindingStore::load(backend);
        assert_eq!(*store.config(), BindingConfig::default());
    }

    // ==================== Mutation Tests ====================

    #[test]
    fn test_commit_updates_and_persists() {
        let mut store = BindingStore::load(MemoryStore::new());
        store.commit(Action::Jump, 5);

        assert_eq!(store.config().jump, 5);
        let raw = store.backend.entries.get(STORAGE_KEY).unwrap();
        let reloaded: StoredBindings = serde_json::from_str(raw).unwrap();
        assert_eq!(reloaded.jump, Some(5));
    }

    #[test]
    fn test_reset_restores_defaults_and_persists() {
        let mut store = BindingStore::load(MemoryStore::new());
        store.commit(Action::Duck, 7);
        store.reset();

        assert_eq!(*store.config(), BindingConfig::default());
        let raw = store.backend.entries.get(STORAGE_KEY).unwrap();
        let reloaded: StoredBindings = serde_json::from_str(raw).unwrap();
        assert_eq!(reloaded.jump, Some(0));
        assert_eq!(reloaded.duck, Some(1));
        assert_eq!(reloaded.dpad_up, Some(12));
        assert_eq!(reloaded.dpad_down, Some(13));
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let mut backend = MemoryStore::new();
        backend.fail_set = true;
        let mut store = BindingStore::load(backend);

        // Must not panic or error; in-memory value stays authoritative.
        store.commit(Action::Jump, 3);
        assert_eq!(store.config().jump, 3);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = BindingStore::load(MemoryStore::new());
        store.commit(Action::Jump, 9);

        let entries = store.backend.entries.clone();
        let mut backend = MemoryStore::new();
        backend.entries = entries;

        let reloaded = BindingStore::load(backend);
        assert_eq!(reloaded.config().jump, 9);
        assert_eq!(reloaded.config().duck, 1);
    }

    // ==================== FileStore Tests ====================

    #[test]
    fn test_file_store_get_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_creates_directory_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deeply/nested");
        let mut store = FileStore::new(&nested);

        assert!(!nested.exists());
        store.set(STORAGE_KEY, "{}").unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_file_store_overwrites_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    }
}
