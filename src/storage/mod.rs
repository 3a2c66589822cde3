//! Opaque key-value persistence.
//!
//! The panel only ever stores two values: the full note list as a JSON
//! array and the background opacity as a decimal string. Anything that
//! can get and set strings by key can back it.

mod memory_store;
mod sqlite_store;

use std::sync::{Arc, Mutex};

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

use crate::error::{NotesError, Result};

/// Key holding the JSON-serialized note list.
pub const NOTES_KEY: &str = "glassy_notes_config";

/// Key holding the background opacity.
pub const OPACITY_KEY: &str = "glassy_opacity";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// A store shared between the note persister and the settings.
pub type SharedStore<S> = Arc<Mutex<S>>;

pub fn shared<S: KeyValueStore>(store: S) -> SharedStore<S> {
    Arc::new(Mutex::new(store))
}

/// Read a key through a shared store.
pub fn read_shared<S: KeyValueStore>(store: &SharedStore<S>, key: &str) -> Result<Option<String>> {
    let guard = store
        .lock()
        .map_err(|_| NotesError::Storage("store lock poisoned".to_string()))?;
    guard.get(key)
}

/// Write a key through a shared store.
pub fn write_shared<S: KeyValueStore>(store: &SharedStore<S>, key: &str, value: &str) -> Result<()> {
    let mut guard = store
        .lock()
        .map_err(|_| NotesError::Storage("store lock poisoned".to_string()))?;
    guard.set(key, value)
}

/// Remove a key through a shared store.
pub fn remove_shared<S: KeyValueStore>(store: &SharedStore<S>, key: &str) -> Result<()> {
    let mut guard = store
        .lock()
        .map_err(|_| NotesError::Storage("store lock poisoned".to_string()))?;
    guard.remove(key)
}
