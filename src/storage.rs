//! Key/value persistence for navigation flags.
//!
//! Records receive a [`KeyValueStore`] handle instead of touching
//! `localStorage` themselves. Flags are stored as JSON booleans so values
//! written by earlier versions of the page are read back unchanged.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// String key/value store shared by the records of one page.
pub trait KeyValueStore: fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Shared handle passed to record factories.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// Read a persisted flag. Missing or unparseable values yield `None`.
pub fn read_flag(store: &dyn KeyValueStore, key: &str) -> Option<bool> {
    let raw = store.get(key)?;
    match serde_json::from_str::<bool>(&raw) {
        Ok(flag) => Some(flag),
        Err(e) => {
            log::warn!("ignoring stored value for {key}: {e}");
            None
        }
    }
}

/// Persist a flag as a JSON boolean.
pub fn write_flag(store: &dyn KeyValueStore, key: &str, value: bool) {
    store.set(key, if value { "true" } else { "false" });
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Process-local store. Used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Rc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }
}

// =============================================================================
// LOCAL STORAGE
// =============================================================================

/// `window.localStorage`. Reads and writes degrade to no-ops when storage
/// is unavailable (private browsing, disabled cookies).
#[cfg(feature = "hydrate")]
#[derive(Debug, Default)]
pub struct LocalStore;

#[cfg(feature = "hydrate")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(feature = "hydrate")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            log::warn!("localStorage write for {key} failed: {e:?}");
        }
    }
}
