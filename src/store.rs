//! Key-value persistence capability shared by the views.
//!
//! Holds the bearer token, the draft editor content and the dark-mode flag.
//! The on-disk implementation lives in [`crate::db`]; [`MemoryStore`] keeps
//! everything in process.

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;

/// Bearer credential written on login, removed on logout.
pub const TOKEN_KEY: &str = "token";
/// Draft editor content, owned by the draft editor.
pub const DRAFT_KEY: &str = "editorContent";
/// Dark-mode preference, `"true"` or `"false"`.
pub const DARK_MODE_KEY: &str = "darkMode";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read the stored bearer token, treating an unreadable store as logged out.
pub fn read_token<S: KeyValueStore>(store: &S) -> Option<String> {
    match store.get(TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "could not read session token");
            None
        }
    }
}
