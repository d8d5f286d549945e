//! Persisted workspace preference storage.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host key/value store holding JSON text per preference key.
pub trait PrefsStore {
    /// Loads the raw JSON stored under `key`.
    fn load_pref<'a>(&'a self, key: &'a str) -> PrefsFuture<'a, Result<Option<String>, String>>;

    /// Replaces the raw JSON stored under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsFuture<'a, Result<(), String>>;

    /// Removes `key`.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that never persists anything.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(&'a self, _key: &'a str) -> PrefsFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// Process-local store. Clones share the same map.
pub struct MemoryPrefsStore {
    values: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Stores `raw_json` synchronously, for seeding hosts and tests.
    pub fn insert_raw(&self, key: impl Into<String>, raw_json: impl Into<String>) {
        self.values.borrow_mut().insert(key.into(), raw_json.into());
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(&'a self, key: &'a str) -> PrefsFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.values.borrow().get(key).cloned()) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.insert_raw(key, raw_json);
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.values.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads `key` and decodes it as `T`.
///
/// # Errors
///
/// Returns an error when the store fails or the stored JSON does not decode as `T`.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    match store.load_pref(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| format!("decode `{key}`: {err}")),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns an error when encoding or the store fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|err| format!("encode `{key}`: {err}"))?;
    store.save_pref(key, &raw).await
}
