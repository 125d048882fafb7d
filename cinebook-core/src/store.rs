//! JSON helpers over a [`KeyValueStore`] plus an in-memory store.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::KeyValueStore;
use crate::error::StoreError;

/// Read and decode a JSON value. Missing keys yield `None`; a value that
/// fails to decode is reported as `Serialization`.
///
/// # Errors
///
/// Returns an error if the backend fails or the stored text is not valid JSON for `T`.
pub fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key).map_err(StoreError::backend)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Encode and store a JSON value.
///
/// # Errors
///
/// Returns an error if encoding or the backend write fails.
pub fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).map_err(StoreError::backend)
}

/// Remove a key.
///
/// # Errors
///
/// Returns an error if the backend fails.
pub fn remove<S>(store: &S, key: &str) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
{
    store.remove(key).map_err(StoreError::backend)
}

/// Shared in-memory store. Clones see the same entries, like two handles to
/// one browser's storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        write_json(&store, "k", &vec![1, 2, 3]).unwrap();
        let read: Option<Vec<i32>> = read_json(&other, "k").unwrap();
        assert_eq!(read, Some(vec![1, 2, 3]));
        remove(&other, "k").unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let store = MemoryStore::new();
        store.set("k", "{oops").unwrap();
        let read: Result<Option<Vec<i32>>, _> = read_json(&store, "k");
        assert!(matches!(read, Err(StoreError::Serialization(_))));
    }
}
