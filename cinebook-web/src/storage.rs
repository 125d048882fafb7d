//! `localStorage` as a [`KeyValueStore`].
use cinebook_core::KeyValueStore;
use wasm_bindgen::JsValue;

use crate::dom::{js_error_message, local_storage};

#[derive(Debug, thiserror::Error)]
#[error("localStorage: {0}")]
pub struct BrowserStoreError(String);

impl From<JsValue> for BrowserStoreError {
    fn from(value: JsValue) -> Self {
        Self(js_error_message(&value))
    }
}

/// Handle to the page's `localStorage`; every call re-acquires the storage
/// object, so a store can be created before the window exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    type Error = BrowserStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(local_storage()?.get_item(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Ok(local_storage()?.set_item(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        Ok(local_storage()?.remove_item(key)?)
    }
}
