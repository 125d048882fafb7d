//! Profile storage: the whole key-value map lives in one JSON file that is
//! rewritten on every change.
use cinebook_core::KeyValueStore;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STORE_FILE: &str = "store.json";

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("profile store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("profile store {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open `<profile_dir>/store.json`; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(profile_dir: &Path) -> Result<Self, FileStoreError> {
        let path = profile_dir.join(STORE_FILE);
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| FileStoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(FileStoreError::Io { path, source }),
        };
        log::debug!("opened {} with {} key(s)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> FileStoreError {
        FileStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn flush(&self) -> Result<(), FileStoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|err| self.io_error(err))?;
        }
        let json = serde_json::to_string_pretty(&*self.entries.borrow()).map_err(|source| {
            FileStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }
}

impl KeyValueStore for FileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        if self.entries.borrow_mut().remove(key).is_none() {
            return Ok(());
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "cinebook-store-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn values_survive_reopening() {
        let dir = temp_dir("reopen");
        let store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("cinebook.auth").unwrap(), None);
        store.set("cinebook.auth", "{\"token\":\"t\"}").unwrap();
        store.set("bookings", "[]").unwrap();
        store.remove("bookings").unwrap();

        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(
            reopened.get("cinebook.auth").unwrap().as_deref(),
            Some("{\"token\":\"t\"}")
        );
        assert_eq!(reopened.get("bookings").unwrap(), None);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn removing_a_missing_key_writes_nothing() {
        let dir = temp_dir("missing");
        let store = FileStore::open(&dir).unwrap();
        store.remove("nothing").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STORE_FILE), "[1, 2").unwrap();
        let err = FileStore::open(&dir).unwrap_err();
        assert!(matches!(err, FileStoreError::Corrupt { .. }));
        fs::remove_dir_all(dir).unwrap();
    }
}
