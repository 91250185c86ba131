//! Durable key-value storage boundary.
//!
//! The session layer reads and writes exactly one logical key. Anything that can
//! hold a string per key (a file, browser `localStorage`, a keychain) can sit
//! behind [`KeyValueStore`].

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Client-device key-value store.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value`, overwriting any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Returns `Ok(())` even if nothing was stored.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and ephemeral sessions.
///
/// Does NOT persist across restarts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one file per key inside a directory.
///
/// Values are written to a sibling temp file and renamed into place, so a
/// crash never leaves a half-written token behind. On Unix the file is
/// restricted to 0600 (owner read/write only).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        // Non-UTF-8 content is handed up lossily so the session layer can
        // reject it as an undecodable credential and delete it.
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io("read", key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::io("create directory for", key, e))?;

        let tmp = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, value).map_err(|e| StorageError::io("write", key, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(|e| StorageError::io("set permissions on", key, e))?;
        }

        fs::rename(&tmp, &path).map_err(|e| StorageError::io("write", key, e))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("delete", key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_basic_operations() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("authToken").unwrap(), None);

        store.set("authToken", "a").unwrap();
        store.set("authToken", "b").unwrap();
        assert_eq!(store.get("authToken").unwrap().as_deref(), Some("b"));

        store.remove("authToken").unwrap();
        store.remove("authToken").unwrap();
        assert_eq!(store.get("authToken").unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = FileStore::new(temp_dir.path().join("nested"));
            store.set("authToken", "eyJ.token.sig").unwrap();
        }

        let store = FileStore::new(temp_dir.path().join("nested"));
        assert_eq!(store.get("authToken").unwrap().as_deref(), Some("eyJ.token.sig"));
    }

    #[test]
    fn file_store_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        store.remove("authToken").unwrap();

        store.set("authToken", "x").unwrap();
        store.remove("authToken").unwrap();
        store.remove("authToken").unwrap();
        assert_eq!(store.get("authToken").unwrap(), None);
    }

    #[test]
    fn file_store_reads_non_utf8_content_lossily() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("authToken"), [0xff, 0xfe, b'o', b'k']).unwrap();

        let store = FileStore::new(temp_dir.path());
        let value = store.get("authToken").unwrap().unwrap();
        assert!(value.ends_with("ok"));
        assert!(value.contains(char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        for key in ["", "..", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(store.set(key, "v"), Err(StorageError::InvalidKey(_))),
                "{key:?}"
            );
        }
    }

    #[test]
    #[cfg(unix)]
    fn file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        store.set("authToken", "secret").unwrap();

        let mode = fs::metadata(temp_dir.path().join("authToken"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
