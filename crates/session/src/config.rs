//! Session configuration.
//!
//! Defaults, overridden by `PORTAL_*` environment variables; callers (the CLI)
//! may override individual fields afterwards.

use std::path::PathBuf;

use crate::storage::FileStore;
use crate::store::{DEFAULT_KEY, SessionStore};

pub const ENV_STORAGE_DIR: &str = "PORTAL_STORAGE_DIR";
pub const ENV_STORAGE_KEY: &str = "PORTAL_STORAGE_KEY";
pub const ENV_API_URL: &str = "PORTAL_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Directory holding the persisted credential.
    pub storage_dir: PathBuf,
    /// Key (file name) of the persisted credential.
    pub storage_key: String,
    /// Base URL of the user-management API.
    pub api_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            storage_key: DEFAULT_KEY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns; blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            storage_dir: get(ENV_STORAGE_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            storage_key: get(ENV_STORAGE_KEY).unwrap_or(defaults.storage_key),
            api_url: get(ENV_API_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
        }
    }

    pub fn file_store(&self) -> FileStore {
        FileStore::new(self.storage_dir.clone())
    }

    pub fn session_store(&self) -> SessionStore<FileStore> {
        SessionStore::with_key(self.file_store(), self.storage_key.clone())
    }
}

fn default_storage_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("portal")
    } else if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".portal")
    } else {
        PathBuf::from(".portal")
    }
}
