//! Persistence of the single session credential.

use portal_auth::{Identity, decode};
use portal_core::Credential;

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key used when none is configured.
pub const DEFAULT_KEY: &str = "authToken";

/// A credential together with the identity decoded from it.
///
/// The two only ever travel as a pair, so a session cannot hold a credential
/// without its identity (or the reverse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Credential,
    pub identity: Identity,
}

/// Owner of the persisted credential.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Resume a previously persisted session.
    ///
    /// A stored value that no longer decodes is deleted and reported as "no
    /// session", so a stale token cannot leave the app half signed in.
    pub fn load(&mut self) -> Result<Option<Session>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            tracing::debug!(key = %self.key, "no persisted credential");
            return Ok(None);
        };

        let credential = Credential::new(raw);
        match decode(&credential) {
            Ok(identity) => {
                tracing::info!(username = %identity.username, "resumed persisted session");
                Ok(Some(Session {
                    credential,
                    identity,
                }))
            }
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "discarding undecodable persisted credential"
                );
                self.storage.remove(&self.key)?;
                Ok(None)
            }
        }
    }

    /// Persist `credential`, overwriting any previous one.
    pub fn save(&mut self, credential: &Credential) -> Result<(), StorageError> {
        self.storage.set(&self.key, credential.as_str())
    }

    /// Delete the persisted credential. Safe to call with no session.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}
