//! Process-wide authorization state, passed around explicitly.

use portal_auth::{Identity, SessionView, decode};
use portal_core::Credential;

use crate::error::SessionError;
use crate::storage::KeyValueStore;
use crate::store::{Session, SessionStore};

/// Single source of truth for "who is signed in".
///
/// Built once at startup with [`AuthorizationContext::init`] and handed to
/// whatever needs it (route guard, views, API clients). It lives as long as the
/// process; there is no teardown and nothing is shared across processes.
///
/// There is no expiry detection, background refresh or revocation check. A
/// role change made server-side shows up only after a new credential is passed
/// to [`login`](Self::login).
#[derive(Debug)]
pub struct AuthorizationContext<S> {
    store: SessionStore<S>,
    session: Option<Session>,
}

impl<S: KeyValueStore> AuthorizationContext<S> {
    /// Resume whatever session the store holds (possibly none).
    pub fn init(mut store: SessionStore<S>) -> Result<Self, SessionError> {
        let session = store.load()?;
        Ok(Self { store, session })
    }

    /// Establish a session from a freshly issued credential.
    ///
    /// The credential is decoded first and persisted second; the in-memory
    /// pair is only replaced once both succeeded. On failure the previous
    /// session (or lack of one) is left exactly as it was.
    pub fn login(&mut self, credential: Credential) -> Result<&Identity, SessionError> {
        let identity = decode(&credential).inspect_err(|err| {
            tracing::warn!(error = %err, "login rejected: credential does not decode");
        })?;

        self.store.save(&credential).inspect_err(|err| {
            tracing::error!(error = %err, "login failed: could not persist credential");
        })?;

        tracing::info!(
            username = %identity.username,
            roles = ?identity.roles,
            "session established"
        );

        let session = self.session.insert(Session {
            credential,
            identity,
        });
        Ok(&session.identity)
    }

    /// End the session.
    ///
    /// In-memory state is always reset. A storage failure is still reported so
    /// the caller can warn that the credential may resume on next start.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(previous) = self.session.take() {
            tracing::info!(username = %previous.identity.username, "session ended");
        }
        self.store.clear().inspect_err(|err| {
            tracing::error!(error = %err, "logout could not clear persisted credential");
        })?;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.identity)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.session.as_ref().map(|s| &s.credential)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn into_store(self) -> SessionStore<S> {
        self.store
    }
}

impl<S: KeyValueStore> SessionView for AuthorizationContext<S> {
    fn identity(&self) -> Option<&Identity> {
        AuthorizationContext::identity(self)
    }

    fn is_authenticated(&self) -> bool {
        AuthorizationContext::is_authenticated(self)
    }
}
