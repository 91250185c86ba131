use thiserror::Error;

use portal_auth::DecodeError;

/// Failure at the durable storage boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("failed to {op} storage key '{key}': {source}")]
    Io {
        op: &'static str,
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(op: &'static str, key: &str, source: std::io::Error) -> Self {
        Self::Io {
            op,
            key: key.to_string(),
            source,
        }
    }
}

/// Reported failure of a session operation (login/logout/startup).
///
/// Never raised past the caller as a panic; views show it inline.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("credential rejected: {0}")]
    Decode(#[from] DecodeError),

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}
