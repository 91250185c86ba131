use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not signed in; a credential is required")]
    NotAuthenticated,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api(status, _) => Some(*status),
            _ => None,
        }
    }

    /// The server refused the credential (401) or the action (403).
    pub fn is_denied(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
