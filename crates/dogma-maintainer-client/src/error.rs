// Error types for MaintainerClient

/// Errors that can occur during maintainer client operations
#[derive(Debug, thiserror::Error)]
pub enum MaintainerError {
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("No server address configured")]
    NoServer,

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MaintainerError {
    /// HTTP status of a rejected request, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            MaintainerError::RequestFailed { status, .. } => Some(*status),
            MaintainerError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
