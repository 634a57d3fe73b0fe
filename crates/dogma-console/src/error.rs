// Error types for the console

/// Message shown when a rule's CIDR fails validation
pub const INVALID_CIDR_MESSAGE: &str =
    "Invalid CIDR notation. Examples: 192.168.1.0/24, 10.0.0.1/32, 192.168.1.1";

/// Message shown when the application id does not match its pattern
pub const INVALID_APP_ID_MESSAGE: &str = "The first/last character must be alphanumeric";

/// Rule editor errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("{}", INVALID_CIDR_MESSAGE)]
    InvalidCidr,

    #[error("The rule editor is disabled")]
    Disabled,
}

/// New-token form errors that block submission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Application ID is required")]
    AppIdRequired,

    #[error("{}", INVALID_APP_ID_MESSAGE)]
    InvalidAppId,

    #[error("A token is already being created")]
    Busy,

    #[error("Failed to encode the request: {0}")]
    Encoding(String),
}

impl FormError {
    /// Whether the error belongs next to the application id field
    pub fn is_app_id_error(&self) -> bool {
        matches!(self, FormError::AppIdRequired | FormError::InvalidAppId)
    }
}
