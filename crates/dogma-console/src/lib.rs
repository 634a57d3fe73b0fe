//! Dogma Console - Token creation console
//!
//! This crate provides:
//! - Console-side CIDR/IP validation
//! - The IP access-control rule editor
//! - The new-token form and its submission flow
//! - Notifications and error message parsing

pub mod api;
pub mod cidr;
pub mod editor;
pub mod error;
pub mod error_parser;
pub mod new_token;
pub mod notification;
pub mod session;

// Re-export commonly used types
pub use api::TokenCreator;
pub use cidr::is_valid_cidr;
pub use editor::{EditorState, IpAccessControlEditor, RuleDraft, RuleField};
pub use error::{EditorError, FormError};
pub use error_parser::ErrorMessageParser;
pub use new_token::{NewTokenForm, PendingSubmission, SecretDialog, SubmitOutcome};
pub use notification::{Notification, NotificationDispatcher, NotificationQueue, Severity};
pub use session::Session;
