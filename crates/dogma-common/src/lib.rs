//! Dogma Common - Shared types, errors, and validation helpers
//!
//! This crate provides the foundational types used across all Dogma components:
//! - Error types
//! - Identifier validation (application ids, secrets)
//! - The access-control action shared by the console and the server
//! - Session role names

pub mod error;
pub mod model;
pub mod utils;

// Re-exports for convenience
pub use error::{DogmaError, Result};
pub use model::{IpAccessAction, UserAndTimestamp};
pub use utils::{is_valid_file_name, validate_file_name};

/// Role granted to system administrators.
pub const LEVEL_SYSTEM_ADMIN: &str = "LEVEL_SYSTEM_ADMIN";

/// Role granted to every logged-in user.
pub const LEVEL_USER: &str = "LEVEL_USER";

/// Prefix used when an application token is reported as the authenticated user.
pub const APP_USER_PREFIX: &str = "app/";
