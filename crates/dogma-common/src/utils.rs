//! Utility functions for Dogma
//!
//! Identifier validation shared by the console form and the token model.

use std::sync::LazyLock;

use crate::error::{DogmaError, Result};

/// Pattern that application ids and token secrets must match.
///
/// The first and last characters must be alphanumeric; the characters in
/// between may also be `-`, `+`, `_` or `.`.
pub const FILE_NAME_PATTERN: &str = r"^[0-9A-Za-z](?:[-+_0-9A-Za-z.]*[0-9A-Za-z])?$";

static FILE_NAME_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(FILE_NAME_PATTERN).expect("Invalid regex pattern"));

/// Check whether a string is a valid file-name style identifier
///
/// # Examples
///
/// ```
/// use dogma_common::is_valid_file_name;
///
/// assert!(is_valid_file_name("my-app.v2"));
/// assert!(is_valid_file_name("a"));
/// assert!(!is_valid_file_name("-bad-"));
/// assert!(!is_valid_file_name("trailing."));
/// ```
pub fn is_valid_file_name(value: &str) -> bool {
    FILE_NAME_REGEX.is_match(value)
}

/// Validate an identifier, returning it unchanged on success
pub fn validate_file_name<'a>(value: &'a str, param: &str) -> Result<&'a str> {
    if is_valid_file_name(value) {
        Ok(value)
    } else {
        Err(DogmaError::InvalidFileName {
            param: param.to_string(),
            value: value.to_string(),
            pattern: FILE_NAME_PATTERN,
        })
    }
}
