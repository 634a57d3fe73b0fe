//! Dogma Auth - Application tokens and IP access control
//!
//! This crate provides:
//! - CIDR validation and matching
//! - First-match-wins evaluation of per-token IP rules
//! - The application token model
//! - The application token authorizer

pub mod ip_access;
pub mod model;
pub mod service;

// Re-export commonly used types
pub use ip_access::{
    IpAccessError, evaluate_ip_access_rules, evaluate_ip_access_rules_str, first_matching_rule,
    matches_cidr, matches_cidr_str, validate_cidr,
};
pub use model::*;
