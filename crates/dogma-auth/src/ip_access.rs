//! CIDR validation, matching, and rule evaluation
//!
//! Rules are evaluated in order and the first rule whose range contains the
//! client address decides the outcome. When no rule matches, or there are no
//! rules at all, access is allowed.

use std::net::IpAddr;

use ipnet::IpNet;

use crate::model::IpAccessControlRule;

/// Errors raised while validating or matching CIDR notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpAccessError {
    #[error("CIDR cannot be empty")]
    EmptyCidr,

    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("Invalid IP address in CIDR: {0}")]
    InvalidCidrAddress(String),

    #[error("Invalid prefix length in CIDR: {0}")]
    InvalidPrefixFormat(String),

    #[error("Invalid prefix length {prefix} for {family} address: {addr}")]
    PrefixOutOfRange {
        prefix: i64,
        family: &'static str,
        addr: String,
    },

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),
}

fn max_prefix_len(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn family(addr: &IpAddr) -> &'static str {
    match addr {
        IpAddr::V4(_) => "IPv4",
        IpAddr::V6(_) => "IPv6",
    }
}

/// Validate a CIDR string and return its normalized form
///
/// Surrounding whitespace is ignored. A bare address gets a host prefix
/// (`/32` or `/128`). Host bits are kept as written.
///
/// ```
/// use dogma_auth::validate_cidr;
///
/// assert_eq!(validate_cidr("10.0.0.1").unwrap(), "10.0.0.1/32");
/// assert_eq!(validate_cidr(" 2001:db8::/32 ").unwrap(), "2001:db8::/32");
/// assert!(validate_cidr("10.0.0.0/33").is_err());
/// ```
pub fn validate_cidr(cidr: &str) -> Result<String, IpAccessError> {
    let trimmed = cidr.trim();
    if trimmed.is_empty() {
        return Err(IpAccessError::EmptyCidr);
    }

    let Some((ip_part, prefix_part)) = trimmed.split_once('/') else {
        let addr: IpAddr = trimmed
            .parse()
            .map_err(|_| IpAccessError::InvalidAddress(trimmed.to_string()))?;
        return Ok(format!("{}/{}", trimmed, max_prefix_len(&addr)));
    };

    let addr: IpAddr = ip_part
        .parse()
        .map_err(|_| IpAccessError::InvalidCidrAddress(ip_part.to_string()))?;

    let prefix: i64 = prefix_part
        .parse()
        .map_err(|_| IpAccessError::InvalidPrefixFormat(prefix_part.to_string()))?;

    if prefix < 0 || prefix > i64::from(max_prefix_len(&addr)) {
        return Err(IpAccessError::PrefixOutOfRange {
            prefix,
            family: family(&addr),
            addr: ip_part.to_string(),
        });
    }

    Ok(format!("{}/{}", ip_part, prefix))
}

/// Parse an already-normalized `addr/prefix` string into a network
pub(crate) fn parse_network(cidr: &str) -> Result<IpNet, IpAccessError> {
    let (ip_part, prefix_part) = cidr
        .split_once('/')
        .ok_or_else(|| IpAccessError::InvalidCidr(cidr.to_string()))?;

    let addr: IpAddr = ip_part
        .parse()
        .map_err(|_| IpAccessError::InvalidCidr(cidr.to_string()))?;
    let prefix: u8 = prefix_part
        .parse()
        .map_err(|_| IpAccessError::InvalidCidr(cidr.to_string()))?;

    IpNet::new(addr, prefix).map_err(|_| IpAccessError::InvalidCidr(cidr.to_string()))
}

/// Check whether `addr` falls inside `cidr`
///
/// Addresses of a different family than the network never match.
pub fn matches_cidr(addr: IpAddr, cidr: &str) -> Result<bool, IpAccessError> {
    let network = parse_network(cidr)?;
    Ok(network.contains(&addr))
}

/// Check whether the textual address `ip` falls inside `cidr`
///
/// An address that does not parse matches nothing.
pub fn matches_cidr_str(ip: &str, cidr: &str) -> Result<bool, IpAccessError> {
    let network = parse_network(cidr)?;
    match ip.parse::<IpAddr>() {
        Ok(addr) => Ok(network.contains(&addr)),
        Err(_) => Ok(false),
    }
}

/// Return the first rule whose range contains `addr`
pub fn first_matching_rule(
    addr: IpAddr,
    rules: &[IpAccessControlRule],
) -> Option<&IpAccessControlRule> {
    rules.iter().find(|rule| rule.contains(addr))
}

/// Evaluate `rules` for `addr`; `true` means access is allowed
pub fn evaluate_ip_access_rules(addr: IpAddr, rules: &[IpAccessControlRule]) -> bool {
    first_matching_rule(addr, rules)
        .map(|rule| rule.action().is_allow())
        .unwrap_or(true)
}

/// Evaluate `rules` for a textual address
///
/// An address that does not parse matches no rule and is therefore allowed.
pub fn evaluate_ip_access_rules_str(ip: &str, rules: &[IpAccessControlRule]) -> bool {
    if rules.is_empty() {
        return true;
    }
    match ip.parse::<IpAddr>() {
        Ok(addr) => evaluate_ip_access_rules(addr, rules),
        Err(_) => true,
    }
}
