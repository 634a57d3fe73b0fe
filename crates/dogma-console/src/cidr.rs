//! Console-side CIDR validation
//!
//! Deliberately narrower than the server: compressed IPv6 is only accepted as
//! `::` or `::1`, so `2001:db8::1` has to be entered in full 8-group form.

use std::sync::LazyLock;

use regex::Regex;

const IPV4_OCTET: &str = r"([0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])";
const IPV4_PREFIX: &str = r"(/([0-9]|[1-2][0-9]|3[0-2]))?";
const IPV6_PREFIX: &str = r"(/([0-9]|[1-9][0-9]|1[0-1][0-9]|12[0-8]))?";

static CIDR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        "^({o}\\.){{3}}{o}{p4}$|^([0-9a-fA-F]{{1,4}}:){{7}}[0-9a-fA-F]{{1,4}}{p6}$|^::1{p6}$|^::{p6}$",
        o = IPV4_OCTET,
        p4 = IPV4_PREFIX,
        p6 = IPV6_PREFIX,
    );
    Regex::new(&pattern).expect("Invalid CIDR regex pattern")
});

/// Whether `cidr` is an IP address or CIDR block the console accepts
///
/// Whitespace-only input is rejected; otherwise the input is matched as is, so
/// surrounding whitespace makes an address invalid.
///
/// ```
/// use dogma_console::is_valid_cidr;
///
/// assert!(is_valid_cidr("192.168.1.0/24"));
/// assert!(is_valid_cidr("192.168.1.1"));
/// assert!(!is_valid_cidr("10.0.0.1/33"));
/// assert!(!is_valid_cidr("2001:db8::1"));
/// ```
pub fn is_valid_cidr(cidr: &str) -> bool {
    if cidr.trim().is_empty() {
        return false;
    }
    CIDR_REGEX.is_match(cidr)
}
