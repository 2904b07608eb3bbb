//! Client Address Extraction
//!
//! Pure header precedence logic. Callers pass in the raw header values so
//! this module stays independent of the HTTP framework.

use crate::domain::value_objects::ClientAddress;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const REAL_IP_HEADER: &str = "x-real-ip";

/// Pick the client address from proxy header values.
///
/// Precedence, first match wins:
/// 1. first comma-separated token of `x-forwarded-for`, if non-empty
/// 2. `x-real-ip`, if non-empty
/// 3. the IPv4 loopback literal
pub fn extract_client_ip(forwarded_for: Option<&str>, real_ip: Option<&str>) -> ClientAddress {
    if let Some(first) = forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return ClientAddress::new(first);
    }

    if let Some(real) = real_ip.map(str::trim).filter(|s| !s.is_empty()) {
        return ClientAddress::new(real);
    }

    ClientAddress::loopback()
}
