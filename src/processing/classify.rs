//! Address classification.
//!
//! Turns an address string and a mask specifier into a [`Subnet`].

use crate::error::ClassifyError;
use crate::models::{MaskSpec, Subnet, DEFAULT_MASK};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Classify `address` and apply `mask` to it.
///
/// An empty `mask` means [`DEFAULT_MASK`]. The address is checked before the
/// mask, so a host name is reported as [`ClassifyError::NotAnAddress`] even
/// when the mask is also malformed.
///
/// # Examples
/// ```
/// use log_ipmask::processing::classify;
/// let subnet = classify("192.168.1.77", "24").unwrap();
/// assert_eq!(subnet.ipv4_octets(), Some([192, 168, 1, 0]));
/// ```
pub fn classify(address: &str, mask: &str) -> Result<Subnet, ClassifyError> {
    let mask = if mask.is_empty() { DEFAULT_MASK } else { mask };

    let addr = parse_address(address)?;
    let spec: MaskSpec = mask.parse()?;

    let subnet = match addr {
        IpAddr::V4(v4) => Subnet::from_ipv4(v4, spec.bits_v4()?),
        IpAddr::V6(v6) => Subnet::from_ipv6(v6, spec.bits_v6()?),
    };
    log::trace!("classify({address}, {spec}) -> {subnet}");
    Ok(subnet)
}

/// Text containing a colon is taken as IPv6; text of only digits and dots
/// as IPv4. Anything else is a host name.
fn looks_like_ip(s: &str) -> bool {
    s.contains(':') || s.bytes().all(|b| b == b'.' || b.is_ascii_digit())
}

fn parse_address(s: &str) -> Result<IpAddr, ClassifyError> {
    if !looks_like_ip(s) {
        return Err(ClassifyError::NotAnAddress);
    }
    if s.contains(':') {
        s.parse::<Ipv6Addr>()
            .map(IpAddr::V6)
            .map_err(|_| ClassifyError::invalid(format!("invalid IPv6 address {s:?}")))
    } else {
        s.parse::<Ipv4Addr>()
            .map(IpAddr::V4)
            .map_err(|_| ClassifyError::invalid(format!("invalid IPv4 address {s:?}")))
    }
}
