//! Netmask construction from mask specifiers.
//!
//! A mask specifier is either a dotted-decimal netmask (e.g. `255.255.0.0`)
//! or a bare prefix length (e.g. `16`). [`MaskSpec`] holds the parsed form
//! and expands it to the bit mask of a given address family.

use crate::error::ClassifyError;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum prefix length for an IPv4 mask (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;

/// Maximum prefix length for an IPv6 mask (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// Mask used when the specifier is empty (a /24).
pub const DEFAULT_MASK: &str = "255.255.255.0";

/// Convert a prefix length to an IPv4 netmask as u32.
///
/// # Examples
/// ```
/// use log_ipmask::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, ClassifyError> {
    if len > MAX_LENGTH_V4 {
        Err(ClassifyError::invalid(format!(
            "prefix length {len} exceeds {MAX_LENGTH_V4}"
        )))
    } else {
        let right_len = MAX_LENGTH_V4 - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Convert a prefix length to an IPv6 netmask as u128.
pub fn get_cidr_mask_v6(len: u8) -> Result<u128, ClassifyError> {
    match len {
        0 => Ok(0),
        1..=MAX_LENGTH_V6 => Ok(u128::MAX << (MAX_LENGTH_V6 - len)),
        _ => Err(ClassifyError::invalid(format!(
            "prefix length {len} exceeds {MAX_LENGTH_V6}"
        ))),
    }
}

/// Parsed mask specifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MaskSpec {
    /// Number of leading bits to keep.
    Prefix(u8),
    /// Explicit IPv4 netmask, applied bitwise.
    Netmask(Ipv4Addr),
}

impl MaskSpec {
    /// Expand to a 32-bit IPv4 mask.
    pub fn bits_v4(&self) -> Result<u32, ClassifyError> {
        match self {
            MaskSpec::Prefix(len) => get_cidr_mask(*len),
            MaskSpec::Netmask(addr) => Ok(u32::from(*addr)),
        }
    }

    /// Expand to a 128-bit IPv6 mask. Only prefix lengths apply to IPv6.
    pub fn bits_v6(&self) -> Result<u128, ClassifyError> {
        match self {
            MaskSpec::Prefix(len) => get_cidr_mask_v6(*len),
            MaskSpec::Netmask(addr) => Err(ClassifyError::invalid(format!(
                "dotted netmask {addr} cannot mask an IPv6 address"
            ))),
        }
    }
}

impl FromStr for MaskSpec {
    type Err = ClassifyError;

    /// A specifier made only of digits is a prefix length, anything else
    /// must be a dotted-decimal netmask.
    fn from_str(s: &str) -> Result<MaskSpec, ClassifyError> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let len: u8 = s
                .parse()
                .map_err(|_| ClassifyError::invalid(format!("invalid prefix length {s}")))?;
            if len > MAX_LENGTH_V6 {
                return Err(ClassifyError::invalid(format!(
                    "prefix length {len} exceeds {MAX_LENGTH_V6}"
                )));
            }
            Ok(MaskSpec::Prefix(len))
        } else {
            let addr = Ipv4Addr::from_str(s)
                .map_err(|_| ClassifyError::invalid(format!("invalid netmask {s:?}")))?;
            Ok(MaskSpec::Netmask(addr))
        }
    }
}

impl std::fmt::Display for MaskSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MaskSpec::Prefix(len) => write!(f, "/{len}"),
            MaskSpec::Netmask(addr) => write!(f, "{addr}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_get_cidr_mask_v6() {
        assert_eq!(get_cidr_mask_v6(0).unwrap(), 0);
        assert_eq!(get_cidr_mask_v6(64).unwrap(), 0xFFFF_FFFF_FFFF_FFFF << 64);
        assert_eq!(get_cidr_mask_v6(128).unwrap(), u128::MAX);
        assert!(get_cidr_mask_v6(129).is_err());
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!("24".parse::<MaskSpec>().unwrap(), MaskSpec::Prefix(24));
        assert_eq!("0".parse::<MaskSpec>().unwrap(), MaskSpec::Prefix(0));
        assert_eq!("128".parse::<MaskSpec>().unwrap(), MaskSpec::Prefix(128));
    }

    #[test]
    fn test_parse_netmask() {
        assert_eq!(
            "255.255.0.0".parse::<MaskSpec>().unwrap(),
            MaskSpec::Netmask(Ipv4Addr::new(255, 255, 0, 0))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "999", "129", "255.255.255.999", "255.255.255", "/24", "+24", "abc"] {
            assert!(
                matches!(
                    bad.parse::<MaskSpec>(),
                    Err(ClassifyError::InvalidInput { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_prefix_too_long_for_ipv4() {
        let spec: MaskSpec = "64".parse().unwrap();
        assert!(spec.bits_v4().is_err());
        assert!(spec.bits_v6().is_ok());
    }

    #[test]
    fn test_netmask_not_for_ipv6() {
        let spec: MaskSpec = "255.255.255.0".parse().unwrap();
        assert_eq!(spec.bits_v4().unwrap(), 0xFFFFFF00);
        assert!(spec.bits_v6().is_err());
    }
}
