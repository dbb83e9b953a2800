//! Masked subnet data model.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family of a classified [`Subnet`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Family {
    Ipv4,
    Ipv6,
}

/// A family-tagged pair of masked network bits and mask bits.
///
/// Both are stored as four 32-bit words, most significant first. IPv4 uses
/// word 0 only and leaves the rest zero. `sub` is always `address & mask`,
/// computed when the subnet is built.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Subnet {
    family: Family,
    sub: [u32; 4],
    mask: [u32; 4],
}

impl Subnet {
    /// Build an IPv4 subnet from an address and a 32-bit mask.
    pub fn from_ipv4(addr: Ipv4Addr, mask: u32) -> Subnet {
        Subnet {
            family: Family::Ipv4,
            sub: [u32::from(addr) & mask, 0, 0, 0],
            mask: [mask, 0, 0, 0],
        }
    }

    /// Build an IPv6 subnet from an address and a 128-bit mask.
    pub fn from_ipv6(addr: Ipv6Addr, mask: u128) -> Subnet {
        Subnet {
            family: Family::Ipv6,
            sub: to_words(u128::from(addr) & mask),
            mask: to_words(mask),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Masked network address words.
    pub fn sub(&self) -> &[u32; 4] {
        &self.sub
    }

    /// Mask words.
    pub fn mask(&self) -> &[u32; 4] {
        &self.mask
    }

    /// The 4 network-order bytes of the masked address, for IPv4 only.
    pub fn ipv4_octets(&self) -> Option<[u8; 4]> {
        match self.family {
            Family::Ipv4 => Some(self.sub[0].to_be_bytes()),
            Family::Ipv6 => None,
        }
    }

    /// Masked network address.
    pub fn network(&self) -> IpAddr {
        match self.family {
            Family::Ipv4 => IpAddr::V4(Ipv4Addr::from(self.sub[0])),
            Family::Ipv6 => IpAddr::V6(Ipv6Addr::from(from_words(&self.sub))),
        }
    }

    /// Prefix length, if the mask is a contiguous run of leading ones.
    pub fn prefix_len(&self) -> Option<u8> {
        // IPv4 mask moved to the top of the word so both families count alike
        let bits = match self.family {
            Family::Ipv4 => u128::from(self.mask[0]) << 96,
            Family::Ipv6 => from_words(&self.mask),
        };
        let ones = bits.leading_ones();
        if bits.checked_shl(ones).unwrap_or(0) == 0 {
            Some(ones as u8)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Subnet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.prefix_len(), self.family) {
            (Some(len), _) => write!(f, "{}/{}", self.network(), len),
            (None, Family::Ipv4) => {
                write!(f, "{}/{}", self.network(), Ipv4Addr::from(self.mask[0]))
            }
            (None, Family::Ipv6) => {
                write!(f, "{}/{}", self.network(), Ipv6Addr::from(from_words(&self.mask)))
            }
        }
    }
}

fn to_words(bits: u128) -> [u32; 4] {
    [
        (bits >> 96) as u32,
        (bits >> 64) as u32,
        (bits >> 32) as u32,
        bits as u32,
    ]
}

fn from_words(words: &[u32; 4]) -> u128 {
    words
        .iter()
        .fold(0u128, |acc, w| (acc << 32) | u128::from(*w))
}
