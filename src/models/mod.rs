//! Domain models for address masking.
//!
//! - [`MaskSpec`] - parsed mask specifier (prefix length or dotted netmask)
//! - [`Subnet`] - family-tagged masked address and mask bits
//! - [`RequestAddresses`] - per-request addresses handed in by the host

mod netmask;
mod request;
mod subnet;

// Re-export public types
pub use netmask::{
    get_cidr_mask, get_cidr_mask_v6, MaskSpec, DEFAULT_MASK, MAX_LENGTH_V4, MAX_LENGTH_V6,
};
pub use request::RequestAddresses;
pub use subnet::{Family, Subnet};
