//! Masking of client IP addresses for access logs.
//!
//! The host log layer holds a [`MaskingService`] and calls it once per logged
//! address field. IPv4 literals are reduced to their network part using a
//! dotted netmask (`255.255.0.0`) or a prefix length (`16`); anything else
//! is written back unchanged.

pub mod config;
pub mod error;
pub mod logfile;
pub mod models;
pub mod output;
pub mod processing;

use std::borrow::Cow;

pub use error::ClassifyError;
pub use models::RequestAddresses;
pub use processing::MaskingService;

/// Mask `address` with `mask` using the default `/24` for an empty mask.
///
/// # Examples
/// ```
/// assert_eq!(log_ipmask::mask_for_log("10.20.30.40", "255.255.0.0"), "10.20.0.0");
/// ```
pub fn mask_for_log<'a>(address: &'a str, mask: &str) -> Cow<'a, str> {
    DEFAULT_SERVICE.mask_for_log(address, mask)
}

static DEFAULT_SERVICE: MaskingService = MaskingService::new();
