//! Masking of client addresses for log output.
//!
//! [`MaskingService`] is held by the host log layer and called once per
//! logged field. It never fails: anything it cannot mask is passed through.

use super::classify::classify;
use crate::error::ClassifyError;
use crate::models::{Family, RequestAddresses, DEFAULT_MASK};
use crate::output::{escape_log_item, render_ipv4};
use std::borrow::Cow;

/// Mask specifier that selects the raw connection address.
pub const CONNECTION_ADDRESS: &str = "c";

/// Stateless address masker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskingService {
    default_mask: Cow<'static, str>,
}

impl Default for MaskingService {
    fn default() -> Self {
        MaskingService::new()
    }
}

impl MaskingService {
    pub const fn new() -> MaskingService {
        MaskingService {
            default_mask: Cow::Borrowed(DEFAULT_MASK),
        }
    }

    /// Service that substitutes `mask` when a field has an empty specifier.
    pub fn with_default_mask(mask: impl Into<Cow<'static, str>>) -> MaskingService {
        MaskingService {
            default_mask: mask.into(),
        }
    }

    pub fn default_mask(&self) -> &str {
        &self.default_mask
    }

    /// Mask `address` with `mask` for writing to a log.
    ///
    /// Returns the masked dotted-decimal text for IPv4 literals. Host names,
    /// malformed input and IPv6 addresses come back unchanged.
    ///
    /// # Examples
    /// ```
    /// use log_ipmask::MaskingService;
    /// let service = MaskingService::new();
    /// assert_eq!(service.mask_for_log("192.168.1.77", "24"), "192.168.1.0");
    /// assert_eq!(service.mask_for_log("example.org", "24"), "example.org");
    /// ```
    pub fn mask_for_log<'a>(&self, address: &'a str, mask: &str) -> Cow<'a, str> {
        let mask = if mask.is_empty() {
            &*self.default_mask
        } else {
            mask
        };

        match classify(address, mask) {
            Err(ClassifyError::NotAnAddress) => {
                log::trace!("mask_for_log({address:?}) not an IP literal, kept");
                Cow::Borrowed(address)
            }
            Err(e) => {
                log::debug!("mask_for_log({address:?}, {mask:?}) {e}, kept");
                Cow::Borrowed(address)
            }
            Ok(subnet) => match (subnet.family(), subnet.ipv4_octets()) {
                (Family::Ipv4, Some(octets)) => Cow::Owned(render_ipv4(octets)),
                _ => {
                    // IPv6 masking is not implemented
                    log::trace!("mask_for_log({address:?}) not IPv4, kept");
                    Cow::Borrowed(address)
                }
            },
        }
    }

    /// Masked user-agent address of a request.
    ///
    /// The specifier `"c"` returns the connection peer address unmasked.
    pub fn remote_address_masked<'a>(
        &self,
        request: &'a RequestAddresses,
        mask: &str,
    ) -> Cow<'a, str> {
        if mask == CONNECTION_ADDRESS {
            return Cow::Borrowed(&request.client_ip);
        }
        self.mask_for_log(&request.useragent_ip, mask)
    }

    /// Masked remote host of a request.
    ///
    /// Uses the resolved host name when there is one, else the connection
    /// address. The value is escaped before masking; host names are logged
    /// escaped but otherwise unchanged.
    pub fn remote_host_masked<'a>(
        &self,
        request: &'a RequestAddresses,
        mask: &str,
    ) -> Cow<'a, str> {
        match escape_log_item(request.remote_host_or_ip()) {
            Cow::Borrowed(host) => self.mask_for_log(host, mask),
            Cow::Owned(host) => Cow::Owned(self.mask_for_log(&host, mask).into_owned()),
        }
    }
}
