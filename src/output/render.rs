//! Dotted-decimal rendering of masked IPv4 addresses.

use itertools::Itertools;

/// Render 4 address bytes as canonical dotted-decimal text.
///
/// Octets are written in order, in decimal without leading zeros, joined by
/// `.`. The result is at most 15 characters.
///
/// # Examples
/// ```
/// use log_ipmask::output::render_ipv4;
/// assert_eq!(render_ipv4([192, 168, 1, 0]), "192.168.1.0");
/// ```
pub fn render_ipv4(bytes: [u8; 4]) -> String {
    bytes.iter().join(".")
}
