//! Address masking logic.
//!
//! - `classify` - parse an address and mask into a [`Subnet`](crate::models::Subnet)
//! - `masking` - the [`MaskingService`] the log layer calls per field

mod classify;
mod masking;

pub use classify::classify;
pub use masking::{MaskingService, CONNECTION_ADDRESS};
