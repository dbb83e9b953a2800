//! Log file anonymization.
//!
//! - `filter` - line and stream filtering with a [`MaskingService`](crate::MaskingService)

mod filter;

pub use filter::{FilterStats, LineFilter};
