//! Text output for the log line.
//!
//! - `render` - canonical dotted-decimal rendering of masked addresses
//! - `escape` - escaping of untrusted host text

mod escape;
mod render;

pub use escape::escape_log_item;
pub use render::render_ipv4;
