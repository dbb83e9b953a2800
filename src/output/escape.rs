//! Escaping of untrusted text before it is written to a log line.

use std::borrow::Cow;
use std::fmt::Write;

/// Escape a log item so it cannot break or forge log lines.
///
/// Common control characters get their C escape (`\n`, `\t`, ...), quotes and
/// backslashes are backslash-escaped, and any other control or non-ASCII byte
/// becomes `\xhh`. Text needing no escape is returned borrowed.
///
/// # Examples
/// ```
/// use log_ipmask::output::escape_log_item;
/// assert_eq!(escape_log_item("host\n"), "host\\n");
/// ```
pub fn escape_log_item(item: &str) -> Cow<'_, str> {
    if !item.bytes().any(needs_escape) {
        return Cow::Borrowed(item);
    }

    let mut escaped = String::with_capacity(item.len() + 8);
    for b in item.bytes() {
        match b {
            b'\x08' => escaped.push_str("\\b"),
            b'\n' => escaped.push_str("\\n"),
            b'\r' => escaped.push_str("\\r"),
            b'\t' => escaped.push_str("\\t"),
            b'\x0b' => escaped.push_str("\\v"),
            b'\\' => escaped.push_str("\\\\"),
            b'"' => escaped.push_str("\\\""),
            b if needs_escape(b) => {
                // Writing to a String cannot fail
                let _ = write!(escaped, "\\x{b:02x}");
            }
            b => escaped.push(b as char),
        }
    }
    log::trace!("escape_log_item({item:?}) -> {escaped:?}");
    Cow::Owned(escaped)
}

fn needs_escape(b: u8) -> bool {
    !(0x20..0x7f).contains(&b) || b == b'"' || b == b'\\'
}
