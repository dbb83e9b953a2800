//! Offline anonymization of existing log files.

use crate::config::{Config, FilterMode};
use crate::output::escape_log_item;
use crate::processing::MaskingService;
use colored::Colorize;
use regex::{bytes, Captures, Regex};
use std::borrow::Cow;
use std::error::Error;
use std::io::{BufRead, Write};
use std::sync::OnceLock;

/// ASCII word-bounded IPv4 dotted quad with octets 0-255.
const IPV4_PATTERN: &str = r"(?-u:\b)(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])(?-u:\b)";

static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();
static IPV4_BYTES_REGEX: OnceLock<bytes::Regex> = OnceLock::new();

fn get_ipv4_regex() -> &'static Regex {
    IPV4_REGEX.get_or_init(|| Regex::new(IPV4_PATTERN).expect("Invalid Regex"))
}

fn get_ipv4_bytes_regex() -> &'static bytes::Regex {
    IPV4_BYTES_REGEX.get_or_init(|| bytes::Regex::new(IPV4_PATTERN).expect("Invalid Regex"))
}

/// A match at `start..end` is part of a longer dotted number run, e.g. the
/// `1.2.3.4` in `1.2.3.4.5`. `\b` alone treats the dot as a boundary.
fn is_embedded(line: &[u8], start: usize, end: usize) -> bool {
    let before = start >= 2 && line[start - 1] == b'.' && line[start - 2].is_ascii_digit();
    let after = end + 1 < line.len() && line[end] == b'.' && line[end + 1].is_ascii_digit();
    before || after
}

/// Line counters for one filter run.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FilterStats {
    /// Lines read.
    pub lines: usize,
    /// Lines whose text changed.
    pub masked: usize,
}

/// Applies a [`MaskingService`] to log lines.
#[derive(Debug)]
pub struct LineFilter<'a> {
    service: &'a MaskingService,
    mask: &'a str,
    mode: FilterMode,
    escape: bool,
}

impl<'a> LineFilter<'a> {
    pub fn new(service: &'a MaskingService, config: &'a Config) -> LineFilter<'a> {
        LineFilter {
            service,
            mask: &config.mask,
            mode: config.mode,
            escape: config.escape,
        }
    }

    /// Filter one line, without its line terminator.
    pub fn filter_line<'l>(&self, line: &'l str) -> Cow<'l, str> {
        match self.mode {
            FilterMode::Field => self.filter_first_field(line),
            FilterMode::Scan => get_ipv4_regex().replace_all(line, |caps: &Captures| {
                match caps.get(0) {
                    Some(found) if is_embedded(line.as_bytes(), found.start(), found.end()) => {
                        found.as_str().to_string()
                    }
                    Some(found) => self.service.mask_for_log(found.as_str(), self.mask).into_owned(),
                    None => String::new(),
                }
            }),
        }
    }

    /// Filter one line that is not valid UTF-8.
    ///
    /// Addresses are plain ASCII, so they are masked in place and every
    /// other byte is written back untouched.
    pub fn filter_raw_line<'l>(&self, line: &'l [u8]) -> Cow<'l, [u8]> {
        match self.mode {
            FilterMode::Field => {
                let (field, rest) = match line.iter().position(|b| *b == b' ') {
                    Some(i) => (&line[..i], &line[i..]),
                    None => (line, &line[line.len()..]),
                };
                let Ok(field) = std::str::from_utf8(field) else {
                    return Cow::Borrowed(line);
                };
                match self.filter_first_field(field) {
                    Cow::Borrowed(_) => Cow::Borrowed(line),
                    Cow::Owned(masked) => {
                        let mut out = masked.into_bytes();
                        out.extend_from_slice(rest);
                        Cow::Owned(out)
                    }
                }
            }
            FilterMode::Scan => {
                get_ipv4_bytes_regex().replace_all(line, |caps: &bytes::Captures| {
                    let Some(found) = caps.get(0) else {
                        return Vec::new();
                    };
                    match std::str::from_utf8(found.as_bytes()) {
                        Ok(addr) if !is_embedded(line, found.start(), found.end()) => self
                            .service
                            .mask_for_log(addr, self.mask)
                            .into_owned()
                            .into_bytes(),
                        _ => found.as_bytes().to_vec(),
                    }
                })
            }
        }
    }

    fn filter_first_field<'l>(&self, line: &'l str) -> Cow<'l, str> {
        let (field, rest) = match line.split_once(' ') {
            Some((field, rest)) => (field, Some(rest)),
            None => (line, None),
        };

        let masked = if self.escape {
            match escape_log_item(field) {
                Cow::Borrowed(field) => self.service.mask_for_log(field, self.mask),
                Cow::Owned(field) => {
                    Cow::Owned(self.service.mask_for_log(&field, self.mask).into_owned())
                }
            }
        } else {
            self.service.mask_for_log(field, self.mask)
        };

        match (masked, rest) {
            (Cow::Borrowed(_), _) => Cow::Borrowed(line),
            (Cow::Owned(masked), None) => Cow::Owned(masked),
            (Cow::Owned(masked), Some(rest)) => Cow::Owned(format!("{masked} {rest}")),
        }
    }

    /// Filter every line of `reader` into `writer`, keeping line terminators.
    pub fn filter_stream<R, W>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> Result<FilterStats, Box<dyn Error>>
    where
        R: BufRead,
        W: Write,
    {
        let mut stats = FilterStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| format!("Error reading line {}: {e}", stats.lines + 1))?;
            if n == 0 {
                break;
            }
            stats.lines += 1;

            let (body, eol) = split_eol(&buf);
            let filtered: Cow<[u8]> = match std::str::from_utf8(body) {
                Ok(text) => match self.filter_line(text) {
                    Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
                    Cow::Owned(text) => Cow::Owned(text.into_bytes()),
                },
                Err(_) => {
                    log::debug!("line {} is not UTF-8, filtering raw bytes", stats.lines);
                    self.filter_raw_line(body)
                }
            };
            if *filtered != *body {
                stats.masked += 1;
            }
            log::trace!(
                "line {}: {}",
                stats.lines,
                String::from_utf8_lossy(&filtered).dimmed()
            );

            writer
                .write_all(&filtered)
                .and_then(|_| writer.write_all(eol))
                .map_err(|e| format!("Error writing line {}: {e}", stats.lines))?;
        }
        writer.flush().map_err(|e| format!("Error flushing output: {e}"))?;

        log::debug!("filter_stream() done {stats:?}");
        Ok(stats)
    }
}

/// Split a line into its body and its `\n` or `\r\n` terminator.
fn split_eol(line: &[u8]) -> (&[u8], &[u8]) {
    let body = line.strip_suffix(b"\n").map_or(line, |body| {
        body.strip_suffix(b"\r").unwrap_or(body)
    });
    line.split_at(body.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mask: &str, mode: FilterMode) -> Config {
        Config {
            mask: mask.to_string(),
            mode,
            ..Config::default()
        }
    }

    #[test]
    fn test_field_mode() {
        let service = MaskingService::new();
        let config = config("16", FilterMode::Field);
        let filter = LineFilter::new(&service, &config);
        assert_eq!(
            filter.filter_line(r#"10.20.30.40 - - "GET http://10.20.30.40/""#),
            r#"10.20.0.0 - - "GET http://10.20.30.40/""#
        );
        assert_eq!(filter.filter_line("10.20.30.40"), "10.20.0.0");
    }

    #[test]
    fn test_field_mode_pass_through_is_borrowed() {
        let service = MaskingService::new();
        let config = config("", FilterMode::Field);
        let filter = LineFilter::new(&service, &config);
        let line = "client.example.org - - [18/Oct/2026] \"GET /\"";
        assert!(matches!(filter.filter_line(line), Cow::Borrowed(_)));
        assert_eq!(filter.filter_line(""), "");
    }

    #[test]
    fn test_field_mode_escape() {
        let service = MaskingService::new();
        let config = Config {
            escape: true,
            ..config("24", FilterMode::Field)
        };
        let filter = LineFilter::new(&service, &config);
        assert_eq!(filter.filter_line("bad\"host rest"), "bad\\\"host rest");
        assert_eq!(filter.filter_line("192.168.1.77 rest"), "192.168.1.0 rest");
    }

    #[test]
    fn test_scan_mode() {
        let service = MaskingService::new();
        let config = config("24", FilterMode::Scan);
        let filter = LineFilter::new(&service, &config);
        assert_eq!(
            filter.filter_line("from 192.168.1.77 via 10.0.0.254, host example.org"),
            "from 192.168.1.0 via 10.0.0.0, host example.org"
        );
        assert_eq!(
            filter.filter_line("version 1.2.3 build 2026"),
            "version 1.2.3 build 2026"
        );
    }

    #[test]
    fn test_scan_mode_ignores_out_of_range() {
        let service = MaskingService::new();
        let config = config("8", FilterMode::Scan);
        let filter = LineFilter::new(&service, &config);
        assert_eq!(filter.filter_line("ip=999.1.1.1"), "ip=999.1.1.1");
    }

    #[test]
    fn test_split_eol() {
        assert_eq!(split_eol(b"abc\n"), (&b"abc"[..], &b"\n"[..]));
        assert_eq!(split_eol(b"abc\r\n"), (&b"abc"[..], &b"\r\n"[..]));
        assert_eq!(split_eol(b"abc"), (&b"abc"[..], &b""[..]));
        assert_eq!(split_eol(b"abc\r"), (&b"abc\r"[..], &b""[..]));
        assert_eq!(split_eol(b"\n"), (&b""[..], &b"\n"[..]));
    }

    #[test]
    fn test_filter_stream() {
        let service = MaskingService::new();
        let config = config("24", FilterMode::Field);
        let filter = LineFilter::new(&service, &config);
        let input = "192.168.1.77 a\r\nexample.org b\n10.1.2.3 c";
        let mut output = Vec::new();
        let stats = filter
            .filter_stream(input.as_bytes(), &mut output)
            .expect("Error filtering stream");
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "192.168.1.0 a\r\nexample.org b\n10.1.2.0 c"
        );
        assert_eq!(stats, FilterStats { lines: 3, masked: 2 });
    }

    #[test]
    fn test_scan_mode_skips_longer_dotted_runs() {
        let service = MaskingService::new();
        let config = config("24", FilterMode::Scan);
        let filter = LineFilter::new(&service, &config);
        assert_eq!(filter.filter_line("lib 1.2.3.4.5 loaded"), "lib 1.2.3.4.5 loaded");
        assert_eq!(filter.filter_line("oid 9.1.2.3.4"), "oid 9.1.2.3.4");
        assert_eq!(
            filter.filter_line("peer 10.1.2.3. Done at 10.1.2.3.x"),
            "peer 10.1.2.0. Done at 10.1.2.0.x"
        );
    }

    #[test]
    fn test_filter_stream_non_utf8_line() {
        let service = MaskingService::new();
        let config = config("24", FilterMode::Field);
        let filter = LineFilter::new(&service, &config);
        let input = b"192.168.1.77 a\n10.0.0.1 ua=\xe9t\xe9\n10.9.8.7 c\n";
        let mut output = Vec::new();
        let stats = filter
            .filter_stream(&input[..], &mut output)
            .expect("Non UTF-8 line should not abort the stream");
        assert_eq!(
            output,
            b"192.168.1.0 a\n10.0.0.0 ua=\xe9t\xe9\n10.9.8.0 c\n".to_vec()
        );
        assert_eq!(stats, FilterStats { lines: 3, masked: 3 });
    }

    #[test]
    fn test_filter_raw_line_scan_mode() {
        let service = MaskingService::new();
        let config = config("16", FilterMode::Scan);
        let filter = LineFilter::new(&service, &config);
        assert_eq!(
            filter.filter_raw_line(b"ua=\xe9 from 172.16.5.4 and 1.2.3.4.5"),
            &b"ua=\xe9 from 172.16.0.0 and 1.2.3.4.5"[..]
        );
        let untouched: &[u8] = b"no address \xff here";
        assert!(matches!(filter.filter_raw_line(untouched), Cow::Borrowed(_)));
    }
}
