//! HTTP Range request parsing module
//!
//! Single `bytes=` ranges only; multi-range requests are answered in full.

/// Inclusive byte range within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn content_length(&self) -> usize {
        self.end - self.start + 1
    }
}

/// What a `Range` header asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No header, malformed or multi-range: send the whole file
    Full,
    /// Send 206 with this slice
    Partial(ByteRange),
    /// Send 416
    Unsatisfiable,
}

/// Parse a `Range` header against a file of `file_size` bytes
///
/// # Examples
/// ```
/// use frontdesk::http::range::{parse_range, ByteRange, RangeOutcome};
///
/// assert_eq!(parse_range(Some("bytes=0-99"), 1000), RangeOutcome::Partial(ByteRange { start: 0, end: 99 }));
/// assert_eq!(parse_range(Some("bytes=-100"), 1000), RangeOutcome::Partial(ByteRange { start: 900, end: 999 }));
/// assert_eq!(parse_range(Some("bytes=1000-"), 1000), RangeOutcome::Unsatisfiable);
/// assert_eq!(parse_range(None, 1000), RangeOutcome::Full);
/// ```
pub fn parse_range(header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((start, end)) = spec.trim().split_once('-') else {
        return RangeOutcome::Full;
    };

    match (start.trim(), end.trim()) {
        // bytes=-suffix
        ("", suffix) => match suffix.parse::<usize>() {
            Ok(0) => RangeOutcome::Unsatisfiable,
            Ok(_) if file_size == 0 => RangeOutcome::Unsatisfiable,
            Ok(n) => RangeOutcome::Partial(ByteRange {
                start: file_size.saturating_sub(n),
                end: file_size - 1,
            }),
            Err(_) => RangeOutcome::Full,
        },
        // bytes=start- or bytes=start-end
        (start, end) => {
            let Ok(start) = start.parse::<usize>() else {
                return RangeOutcome::Full;
            };
            let end = if end.is_empty() {
                None
            } else {
                match end.parse::<usize>() {
                    Ok(e) if e >= start => Some(e),
                    _ => return RangeOutcome::Full,
                }
            };
            if start >= file_size {
                return RangeOutcome::Unsatisfiable;
            }
            let last = file_size - 1;
            RangeOutcome::Partial(ByteRange {
                start,
                end: end.map_or(last, |e| e.min(last)),
            })
        }
    }
}
