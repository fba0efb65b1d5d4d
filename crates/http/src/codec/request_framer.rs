//! Request framing: cutting one request head out of the byte stream.
//!
//! The framer works line by line on a buffered reader and knows only three
//! kinds of line:
//!
//! - the request line, which must contain `HTTP/`
//! - header lines, which must contain `": "` or `":\t"`
//! - the blank line `\r\n`, which ends the frame
//!
//! Anything else is rejected before the grammar parser ever sees it. The
//! framer never reads past the blank line, so whatever follows (the body)
//! stays in the reader for the request stream.
//!
//! # Limits
//!
//! Peers are untrusted, so every read is bounded by [`FrameLimits`]: a single
//! line, the whole head and the number of header lines are all capped.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::trace;

use crate::ensure;
use crate::protocol::FramingError;

/// Default maximum length of one line, CRLF included.
pub const DEFAULT_MAX_LINE_BYTES: usize = 8 * 1024;

/// Default maximum size of the whole request head.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 8 * 1024;

/// Default maximum number of header lines.
pub const DEFAULT_MAX_HEADERS: usize = 64;

/// Bounds applied while framing a request head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    pub max_line_bytes: usize,
    pub max_frame_bytes: usize,
    pub max_headers: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            max_headers: DEFAULT_MAX_HEADERS,
        }
    }
}

/// Reads one complete request head from `reader`.
///
/// On success the returned bytes run from the first byte of the request line
/// up to and including the terminating blank line.
///
/// # Errors
///
/// - [`FramingError::Closed`] when the peer closed before sending anything
/// - [`FramingError::Incomplete`] when it closed in the middle of the head
/// - [`FramingError::NotRequestLine`] / [`FramingError::MalformedHeaderLine`]
///   when a line has the wrong shape
/// - a limit error when one of the [`FrameLimits`] is exceeded
pub async fn read_frame<R>(reader: &mut R, limits: &FrameLimits) -> Result<Bytes, FramingError>
where
    R: AsyncBufRead + Unpin,
{
    let mut frame = BytesMut::with_capacity(512);
    let mut header_count = 0;

    loop {
        let line_start = frame.len();
        let remaining = limits.max_frame_bytes.saturating_sub(line_start);
        // one extra byte tells "exactly at the limit" apart from "over it"
        let budget = limits.max_line_bytes.min(remaining) + 1;

        let mut line = Vec::new();
        let n = (&mut *reader).take(budget as u64).read_until(b'\n', &mut line).await?;

        if n == 0 {
            return Err(if line_start == 0 { FramingError::Closed } else { FramingError::Incomplete });
        }

        if !line.ends_with(b"\n") {
            ensure!(n < budget, over_limit(line_start + n, limits));
            // the reader hit end of stream in the middle of a line
            return Err(FramingError::Incomplete);
        }

        ensure!(n <= limits.max_line_bytes, FramingError::line_too_long(limits.max_line_bytes));
        ensure!(line_start + n <= limits.max_frame_bytes, FramingError::too_large(line_start + n, limits.max_frame_bytes));

        frame.extend_from_slice(&line);

        if line_start == 0 {
            ensure!(contains(&line, b"HTTP/"), FramingError::NotRequestLine);
            continue;
        }

        if line == b"\r\n" {
            trace!(size = frame.len(), headers = header_count, "request head framed");
            return Ok(frame.freeze());
        }

        ensure!(contains(&line, b": ") || contains(&line, b":\t"), FramingError::MalformedHeaderLine);

        header_count += 1;
        ensure!(header_count <= limits.max_headers, FramingError::too_many_headers(limits.max_headers));
    }
}

fn over_limit(current_size: usize, limits: &FrameLimits) -> FramingError {
    if current_size > limits.max_frame_bytes {
        FramingError::too_large(current_size, limits.max_frame_bytes)
    } else {
        FramingError::line_too_long(limits.max_line_bytes)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
