//! The chunked transfer coding, in both directions.
//!
//! Reading follows the wire format of RFC 9112 section 7.1:
//!
//! ```text
//! chunk      = chunk-size [ ";" extensions ] CRLF chunk-data CRLF
//! last-chunk = "0" [ ";" extensions ] CRLF
//! ```
//!
//! Extensions are ignored. Nothing is read after the last-chunk line, so
//! trailers (if any) are left on the transport.

use std::fmt;
use std::io;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};
use tracing::trace;

use crate::protocol::TransportError;
use crate::stream::{DEFAULT_READ_SIZE, Transport};

/// Longest accepted chunk-size line, extensions and CRLF included.
const MAX_SIZE_LINE_BYTES: usize = 1024;

/// A [`Transport`] seen through the chunked transfer coding.
pub struct ChunkedStream<'io> {
    io: &'io mut dyn Transport,
    remaining: u64,
    finished: bool,
}

impl<'io> ChunkedStream<'io> {
    pub fn new(io: &'io mut dyn Transport) -> Self {
        Self { io, remaining: 0, finished: false }
    }

    /// Reads at most `max` bytes of chunk data.
    ///
    /// A read never spans two chunks and never returns more than
    /// [`DEFAULT_READ_SIZE`] bytes, whatever size the peer declared. `None` is
    /// returned once the last chunk has been seen, and on every call after
    /// that.
    pub async fn read(&mut self, max: usize) -> Result<Option<Bytes>, TransportError> {
        if self.finished {
            return Ok(None);
        }

        if self.remaining == 0 {
            self.remaining = self.read_size_line().await?;
            trace!(size = self.remaining, "chunk started");
            if self.remaining == 0 {
                self.finished = true;
                return Ok(None);
            }
        }

        let len = max.min(DEFAULT_READ_SIZE);
        let len = usize::try_from(self.remaining).map_or(len, |remaining| remaining.min(len));
        let mut buf = BytesMut::zeroed(len);
        self.io.read_exact(&mut buf).await?;
        self.remaining -= len as u64;

        if self.remaining == 0 {
            self.read_chunk_end().await?;
        }

        Ok(Some(buf.freeze()))
    }

    /// Writes `data` as one chunk and flushes it.
    ///
    /// Empty input writes nothing: a zero-size chunk would end the body.
    pub async fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        if data.is_empty() {
            return Ok(0);
        }

        let size_line = format!("{:X}\r\n", data.len());
        self.io.write_all(size_line.as_bytes()).await?;
        self.io.write_all(data).await?;
        self.io.write_all(b"\r\n").await?;
        self.io.flush().await?;
        Ok(data.len())
    }

    /// Writes the last chunk, ending the body.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.io.write_all(b"0\r\n\r\n").await?;
        self.io.flush().await?;
        Ok(())
    }

    async fn read_size_line(&mut self) -> Result<u64, TransportError> {
        let mut line = Vec::with_capacity(16);
        let n = (&mut *self.io).take(MAX_SIZE_LINE_BYTES as u64 + 1).read_until(b'\n', &mut line).await?;

        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "body ended before the last chunk").into());
        }

        let Some(line) = line.strip_suffix(b"\r\n") else {
            let reason = if n > MAX_SIZE_LINE_BYTES { "chunk size line too long" } else { "chunk size line without CRLF" };
            return Err(invalid_data(reason));
        };

        let size = line.split(|&b| b == b';').next().unwrap_or_default();
        parse_hex(size.trim_ascii()).ok_or_else(|| invalid_data("invalid chunk size"))
    }

    async fn read_chunk_end(&mut self) -> Result<(), TransportError> {
        let mut crlf = [0u8; 2];
        self.io.read_exact(&mut crlf).await?;
        if &crlf != b"\r\n" {
            return Err(invalid_data("chunk data not followed by CRLF"));
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkedStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedStream")
            .field("remaining", &self.remaining)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// Parses a non-empty run of hex digits, rejecting overflow.
fn parse_hex(digits: &[u8]) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }

    digits.iter().try_fold(0u64, |size, &b| {
        let digit = char::from(b).to_digit(16)?;
        size.checked_mul(16)?.checked_add(u64::from(digit))
    })
}

fn invalid_data(reason: &'static str) -> TransportError {
    TransportError::io(io::Error::new(io::ErrorKind::InvalidData, reason))
}
