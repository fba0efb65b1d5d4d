//! Body streams over a connection's transport.
//!
//! A [`Transport`] is the bidirectional byte channel of one connection: line
//! and fixed-length reads come from [`AsyncBufRead`], writes, flushes and the
//! final shutdown from [`AsyncWrite`]. A `tokio::io::BufReader` wrapped around
//! any socket-like `AsyncRead + AsyncWrite` type qualifies.
//!
//! Once the request head has been framed, the rest of the transport is
//! handed out as a [`Stream`]:
//!
//! - [`RawStream`]: bytes pass through untouched
//! - [`ChunkedStream`]: bytes are translated through the chunked coding
//!
//! A stream borrows the transport, so it cannot outlive the request it was
//! created for.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncBufRead, AsyncWrite};

mod chunked_stream;
mod raw_stream;

pub use chunked_stream::ChunkedStream;
pub use raw_stream::RawStream;

use crate::protocol::TransportError;

/// Read size used by [`Stream::read_chunk`] and [`Stream::body`].
pub const DEFAULT_READ_SIZE: usize = 4 * 1024;

/// The byte channel a connection runs on.
pub trait Transport: AsyncBufRead + AsyncWrite + Unpin + Send {}

impl<T> Transport for T where T: AsyncBufRead + AsyncWrite + Unpin + Send + ?Sized {}

/// The request body of one exchange, as handed to the handler.
#[derive(Debug)]
pub enum Stream<'io> {
    Raw(RawStream<'io>),
    Chunked(ChunkedStream<'io>),
}

impl<'io> Stream<'io> {
    /// Picks the stream kind for a request body.
    pub fn new(io: &'io mut dyn Transport, chunked: bool) -> Self {
        if chunked {
            Stream::Chunked(ChunkedStream::new(io))
        } else {
            Stream::Raw(RawStream::new(io))
        }
    }

    pub fn is_chunked(&self) -> bool {
        matches!(self, Stream::Chunked(_))
    }

    /// Reads at most `max` bytes; `None` means the body is over.
    pub async fn read(&mut self, max: usize) -> Result<Option<Bytes>, TransportError> {
        match self {
            Stream::Raw(stream) => stream.read(max).await,
            Stream::Chunked(stream) => stream.read(max).await,
        }
    }

    /// Reads up to [`DEFAULT_READ_SIZE`] bytes.
    pub async fn read_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        self.read(DEFAULT_READ_SIZE).await
    }

    /// Reads the rest of the body into memory.
    ///
    /// A raw body ends when the peer closes its sending side; use
    /// [`read`](Self::read) with the request's `Content-Length` when the peer
    /// keeps the connection open.
    pub async fn body(&mut self) -> Result<Bytes, TransportError> {
        let mut body = BytesMut::new();
        while let Some(chunk) = self.read_chunk().await? {
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }

    pub async fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        match self {
            Stream::Raw(stream) => stream.write(data).await,
            Stream::Chunked(stream) => stream.write(data).await,
        }
    }

    pub async fn close(&mut self) -> Result<(), TransportError> {
        match self {
            Stream::Raw(stream) => stream.close().await,
            Stream::Chunked(stream) => stream.close().await,
        }
    }
}
