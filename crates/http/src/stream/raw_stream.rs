use std::fmt;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::protocol::TransportError;
use crate::stream::{DEFAULT_READ_SIZE, Transport};

/// Pass-through access to the bytes following the request head.
///
/// Reads return whatever the transport has, up to the requested size, and
/// report end of stream once the peer closed its side. Every write is
/// flushed immediately.
pub struct RawStream<'io> {
    io: &'io mut dyn Transport,
}

impl<'io> RawStream<'io> {
    pub fn new(io: &'io mut dyn Transport) -> Self {
        Self { io }
    }

    /// Reads at most `max` bytes; `None` means end of stream.
    ///
    /// A single call returns no more than [`DEFAULT_READ_SIZE`] bytes, so a
    /// peer-sized `max` such as a `Content-Length` is safe to pass.
    pub async fn read(&mut self, max: usize) -> Result<Option<Bytes>, TransportError> {
        if max == 0 {
            return Ok(Some(Bytes::new()));
        }

        let max = max.min(DEFAULT_READ_SIZE);
        let mut buf = BytesMut::with_capacity(max);
        let n = (&mut *self.io).take(max as u64).read_buf(&mut buf).await?;
        Ok((n > 0).then(|| buf.freeze()))
    }

    /// Writes and flushes `data`, returning the number of bytes written.
    pub async fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        self.io.write_all(data).await?;
        self.io.flush().await?;
        Ok(data.len())
    }

    /// Does nothing; raw bodies have no trailer.
    #[allow(clippy::unused_async, reason = "same signature as ChunkedStream::close")]
    pub async fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl fmt::Debug for RawStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MockIo;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn reads_until_end_of_stream() {
        let mut io = BufReader::new(MockIo::new(b"hello world"));
        let mut stream = RawStream::new(&mut io);

        assert_eq!(stream.read(5).await.unwrap().as_deref(), Some(&b"hello"[..]));
        assert_eq!(stream.read(64).await.unwrap().as_deref(), Some(&b" world"[..]));
        assert_eq!(stream.read(64).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unbounded_max_reads_what_is_there() {
        let mut io = BufReader::new(MockIo::new(b"hello"));
        let mut stream = RawStream::new(&mut io);

        assert_eq!(stream.read(usize::MAX).await.unwrap().as_deref(), Some(&b"hello"[..]));
        assert_eq!(stream.read(usize::MAX).await.unwrap(), None);
    }

    #[tokio::test]
    async fn one_read_is_capped() {
        let input = vec![b'a'; DEFAULT_READ_SIZE * 3];
        let mut io = BufReader::new(MockIo::new(&input));
        let mut stream = RawStream::new(&mut io);

        let chunk = stream.read(usize::MAX).await.unwrap().unwrap();
        assert!(!chunk.is_empty());
        assert!(chunk.len() <= DEFAULT_READ_SIZE);
    }

    #[tokio::test]
    async fn writes_are_flushed_through() {
        let mut io = BufReader::new(MockIo::new(b""));
        let mut stream = RawStream::new(&mut io);

        assert_eq!(stream.write(b"foo").await.unwrap(), 3);
        assert_eq!(stream.write(b"").await.unwrap(), 0);
        stream.close().await.unwrap();

        assert_eq!(io.get_ref().written(), b"foo");
        assert!(!io.get_ref().is_shutdown());
    }
}
