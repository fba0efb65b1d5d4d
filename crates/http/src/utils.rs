//! Utility macros and test helpers used across the crate.

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
///
/// # Example
///
/// ```ignore
/// ensure!(header_count <= limits.max_headers, FramingError::too_many_headers(limits.max_headers));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

#[cfg(test)]
pub(crate) use mock_io::MockIo;

#[cfg(test)]
mod mock_io {
    use std::io;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex, MutexGuard};
    use std::task::{Context, Poll};

    use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

    /// In-memory transport: reads come from a fixed input, writes are recorded.
    ///
    /// Failures can be injected on either side: reads fail once the input is
    /// used up, writes fail once a byte budget is spent. Clones share the
    /// write side, so a clone kept aside still sees what was written after
    /// the original moved into a connection.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MockIo {
        read_data: Vec<u8>,
        read_pos: usize,
        read_error: Option<io::ErrorKind>,
        write_limit: Option<usize>,
        output: Arc<Mutex<Output>>,
    }

    #[derive(Debug, Default)]
    struct Output {
        data: Vec<u8>,
        shutdown: bool,
    }

    impl MockIo {
        pub(crate) fn new(read_data: &[u8]) -> Self {
            Self { read_data: read_data.to_vec(), ..Self::default() }
        }

        /// Fails reads with `kind` instead of reporting end of stream.
        pub(crate) fn fail_reads_at_end(mut self, kind: io::ErrorKind) -> Self {
            self.read_error = Some(kind);
            self
        }

        /// Accepts `limit` bytes in total, then fails writes with `BrokenPipe`.
        pub(crate) fn fail_writes_after(mut self, limit: usize) -> Self {
            self.write_limit = Some(limit);
            self
        }

        /// Input bytes not read yet.
        pub(crate) fn unread(&self) -> usize {
            self.read_data.len() - self.read_pos
        }

        pub(crate) fn written(&self) -> Vec<u8> {
            self.output().data.clone()
        }

        pub(crate) fn is_shutdown(&self) -> bool {
            self.output().shutdown
        }

        fn output(&self) -> MutexGuard<'_, Output> {
            self.output.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    impl AsyncRead for MockIo {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let remaining = &self.read_data[self.read_pos..];
            if remaining.is_empty()
                && let Some(kind) = self.read_error
            {
                return Poll::Ready(Err(kind.into()));
            }
            let amt = std::cmp::min(remaining.len(), buf.remaining());
            buf.put_slice(&remaining[..amt]);
            self.read_pos += amt;
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for MockIo {
        fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
            let mut output = self.output();
            if output.shutdown {
                return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
            }
            let amt = match self.write_limit {
                Some(limit) if output.data.len() >= limit => {
                    return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
                }
                Some(limit) => buf.len().min(limit - output.data.len()),
                None => buf.len(),
            };
            output.data.extend_from_slice(&buf[..amt]);
            Poll::Ready(Ok(amt))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            self.output().shutdown = true;
            Poll::Ready(Ok(()))
        }
    }
}
