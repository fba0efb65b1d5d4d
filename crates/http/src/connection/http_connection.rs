use std::error::Error;
use std::fmt::Display;
use std::future::poll_fn;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;

use bytes::Bytes;
use http_body::Body;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadBuf};
use tracing::{debug, error, info, trace, warn};

use crate::codec::{normalize, parse_request, read_frame, write_response, FrameLimits};
use crate::handler::Handler;
use crate::protocol::{HttpError, ResponseSpec};
use crate::stream::Stream;

/// Read buffer size of a connection; large enough for a default-sized head.
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Upper bound of unread request bytes discarded before shutdown.
const MAX_DRAIN_BYTES: usize = 64 * 1024;

/// Where a connection is in its single request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Framing,
    Parsing,
    Normalized,
    Dispatched,
    Responding,
    Closed,
}

/// One accepted connection serving exactly one request.
///
/// `HttpConnection` drives the whole exchange:
/// - frames and parses the request head, answering `400 Bad Request` when
///   either step fails
/// - normalizes the request and hands it to the [`Handler`] together with a
///   body [`Stream`] matching the request's transfer coding
/// - writes the handler's response, or `500 Internal Server Error` when the
///   handler fails
/// - shuts the transport down
///
/// # Type Parameters
///
/// * `S`: the socket-like byte stream, read through an internal buffer
pub struct HttpConnection<S> {
    io: BufReader<S>,
    limits: FrameLimits,
    state: State,
}

impl<S> HttpConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self::with_limits(stream, FrameLimits::default())
    }

    pub fn with_limits(stream: S, limits: FrameLimits) -> Self {
        Self { io: BufReader::with_capacity(READ_BUFFER_SIZE, stream), limits, state: State::Idle }
    }

    /// Serves one request, then closes the connection.
    ///
    /// # Errors
    ///
    /// Framing and parse errors are returned after the `400` response went
    /// out. Transport errors abandon the response. A peer that closes before
    /// sending anything is not an error.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
        <H::RespBody as Body>::Error: Display,
    {
        let result = self.serve(handler.as_ref()).await;

        self.enter(State::Closed);
        if !matches!(result, Err(HttpError::Transport { .. })) {
            self.drain_unread().await;
        }
        if let Err(e) = self.io.shutdown().await {
            debug!(cause = %e, "shutdown after response failed");
        }

        result
    }

    async fn serve<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler,
        <H::RespBody as Body>::Error: Display,
    {
        self.enter(State::Framing);
        let frame = match read_frame(&mut self.io, &self.limits).await {
            Ok(frame) => frame,
            Err(e) if e.is_closed() => {
                info!("connection closed before sending a request");
                return Ok(());
            }
            Err(e) => {
                warn!(cause = %e, "can't frame request");
                self.respond(ResponseSpec::bad_request()).await?;
                return Err(e.into());
            }
        };

        self.enter(State::Parsing);
        let parsed = match parse_request(&frame) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(cause = %e, "can't parse request");
                self.respond(ResponseSpec::bad_request()).await?;
                return Err(e.into());
            }
        };

        self.enter(State::Normalized);
        let request = normalize(parsed);
        info!(method = %request.method, path = ?request.uri.path, "receive request");

        self.enter(State::Dispatched);
        let chunked = request.is_chunked();
        let result = {
            let mut body = Stream::new(&mut self.io, chunked);
            handler.call(request, &mut body).await
        };

        match result {
            Ok(response) => self.respond(response).await,
            Err(e) => {
                let cause: Box<dyn Error + Send + Sync> = e.into();
                error!(cause = %cause, "handle request error");
                self.respond(ResponseSpec::internal_error()).await
            }
        }
    }

    async fn respond<B>(&mut self, response: ResponseSpec<B>) -> Result<(), HttpError>
    where
        B: Body<Data = Bytes> + Unpin,
        B::Error: Display,
    {
        self.enter(State::Responding);
        let status = response.status;
        let outcome = write_response(&mut self.io, response).await?;
        debug!(status = status.as_u16(), ?outcome, "response sent");
        Ok(())
    }

    /// Discards request bytes the handler left unread, such as chunked
    /// trailers, so closing the socket does not reset the connection under
    /// the response. Only bytes that are already available are taken; this
    /// never waits for the peer.
    async fn drain_unread(&mut self) {
        let mut scratch = [0u8; 1024];
        let mut drained = 0;

        while drained < MAX_DRAIN_BYTES {
            let mut buf = ReadBuf::new(&mut scratch);
            let polled = poll_fn(|cx| match Pin::new(&mut self.io).poll_read(cx, &mut buf) {
                Poll::Ready(result) => Poll::Ready(Some(result)),
                Poll::Pending => Poll::Ready(None),
            })
            .await;

            match polled {
                Some(Ok(())) if !buf.filled().is_empty() => drained += buf.filled().len(),
                _ => break,
            }
        }

        if drained > 0 {
            debug!(size = drained, "skip unread request bytes");
        }
    }

    fn enter(&mut self, state: State) {
        trace!(from = ?self.state, to = ?state, "connection state");
        self.state = state;
    }
}

impl<S> std::fmt::Debug for HttpConnection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection").field("limits", &self.limits).field("state", &self.state).finish_non_exhaustive()
    }
}
