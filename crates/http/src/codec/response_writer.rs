//! Response serialization.
//!
//! A [`ResponseSpec`] goes out in three steps:
//!
//! 1. the status line and header block are encoded into one buffer, written
//!    and flushed
//! 2. the body producer is drained frame by frame, each data frame written
//!    and flushed on its own so the producer's chunk boundaries survive
//! 3. if the caller gave the client no way to find the end of the body
//!    (neither `Content-Length` nor `Transfer-Encoding`), the transport is
//!    shut down
//!
//! When `Transfer-Encoding` ends in `chunked`, the body is written through a
//! chunked stream, last chunk included.

use std::fmt::Display;
use std::io;
use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};
use http::StatusCode;
use http_body::Body;
use http_body_util::BodyExt;
use httpdate::fmt_http_date;
use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::protocol::{is_chunked, HeaderValue, ResponseHeaders, ResponseSpec, TransportError};
use crate::stream::{Stream, Transport};

const INIT_HEAD_SIZE: usize = 1024;

/// What the serializer left behind on the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The response was self-delimiting; the transport is still open.
    KeepOpen,
    /// The transport was shut down to mark the end of the body.
    Closed,
}

/// Writes a complete response to `io`.
///
/// # Errors
///
/// Any I/O failure, or a body producer error (reported as
/// [`TransportError::InvalidBody`]). The response is abandoned half written
/// in both cases.
pub async fn write_response<B>(io: &mut dyn Transport, response: ResponseSpec<B>) -> Result<WriteOutcome, TransportError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Display,
{
    let ResponseSpec { status, headers, mut body } = response;

    let mut head = BytesMut::with_capacity(INIT_HEAD_SIZE);
    encode_head(status, &headers, &mut head)?;
    io.write_all(&head).await?;
    io.flush().await?;

    let chunked = match headers.get("Transfer-Encoding") {
        Some(HeaderValue::Text(value)) => is_chunked(value),
        Some(HeaderValue::List(values)) => values.last().is_some_and(|value| is_chunked(value)),
        _ => false,
    };

    let mut stream = Stream::new(&mut *io, chunked);
    loop {
        let data = match body.frame().await {
            Some(Ok(frame)) => match frame.into_data() {
                Ok(data) => data,
                // trailers have nowhere to go
                Err(_) => continue,
            },
            Some(Err(e)) => return Err(TransportError::invalid_body(format!("resolve response body error: {e}"))),
            None => break,
        };
        stream.write(&data).await?;
    }
    stream.close().await?;

    if headers.contains_key("Content-Length") || headers.contains_key("Transfer-Encoding") {
        return Ok(WriteOutcome::KeepOpen);
    }

    trace!(status = status.as_u16(), "response is not self-delimiting, shutting down");
    io.shutdown().await?;
    Ok(WriteOutcome::Closed)
}

/// Encodes the status line, the headers and the blank line into `dst`.
fn encode_head(status: StatusCode, headers: &ResponseHeaders, dst: &mut BytesMut) -> io::Result<()> {
    // unknown codes keep the separator and an empty reason
    let reason = status.canonical_reason().unwrap_or("");
    write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason)?;

    for (name, value) in headers.iter() {
        match value {
            HeaderValue::Text(text) => {
                for line in text.lines() {
                    put_header(dst, name, line.as_bytes());
                }
            }
            HeaderValue::Date(time) => put_header(dst, name, fmt_http_date(*time).as_bytes()),
            HeaderValue::List(values) => {
                for value in values {
                    put_header(dst, name, value.as_bytes());
                }
            }
        }
    }

    dst.put_slice(b"\r\n");
    Ok(())
}

fn put_header(dst: &mut BytesMut, name: &str, value: &[u8]) {
    dst.put_slice(name.as_bytes());
    dst.put_slice(b": ");
    dst.put_slice(value);
    dst.put_slice(b"\r\n");
}

struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MockIo;
    use http_body::Frame;
    use std::collections::VecDeque;
    use std::convert::Infallible;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::{Duration, SystemTime};
    use tokio::io::BufReader;

    /// A body producing a fixed sequence of chunks.
    struct Chunks(VecDeque<&'static str>);

    impl Body for Chunks {
        type Data = Bytes;
        type Error = Infallible;

        fn poll_frame(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
            Poll::Ready(self.0.pop_front().map(|chunk| Ok(Frame::data(Bytes::from_static(chunk.as_bytes())))))
        }
    }

    /// A body failing on its first frame.
    struct Broken;

    impl Body for Broken {
        type Data = Bytes;
        type Error = &'static str;

        fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Bytes>, &'static str>>> {
            Poll::Ready(Some(Err("boom")))
        }
    }

    async fn written<B>(response: ResponseSpec<B>) -> (String, WriteOutcome, bool)
    where
        B: Body<Data = Bytes> + Unpin,
        B::Error: Display,
    {
        let mut io = BufReader::new(MockIo::new(b""));
        let outcome = write_response(&mut io, response).await.unwrap();
        let wire = String::from_utf8(io.get_ref().written()).unwrap();
        (wire, outcome, io.get_ref().is_shutdown())
    }

    #[tokio::test]
    async fn self_delimited_response_keeps_the_transport_open() {
        let response = ResponseSpec::full(StatusCode::OK, "hello").header("Content-Length", 5usize);

        let (wire, outcome, shutdown) = written(response).await;

        assert_eq!(wire, "HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello");
        assert_eq!(outcome, WriteOutcome::KeepOpen);
        assert!(!shutdown);
    }

    #[tokio::test]
    async fn undelimited_response_closes_the_transport() {
        let (wire, outcome, shutdown) = written(ResponseSpec::bad_request()).await;

        assert_eq!(wire, "HTTP/1.1 400 Bad Request\r\n\r\nBad Request");
        assert_eq!(outcome, WriteOutcome::Closed);
        assert!(shutdown);
    }

    #[tokio::test]
    async fn unknown_status_has_an_empty_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let response = ResponseSpec::full(status, "").header("content-length", 0usize);

        let (wire, _, _) = written(response).await;

        assert_eq!(wire, "HTTP/1.1 599 \r\ncontent-length: 0\r\n\r\n");
    }

    #[tokio::test]
    async fn header_value_kinds() {
        let date = SystemTime::UNIX_EPOCH + Duration::from_secs(1_295_993_729);
        let response = ResponseSpec::full(StatusCode::OK, "")
            .header("Content-Length", 0usize)
            .header("Date", date)
            .header("Set-Cookie", "a=1\nb=2")
            .header("Vary", vec!["Accept", "Accept-Encoding"])
            .header("X-Empty", "");

        let (wire, _, _) = written(response).await;

        assert_eq!(
            wire,
            "HTTP/1.1 200 OK\r\n\
             Content-Length: 0\r\n\
             Date: Tue, 25 Jan 2011 22:15:29 GMT\r\n\
             Set-Cookie: a=1\r\n\
             Set-Cookie: b=2\r\n\
             Vary: Accept\r\n\
             Vary: Accept-Encoding\r\n\
             \r\n"
        );
    }

    #[tokio::test]
    async fn raw_body_keeps_producer_chunks() {
        let response = ResponseSpec::new(StatusCode::OK, Chunks(VecDeque::from(["foo", "", "bar"])));

        let (wire, outcome, _) = written(response).await;

        assert_eq!(wire, "HTTP/1.1 200 OK\r\n\r\nfoobar");
        assert_eq!(outcome, WriteOutcome::Closed);
    }

    #[tokio::test]
    async fn chunked_body() {
        let response = ResponseSpec::new(StatusCode::OK, Chunks(VecDeque::from(["foo", "", "hello"])))
            .header("Transfer-Encoding", "chunked");

        let (wire, outcome, shutdown) = written(response).await;

        assert_eq!(wire, "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nfoo\r\n5\r\nhello\r\n0\r\n\r\n");
        assert_eq!(outcome, WriteOutcome::KeepOpen);
        assert!(!shutdown);
    }

    #[tokio::test]
    async fn body_error_aborts_the_response() {
        let mut io = BufReader::new(MockIo::new(b""));
        let response = ResponseSpec::new(StatusCode::OK, Broken);

        let result = write_response(&mut io, response).await;

        assert!(matches!(result, Err(TransportError::InvalidBody { .. })));
        assert_eq!(io.get_ref().written(), b"HTTP/1.1 200 OK\r\n\r\n");
    }
}
