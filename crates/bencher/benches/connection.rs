use std::convert::Infallible;
use std::hint::black_box;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use bencher::{request_heads, TestCase, POST_CHUNKED};
use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use http::StatusCode;
use http_body_util::Full;
use httpd_core::connection::HttpConnection;
use httpd_core::handler::Handler;
use httpd_core::protocol::{NormalizedRequest, ResponseSpec};
use httpd_core::stream::Stream;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::runtime::Builder;

// Mock IO for testing
#[derive(Clone)]
struct MockIO {
    read_data: &'static [u8],
    write_data: Vec<u8>,
    read_pos: usize,
}

impl MockIO {
    fn new(read_data: &'static [u8]) -> Self {
        Self { read_data, write_data: Vec::with_capacity(256), read_pos: 0 }
    }
}

impl AsyncRead for MockIO {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.read_data[self.read_pos..];
        let amt = std::cmp::min(remaining.len(), buf.remaining());
        buf.put_slice(&remaining[..amt]);
        self.read_pos += amt;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockIO {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, io::Error>> {
        self.write_data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }
}

// Test handler: drains the body, answers with a fixed text
struct HelloWorld;

#[async_trait]
impl Handler for HelloWorld {
    type RespBody = Full<Bytes>;
    type Error = Infallible;

    async fn call(&self, _request: NormalizedRequest, body: &mut Stream<'_>) -> Result<ResponseSpec, Infallible> {
        if body.is_chunked() {
            let _ = black_box(body.body().await);
        }
        Ok(ResponseSpec::full(StatusCode::OK, Bytes::from_static(b"Hello World!")).header("Content-Length", 12usize))
    }
}

fn benchmark_connection(criterion: &mut Criterion) {
    let runtime = Builder::new_current_thread().build().expect("failed to build tokio runtime");
    let handler = Arc::new(HelloWorld);

    let mut cases = request_heads();
    cases.push(TestCase::new("chunked", POST_CHUNKED));

    let mut group = criterion.benchmark_group("connection");
    for case in cases {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            b.iter_batched(
                || MockIO::new(case.file().content().as_bytes()),
                |io| {
                    runtime.block_on(async {
                        let connection = HttpConnection::new(io);
                        connection.process(Arc::clone(&handler)).await.expect("request should be served");
                    });
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(connection, benchmark_connection);
criterion_main!(connection);
