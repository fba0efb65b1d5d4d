use std::time::SystemTime;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use http::StatusCode;
use http_body_util::Full;
use httpd_core::handler::Handler;
use httpd_core::protocol::{NormalizedRequest, ResponseSpec, TransportError};
use httpd_core::server::Server;
use httpd_core::stream::Stream;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match Server::builder().address("127.0.0.1:8080").handler(HelloWorld).build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server config");
            return;
        }
    };

    if let Err(e) = server.start().await {
        error!(cause = %e, "server stopped");
    }
}

struct HelloWorld;

#[async_trait]
impl Handler for HelloWorld {
    type RespBody = Full<Bytes>;
    type Error = TransportError;

    async fn call(&self, request: NormalizedRequest, body: &mut Stream<'_>) -> Result<ResponseSpec, Self::Error> {
        let content = read_body(&request, body).await?;
        info!(size = content.len(), "receiving request body");

        let mut text = format!(
            "Hello World!\r\nmethod: {}\r\npath: {}\r\nversion: {}\r\n",
            request.method,
            request.uri.path.as_deref().unwrap_or(""),
            request.version
        );
        if let Some(query) = &request.uri.query {
            text.push_str(&format!("query: {query}\r\n"));
        }
        for (name, value) in request.headers.iter() {
            text.push_str(&format!("{name}: {}\r\n", value.iter().collect::<Vec<_>>().join(", ")));
        }
        text.push_str(&format!("body: {} bytes\r\n", content.len()));

        Ok(ResponseSpec::full(StatusCode::OK, text.clone())
            .header("Content-Type", "text/plain")
            .header("Content-Length", text.len())
            .header("Date", SystemTime::now()))
    }
}

/// Reads a chunked body to its end, or exactly `Content-Length` bytes of a raw one.
async fn read_body(request: &NormalizedRequest, body: &mut Stream<'_>) -> Result<Bytes, TransportError> {
    if body.is_chunked() {
        return body.body().await;
    }

    let mut remaining = request.content_length().unwrap_or(0);
    let mut content = BytesMut::new();
    while remaining > 0 {
        let max = usize::try_from(remaining).unwrap_or(usize::MAX).min(64 * 1024);
        let Some(chunk) = body.read(max).await? else {
            break;
        };
        remaining = remaining.saturating_sub(chunk.len() as u64);
        content.extend_from_slice(&chunk);
    }
    Ok(content.freeze())
}
