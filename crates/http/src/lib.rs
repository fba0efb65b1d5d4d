//! An embeddable HTTP/1.1 server core
//!
//! This crate implements the protocol layer of an HTTP/1.1 server on top of
//! tokio: it frames requests out of an untrusted byte stream, parses them
//! against the HTTP request grammar, normalizes the result, hands it to an
//! application [`Handler`](handler::Handler) and writes the handler's
//! response back, including the chunked transfer coding in both directions.
//!
//! # Features
//!
//! - Line-oriented request framing with bounded reads
//! - A grammar-driven request parser covering origin-form, absolute-form
//!   and `*` targets, path parameters, queries and fragments
//! - Request normalization (absolute paths, default ports, folded headers)
//! - Raw and chunked body streams
//! - Response serialization with text, date and list header values
//! - A small TCP accept loop with a connection limit
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use http::StatusCode;
//! use http_body_util::Full;
//! use httpd_core::handler::Handler;
//! use httpd_core::protocol::{NormalizedRequest, ResponseSpec};
//! use httpd_core::server::Server;
//! use httpd_core::stream::Stream;
//! use std::convert::Infallible;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl Handler for HelloWorld {
//!     type RespBody = Full<Bytes>;
//!     type Error = Infallible;
//!
//!     async fn call(&self, request: NormalizedRequest, _body: &mut Stream<'_>) -> Result<ResponseSpec, Infallible> {
//!         let body = format!("Hello World! you asked for {}\r\n", request.uri.path.unwrap_or_default());
//!         Ok(ResponseSpec::full(StatusCode::OK, body.clone()).header("Content-Length", body.len()))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::builder().address("127.0.0.1:8080").handler(HelloWorld).build().expect("valid server config");
//!     if let Err(e) = server.start().await {
//!         eprintln!("server stopped: {e}");
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: request, response and error types
//! - [`codec`]: framing, parsing, normalization and response serialization
//! - [`stream`]: the transport abstraction and the raw/chunked body streams
//! - [`connection`]: drives one connection through its request/response cycle
//! - [`handler`]: the application callback trait
//! - [`server`]: a TCP accept loop
//!
//! # Error Handling
//!
//! - [`protocol::FramingError`]: the request head could not be delimited
//! - [`protocol::ParseError`]: the request head does not match the grammar
//! - [`protocol::TransportError`]: body or response I/O failed
//! - [`protocol::HttpError`]: any of the above, as returned by a connection
//!
//! Framing and parse failures are answered with `400 Bad Request`, handler
//! failures with `500 Internal Server Error`.
//!
//! # Limitations
//!
//! - HTTP/1.x only, one request per connection
//! - No TLS support (use a reverse proxy for HTTPS)
//! - Request heads are capped by [`codec::FrameLimits`], 8KB and 64 headers by default

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;
pub mod stream;

mod utils;
pub(crate) use utils::ensure;
