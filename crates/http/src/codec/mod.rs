//! Turning bytes into requests and responses into bytes.
//!
//! A request goes through three stages, each usable on its own:
//!
//! - [`read_frame`]: cuts one request head out of a buffered byte stream,
//!   checking only the shape of each line and the [`FrameLimits`]
//! - [`parse_request`]: matches the head against the HTTP request grammar,
//!   producing a [`ParsedRequest`](crate::protocol::ParsedRequest)
//! - [`normalize`]: canonicalizes the parsed request into a
//!   [`NormalizedRequest`](crate::protocol::NormalizedRequest)
//!
//! Responses go the other way through [`write_response`].
//!
//! # Example
//!
//! ```
//! use httpd_core::codec::{normalize, parse_request};
//!
//! let parsed = parse_request(b"GET /hello?name=world HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! let request = normalize(parsed);
//!
//! assert_eq!(request.uri.path.as_deref(), Some("/hello"));
//! assert_eq!(request.uri.query.as_deref(), Some("name=world"));
//! ```

mod normalizer;
mod request_framer;
mod request_parser;
mod response_writer;

pub use normalizer::normalize;
pub use request_framer::{read_frame, FrameLimits, DEFAULT_MAX_FRAME_BYTES, DEFAULT_MAX_HEADERS, DEFAULT_MAX_LINE_BYTES};
pub use request_parser::parse_request;
pub use response_writer::{write_response, WriteOutcome};
