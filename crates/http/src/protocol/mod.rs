//! Core HTTP protocol data model.
//!
//! This module holds the records that flow through a request/response cycle
//! and the errors that can interrupt it. It contains no I/O.
//!
//! # Components
//!
//! - **Parsed requests** (`request`): the grammar parser's output
//!   - [`ParsedRequest`]: method, target, version and headers in arrival order
//!   - [`RequestTarget`]: the `*` marker or a structured [`Uri`]
//!   - [`HttpVersion`]: the `major.minor` digit pair
//!
//! - **Normalized requests** (`normalized`): what handlers receive
//!   - [`NormalizedRequest`]: defaulted URI, folded headers
//!   - [`HeaderFields`] / [`FieldValue`]: header name to one or many values
//!
//! - **Responses** (`response`): what handlers return
//!   - [`ResponseSpec`]: status, [`ResponseHeaders`] and a body producer
//!   - [`HeaderValue`]: text, timestamp or list header values
//!
//! - **Errors** (`error`):
//!   - [`HttpError`]: top-level error type
//!   - [`FramingError`]: the request head could not be delimited
//!   - [`ParseError`]: the request head does not match the grammar
//!   - [`TransportError`]: reading or writing a body failed

mod request;
pub use request::Header;
pub use request::HttpVersion;
pub use request::Method;
pub use request::ParsedRequest;
pub use request::RequestTarget;
pub use request::Uri;

mod normalized;
pub(crate) use normalized::is_chunked;
pub use normalized::FieldValue;
pub use normalized::HeaderFields;
pub use normalized::NormalizedRequest;

mod response;
pub use response::HeaderValue;
pub use response::ResponseHeaders;
pub use response::ResponseSpec;

mod error;
pub use error::FramingError;
pub use error::HttpError;
pub use error::ParseError;
pub use error::TransportError;
