//! HTTP connection handling module
//!
//! This module drives one accepted connection through its request/response
//! cycle:
//!
//! ```text
//! Idle -> Framing -> Parsing -> Normalized -> Dispatched -> Responding -> Closed
//! ```
//!
//! A failure while framing or parsing skips straight to `Responding` with a
//! fixed `400 Bad Request`. Every connection serves a single request and is
//! closed afterwards.

mod http_connection;

pub use http_connection::HttpConnection;
