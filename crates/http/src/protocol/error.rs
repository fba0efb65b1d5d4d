use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("framing error: {source}")]
    Framing {
        #[from]
        source: FramingError,
    },

    #[error("parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },
}

/// The request head could not be delimited on the byte stream.
///
/// I/O failures while framing are folded in here as well: once a read fails
/// the connection is unusable, so callers do not need to tell them apart.
#[derive(Error, Debug)]
pub enum FramingError {
    #[error("connection closed before any request byte was received")]
    Closed,

    #[error("connection closed in the middle of the request head")]
    Incomplete,

    #[error("first line is not a request line")]
    NotRequestLine,

    #[error("line is neither a header line nor the blank terminator")]
    MalformedHeaderLine,

    #[error("line exceeds the limit of {max_size} bytes")]
    LineTooLong { max_size: usize },

    #[error("request head size too large, current: {current_size} exceed the limit {max_size}")]
    TooLarge { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl FramingError {
    pub fn too_large(current_size: usize, max_size: usize) -> Self {
        Self::TooLarge { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn line_too_long(max_size: usize) -> Self {
        Self::LineTooLong { max_size }
    }

    /// Returns true when the peer went away without sending anything.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// The frame was delimited but does not match the request grammar.
///
/// `position` is the byte offset where the furthest production failed and
/// `expected` names that production. Both are meant for humans reading logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} at byte {position}")]
pub struct ParseError {
    position: usize,
    expected: &'static str,
}

impl ParseError {
    pub fn new(position: usize, expected: &'static str) -> Self {
        Self { position, expected }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn expected(&self) -> &'static str {
        self.expected
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl TransportError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
