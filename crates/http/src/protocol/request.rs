//! Parsed request structures.
//!
//! These are the records produced by the grammar parser. Nothing here is
//! decoded or defaulted: URI components hold the exact bytes that appeared on
//! the wire (percent escapes included) and headers keep their arrival order.
//! See [`NormalizedRequest`](crate::protocol::NormalizedRequest) for the
//! canonicalized form handed to applications.

use std::fmt;

pub use http::Method;

/// The `major.minor` pair following `HTTP/` in the request line.
///
/// Any digit pair is accepted, so future versions such as `HTTP/2.0` parse
/// fine; deciding whether to serve them is up to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HttpVersion {
    major: u16,
    minor: u16,
}

impl HttpVersion {
    pub const HTTP_10: HttpVersion = HttpVersion::new(1, 0);
    pub const HTTP_11: HttpVersion = HttpVersion::new(1, 1);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u16 {
        self.major
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// A structured request URI.
///
/// Origin-form targets (`/path?query`) only ever fill `path`, `params`,
/// `query` and `fragment`; absolute-form targets also carry `scheme`,
/// `user_info`, `host` and `port`. `path` never includes the leading `/`
/// as parsed. The normalizer adds it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    pub scheme: Option<String>,
    pub user_info: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub params: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl Uri {
    /// Returns true when no component is set.
    ///
    /// After normalization an empty record is how the asterisk-form target
    /// (`OPTIONS * HTTP/1.1`) is represented.
    pub fn is_empty(&self) -> bool {
        self == &Uri::default()
    }
}

/// The request-uri production: either the `*` marker or a structured URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestTarget {
    Asterisk,
    Uri(Uri),
}

impl RequestTarget {
    pub fn is_asterisk(&self) -> bool {
        matches!(self, RequestTarget::Asterisk)
    }

    pub fn as_uri(&self) -> Option<&Uri> {
        match self {
            RequestTarget::Asterisk => None,
            RequestTarget::Uri(uri) => Some(uri),
        }
    }
}

/// A single `name: value` header line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// The grammar parser's output.
///
/// Headers are kept in arrival order with duplicates preserved, and names are
/// stored exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: Method,
    pub uri: RequestTarget,
    pub version: HttpVersion,
    pub headers: Vec<Header>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_display() {
        assert_eq!(HttpVersion::HTTP_11.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::new(2, 0).to_string(), "HTTP/2.0");
        assert!(HttpVersion::HTTP_10 < HttpVersion::HTTP_11);
    }

    #[test]
    fn empty_uri() {
        assert!(Uri::default().is_empty());

        let uri = Uri { path: Some("/".into()), ..Uri::default() };
        assert!(!uri.is_empty());
    }
}
