//! Response descriptions returned by application handlers.
//!
//! A [`ResponseSpec`] is plain data: a status, an ordered header mapping and a
//! body producer implementing [`http_body::Body`]. Turning it into bytes is
//! the job of [`write_response`](crate::codec::write_response).

use std::time::SystemTime;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;

/// A response header value.
///
/// - `Text` is written as is; embedded line breaks split it into one wire
///   header per line.
/// - `Date` is formatted as an HTTP-date.
/// - `List` is written as one wire header per element.
///
/// Values are never escaped, so callers must keep control characters (other
/// than the line breaks above) out of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Text(String),
    Date(SystemTime),
    List(Vec<String>),
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_owned())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<SystemTime> for HeaderValue {
    fn from(value: SystemTime) -> Self {
        HeaderValue::Date(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        HeaderValue::List(values)
    }
}

impl From<Vec<&str>> for HeaderValue {
    fn from(values: Vec<&str>) -> Self {
        HeaderValue::List(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<u64> for HeaderValue {
    fn from(value: u64) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<usize> for HeaderValue {
    fn from(value: usize) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

/// Response headers in insertion order.
///
/// Lookups ignore ASCII case; the name is written with the spelling it was
/// inserted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, HeaderValue)>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets `name` to `value`, replacing any previous value for that name.
    pub fn insert<N: Into<String>, V: Into<HeaderValue>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.entries.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<N: Into<String>, V: Into<HeaderValue>> FromIterator<(N, V)> for ResponseHeaders {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = ResponseHeaders::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Status, headers and body producer of one response.
#[derive(Debug)]
pub struct ResponseSpec<B = Full<Bytes>> {
    pub status: StatusCode,
    pub headers: ResponseHeaders,
    pub body: B,
}

impl<B> ResponseSpec<B> {
    pub fn new(status: StatusCode, body: B) -> Self {
        Self { status, headers: ResponseHeaders::new(), body }
    }

    #[must_use]
    pub fn header<N: Into<String>, V: Into<HeaderValue>>(mut self, name: N, value: V) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn map_body<T, F: FnOnce(B) -> T>(self, f: F) -> ResponseSpec<T> {
        ResponseSpec { status: self.status, headers: self.headers, body: f(self.body) }
    }
}

impl ResponseSpec<Full<Bytes>> {
    /// A response whose body is a single in-memory chunk.
    pub fn full<D: Into<Bytes>>(status: StatusCode, body: D) -> Self {
        Self::new(status, Full::new(body.into()))
    }

    /// The fixed reply to unframeable or unparseable requests.
    ///
    /// It carries no headers, so the connection is closed after the body.
    pub fn bad_request() -> Self {
        Self::full(StatusCode::BAD_REQUEST, Bytes::from_static(b"Bad Request"))
    }

    /// Sent in place of a handler's response when the handler fails.
    pub fn internal_error() -> Self {
        Self::full(StatusCode::INTERNAL_SERVER_ERROR, Bytes::from_static(b"Internal Server Error"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_case_insensitively() {
        let mut headers = ResponseHeaders::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("X-Count", 3usize);
        headers.insert("content-type", "text/html");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("CONTENT-TYPE"), Some(&HeaderValue::from("text/html")));
        assert_eq!(headers.iter().next().map(|(name, _)| name), Some("Content-Type"));
        assert_eq!(headers.get("x-count"), Some(&HeaderValue::Text("3".into())));
    }

    #[test]
    fn bad_request_has_no_headers() {
        let response = ResponseSpec::bad_request();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.headers.is_empty());
    }

    #[test]
    fn builder_style_headers() {
        let response = ResponseSpec::full(StatusCode::OK, "hi")
            .header("Content-Length", 2usize)
            .header("Vary", vec!["Accept", "Accept-Encoding"]);

        assert!(response.headers.contains_key("content-length"));
        assert_eq!(response.headers.get("Vary"), Some(&HeaderValue::List(vec!["Accept".into(), "Accept-Encoding".into()])));
    }
}
