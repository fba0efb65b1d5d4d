//! Normalized request structures handed to application handlers.

use crate::protocol::request::{Header, HttpVersion, Method, Uri};

/// The value(s) collected for one header name.
///
/// A name seen once maps to `Single`; every repetition turns it into
/// `Multiple` holding all values in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Appends a repeated value, promoting `Single` to `Multiple`.
    pub fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(previous) => {
                let previous = std::mem::take(previous);
                *self = FieldValue::Multiple(vec![previous, value]);
            }
            FieldValue::Multiple(values) => values.push(value),
        }
    }

    /// Returns the value when the header appeared exactly once.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::Multiple(_) => None,
        }
    }

    /// The most recently received value.
    pub fn last(&self) -> &str {
        match self {
            FieldValue::Single(value) => value,
            // never empty: `Multiple` is only built from two or more values
            FieldValue::Multiple(values) => values.last().map_or("", String::as_str),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            FieldValue::Single(value) => std::slice::from_ref(value),
            FieldValue::Multiple(values) => values,
        };
        values.iter().map(String::as_str)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_owned())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Multiple(values.into_iter().map(str::to_owned).collect())
    }
}

/// Headers folded by name, in first-seen order.
///
/// Names are matched ASCII case-insensitively when folding and looking up,
/// but the key keeps the spelling of the first occurrence. Requests carry at
/// most a few dozen headers, so a vector beats hashing here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    entries: Vec<(String, FieldValue)>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a header, folding it into an existing entry of the same name.
    pub fn append(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
            Some((_, existing)) => existing.push(value),
            None => self.entries.push((name, FieldValue::Single(value))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<Header> for HeaderFields {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut fields = HeaderFields::new();
        for header in iter {
            fields.append(header.name, header.value);
        }
        fields
    }
}

/// Builds fields from pairs that are already folded; names are not merged.
impl<N: Into<String>, V: Into<FieldValue>> FromIterator<(N, V)> for HeaderFields {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let entries = iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect();
        HeaderFields { entries }
    }
}

/// A request after normalization.
///
/// Compared to [`ParsedRequest`](crate::protocol::ParsedRequest): the target
/// is always a [`Uri`] (the asterisk-form becomes an empty record), the path
/// is absolute, the port is defaulted from the scheme when possible, and
/// headers are folded into [`HeaderFields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub method: Method,
    pub uri: Uri,
    pub version: HttpVersion,
    pub headers: HeaderFields,
}

impl NormalizedRequest {
    pub fn header(&self, name: &str) -> Option<&FieldValue> {
        self.headers.get(name)
    }

    /// The declared body length, if a well-formed `Content-Length` is present.
    ///
    /// When the header is repeated the last value wins.
    pub fn content_length(&self) -> Option<u64> {
        self.header("Content-Length").and_then(|value| value.last().trim().parse().ok())
    }

    /// Returns true when the final transfer coding is `chunked`.
    ///
    /// refer: <https://www.rfc-editor.org/rfc/rfc9112.html#name-transfer-encoding>
    pub fn is_chunked(&self) -> bool {
        self.header("Transfer-Encoding").is_some_and(|value| is_chunked(value.last()))
    }
}

/// Checks whether `chunked` is the last coding of a Transfer-Encoding value.
pub(crate) fn is_chunked(value: &str) -> bool {
    value.rsplit(',').next().is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_is_chunked() {
        assert!(is_chunked("chunked"));
        assert!(is_chunked("gzip, chunked"));
        assert!(is_chunked("Chunked"));
        assert!(!is_chunked("chunked, gzip"));
        assert!(!is_chunked("gzip"));
        assert!(!is_chunked(""));
    }

    #[test]
    fn fold_repeated_values() {
        let mut value = FieldValue::Single("a".into());
        value.push("b".into());
        value.push("c".into());

        assert_eq!(value, FieldValue::from(vec!["a", "b", "c"]));
        assert_eq!(value.last(), "c");
        assert_eq!(value.as_single(), None);
        assert_eq!(value.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn keep_first_seen_name() {
        let fields: HeaderFields =
            vec![Header::new("X-Token", "1"), Header::new("Accept", "*/*"), Header::new("x-token", "2")].into_iter().collect();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.iter().map(|(name, _)| name).collect::<Vec<_>>(), vec!["X-Token", "Accept"]);
        assert_eq!(fields.get("X-TOKEN"), Some(&FieldValue::from(vec!["1", "2"])));
        assert_eq!(fields.get("accept").and_then(FieldValue::as_single), Some("*/*"));
        assert!(!fields.contains_key("Host"));
    }

    #[test]
    fn request_helpers() {
        let request = NormalizedRequest {
            method: Method::POST,
            uri: Uri { path: Some("/upload".into()), ..Uri::default() },
            version: HttpVersion::HTTP_11,
            headers: vec![("Content-Length", " 42 "), ("transfer-encoding", "gzip, chunked")].into_iter().collect(),
        };

        assert_eq!(request.content_length(), Some(42));
        assert!(request.is_chunked());
    }
}
