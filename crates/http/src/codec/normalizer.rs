//! Canonicalization of parsed requests.
//!
//! The parser keeps exactly what was on the wire; the normalizer turns that
//! into the shape handlers work with:
//!
//! - the `*` target becomes an empty [`Uri`]
//! - the path gets its leading `/` back, and an absent path becomes `/`
//! - an absolute-form target without a port gets the scheme's default port
//! - headers are folded by case-insensitive name into [`HeaderFields`]
//!
//! Normalization is total: every [`ParsedRequest`] has a normal form, and
//! normalizing an already normalized request changes nothing.

use crate::protocol::{HeaderFields, NormalizedRequest, ParsedRequest, RequestTarget, Uri};

/// Turns a parsed request into its normal form.
pub fn normalize(request: ParsedRequest) -> NormalizedRequest {
    let ParsedRequest { method, uri, version, headers } = request;

    let uri = match uri {
        RequestTarget::Asterisk => Uri::default(),
        RequestTarget::Uri(uri) => normalize_uri(uri),
    };

    NormalizedRequest { method, uri, version, headers: headers.into_iter().collect::<HeaderFields>() }
}

impl From<ParsedRequest> for NormalizedRequest {
    fn from(request: ParsedRequest) -> Self {
        normalize(request)
    }
}

impl NormalizedRequest {
    /// Applies the URI rules once more.
    ///
    /// This is a no-op for anything produced by [`normalize`]; it exists so
    /// hand-built requests can be brought into the same shape. An empty URI
    /// is left alone because it stands for the `*` target.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !self.uri.is_empty() {
            self.uri = normalize_uri(self.uri);
        }
        self
    }
}

fn normalize_uri(mut uri: Uri) -> Uri {
    uri.path = Some(match uri.path.take() {
        None => "/".to_owned(),
        Some(path) if path.starts_with('/') => path,
        Some(path) => format!("/{path}"),
    });

    if uri.port.is_none() {
        uri.port = uri.scheme.as_deref().and_then(default_port);
    }

    uri
}

/// Well-known ports, looked up ASCII case-insensitively.
fn default_port(scheme: &str) -> Option<u16> {
    const DEFAULT_PORTS: [(&str, u16); 2] = [("http", 80), ("https", 443)];

    DEFAULT_PORTS.iter().find(|(name, _)| name.eq_ignore_ascii_case(scheme)).map(|&(_, port)| port)
}
