//! Grammar-driven HTTP request parser.
//!
//! This module turns one complete request head (as delimited by the
//! [request framer](crate::codec::read_frame)) into a [`ParsedRequest`].
//! It is a batch parser: it never reads, never buffers, and either consumes
//! the whole frame or fails.
//!
//! # Grammar
//!
//! The productions mirror RFC 2616/9110 and the Mongrel-derived URI grammar:
//!
//! ```text
//! request       = request-line header* CRLF
//! request-line  = method SP request-uri SP "HTTP/" version CRLF
//! request-uri   = "*" | absolute-uri | absolute-path
//! absolute-uri  = scheme ":" ["//"] [user-info "@"] host [":" port] [path-part]
//! absolute-path = "/" [path] [";" params] ["?" query] ["#" fragment]
//! header        = token ":" LWS* header-value CRLF
//! ```
//!
//! Choices are ordered and repetitions are greedy, as in a PEG: once an
//! alternative matched, the parser does not come back to try the next one.
//!
//! Percent escapes (`%XX` and the legacy `%uXXXX`) are accepted wherever URI
//! characters are, but left encoded: what a decoded `%2F` means depends on
//! the consumer.
//!
//! Quoted strings and comments inside header values need no production of
//! their own here, every octet they may contain is already `TEXT`.

mod chars;
mod cursor;

use chars::{
    is_alpha, is_digit, is_host_char, is_lws, is_pchar_extra, is_reserved, is_scheme_char, is_sorta_safe, is_text,
    is_token, is_unreserved, is_user_info_char, is_xdigit,
};
use cursor::Cursor;

use crate::protocol::{Header, HttpVersion, Method, ParseError, ParsedRequest, RequestTarget, Uri};

/// Parses one request head.
///
/// `input` must be exactly one frame: request line, headers and the blank
/// line. Any trailing byte is an error, and no partially filled request is
/// ever returned.
pub fn parse_request(input: &[u8]) -> Result<ParsedRequest, ParseError> {
    let mut cursor = Cursor::new(input);
    match request(&mut cursor) {
        Some(request) if cursor.is_eof() => Ok(request),
        Some(_) => {
            cursor.expect("end of request");
            Err(cursor.error())
        }
        None => Err(cursor.error()),
    }
}

fn request(c: &mut Cursor<'_>) -> Option<ParsedRequest> {
    let method = method(c)?;
    literal(c, b' ', "SP")?;
    let uri = request_uri(c)?;
    literal(c, b' ', "SP")?;
    let version = http_version(c)?;
    crlf(c)?;

    let mut headers = Vec::new();
    while let Some(header) = c.attempt(header) {
        headers.push(header);
    }

    crlf(c)?;
    Some(ParsedRequest { method, uri, version, headers })
}

/// `1*20 UPPER | 1*token`.
///
/// Uppercase letters are token characters too, so the union is `1*token`.
fn method(c: &mut Cursor<'_>) -> Option<Method> {
    let start = c.pos();
    if c.skip_while(is_token) == 0 {
        c.expect("method");
        return None;
    }

    match Method::from_bytes(c.slice(start, c.pos())) {
        Ok(method) => Some(method),
        Err(_) => {
            c.reset(start);
            c.expect("method");
            None
        }
    }
}

fn request_uri(c: &mut Cursor<'_>) -> Option<RequestTarget> {
    if c.eat(b'*') {
        return Some(RequestTarget::Asterisk);
    }

    if let Some(uri) = c.attempt(absolute_uri) {
        return Some(RequestTarget::Uri(uri));
    }

    let mut uri = Uri::default();
    path_part(c, &mut uri, true)?;
    Some(RequestTarget::Uri(uri))
}

fn absolute_uri(c: &mut Cursor<'_>) -> Option<Uri> {
    let scheme = scheme(c)?;
    literal(c, b':', "':'")?;
    c.eat_slice(b"//");

    let user_info = c.attempt(|c| {
        let user_info = user_info(c)?;
        c.eat(b'@').then_some(user_info)
    });

    let host = host(c)?;
    let port = c.attempt(|c| if c.eat(b':') { port(c) } else { None });

    let mut uri = Uri { scheme: Some(scheme), user_info, host: Some(host), port, ..Uri::default() };
    path_part(c, &mut uri, false)?;
    Some(uri)
}

/// `["/" [path]] [";" params] ["?" query] ["#" fragment]`
///
/// The slash is mandatory for origin-form targets and optional after an
/// authority.
fn path_part(c: &mut Cursor<'_>, uri: &mut Uri, require_slash: bool) -> Option<()> {
    if c.eat(b'/') {
        uri.path = path(c);
    } else if require_slash {
        c.expect("'/'");
        return None;
    }

    if c.eat(b';') {
        let start = c.pos();
        while pchar(c) || c.eat(b'/') || c.eat(b';') {}
        uri.params = Some(capture(c, start));
    }

    if c.eat(b'?') {
        uri.query = Some(query_or_fragment(c));
    }

    if c.eat(b'#') {
        uri.fragment = Some(query_or_fragment(c));
    }

    Some(())
}

fn scheme(c: &mut Cursor<'_>) -> Option<String> {
    let start = c.pos();
    if !c.eat_if(is_alpha) {
        return None;
    }
    c.skip_while(is_scheme_char);
    Some(capture(c, start))
}

fn user_info(c: &mut Cursor<'_>) -> Option<String> {
    let start = c.pos();
    while c.eat_if(is_user_info_char) || escape(c) {}
    (c.pos() > start).then(|| capture(c, start))
}

fn host(c: &mut Cursor<'_>) -> Option<String> {
    let start = c.pos();
    if c.skip_while(is_host_char) == 0 {
        c.expect("host");
        return None;
    }
    Some(capture(c, start))
}

fn port(c: &mut Cursor<'_>) -> Option<u16> {
    number(c, "port number")
}

/// `pchar+ ("/" pchar*)*`, without the leading slash.
fn path(c: &mut Cursor<'_>) -> Option<String> {
    let start = c.pos();
    if !pchar(c) {
        return None;
    }

    while pchar(c) || c.eat(b'/') {}
    Some(capture(c, start))
}

fn query_or_fragment(c: &mut Cursor<'_>) -> String {
    let start = c.pos();
    while uchar(c) || c.eat_if(is_reserved) {}
    capture(c, start)
}

fn pchar(c: &mut Cursor<'_>) -> bool {
    uchar(c) || c.eat_if(is_pchar_extra)
}

fn uchar(c: &mut Cursor<'_>) -> bool {
    match c.peek() {
        Some(b) if is_unreserved(b) || is_sorta_safe(b) => {
            c.advance(1);
            true
        }
        Some(b'%') => {
            if uescape(c) || escape(c) {
                true
            } else {
                c.expect("percent-encoded octet");
                false
            }
        }
        _ => false,
    }
}

/// `"%" HEX HEX`
fn escape(c: &mut Cursor<'_>) -> bool {
    let matched = c.peek() == Some(b'%') && (1..=2).all(|i| c.peek_at(i).is_some_and(is_xdigit));
    if matched {
        c.advance(3);
    }
    matched
}

/// `"%u" HEX HEX HEX HEX`
fn uescape(c: &mut Cursor<'_>) -> bool {
    let matched =
        c.peek() == Some(b'%') && c.peek_at(1) == Some(b'u') && (2..=5).all(|i| c.peek_at(i).is_some_and(is_xdigit));
    if matched {
        c.advance(6);
    }
    matched
}

fn http_version(c: &mut Cursor<'_>) -> Option<HttpVersion> {
    if !c.eat_slice(b"HTTP/") {
        c.expect("'HTTP/'");
        return None;
    }

    let major = number(c, "major version")?;
    literal(c, b'.', "'.'")?;
    let minor = number(c, "minor version")?;
    Some(HttpVersion::new(major, minor))
}

fn header(c: &mut Cursor<'_>) -> Option<Header> {
    let start = c.pos();
    if c.skip_while(is_token) == 0 {
        c.expect("header name");
        return None;
    }
    let name = capture(c, start);

    literal(c, b':', "':'")?;
    c.skip_while(is_lws);

    let value_start = c.pos();
    if c.skip_while(is_text) == 0 {
        c.expect("header value");
        return None;
    }
    // trailing whitespace is not part of the field value
    let value = c.slice(value_start, c.pos()).trim_ascii_end();
    let value = String::from_utf8_lossy(value).into_owned();

    crlf(c)?;
    Some(Header { name, value })
}

/// `1*DIGIT` that fits in a `u16`.
fn number(c: &mut Cursor<'_>, expected: &'static str) -> Option<u16> {
    let start = c.pos();
    c.skip_while(is_digit);

    let digits = c.slice(start, c.pos());
    let parsed = std::str::from_utf8(digits).ok().and_then(|digits| digits.parse::<u16>().ok());
    if parsed.is_none() {
        c.reset(start);
        c.expect(expected);
    }
    parsed
}

fn literal(c: &mut Cursor<'_>, byte: u8, expected: &'static str) -> Option<()> {
    if c.eat(byte) {
        Some(())
    } else {
        c.expect(expected);
        None
    }
}

fn crlf(c: &mut Cursor<'_>) -> Option<()> {
    if c.eat_slice(b"\r\n") {
        Some(())
    } else {
        c.expect("CRLF");
        None
    }
}

/// Copies out the text consumed since `start`.
///
/// Only URI components may hold octets above 0x7F. Captures start and end
/// next to ASCII delimiters, so UTF-8 sequences are never cut; anything that
/// is not UTF-8 becomes U+FFFD.
fn capture(c: &Cursor<'_>, start: usize) -> String {
    String::from_utf8_lossy(c.slice(start, c.pos())).into_owned()
}
