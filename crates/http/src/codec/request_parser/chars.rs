//! Character classes of the request grammar.
//!
//! The classes follow RFC 2616 section 2.2 and the URI classes used by the
//! Mongrel family of parsers (`safe`, `extra`, `national`, ...). Every class
//! is a single-byte predicate; multi-byte elements such as percent escapes
//! are productions in the parent module.

#[inline]
pub(crate) const fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
pub(crate) const fn is_xdigit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline]
pub(crate) const fn is_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

#[inline]
pub(crate) const fn is_alnum(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

#[inline]
pub(crate) const fn is_ctl(b: u8) -> bool {
    b < 0x20 || b == 0x7f
}

#[inline]
pub(crate) const fn is_lws(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}

/// Any octet except controls, but including LWS.
#[inline]
pub(crate) const fn is_text(b: u8) -> bool {
    b == b'\t' || (b >= 0x20 && b < 0x7f)
}

#[inline]
pub(crate) const fn is_safe(b: u8) -> bool {
    matches!(b, b'$' | b'-' | b'_' | b'.')
}

#[inline]
pub(crate) const fn is_extra(b: u8) -> bool {
    matches!(b, b'!' | b'*' | b'\'' | b'(' | b')' | b',')
}

#[inline]
pub(crate) const fn is_reserved(b: u8) -> bool {
    matches!(b, b';' | b'/' | b'?' | b':' | b'@' | b'&' | b'=' | b'+')
}

#[inline]
pub(crate) const fn is_sorta_safe(b: u8) -> bool {
    matches!(b, b'"' | b'<' | b'>')
}

#[inline]
pub(crate) const fn is_unsafe(b: u8) -> bool {
    is_ctl(b) || matches!(b, b' ' | b'#' | b'%') || is_sorta_safe(b)
}

/// Octets outside every other URI class: `[ \ ] ^ { | } ~` and backtick, plus
/// all non-ASCII octets.
#[inline]
pub(crate) const fn is_national(b: u8) -> bool {
    !(is_alpha(b) || is_digit(b) || is_reserved(b) || is_extra(b) || is_safe(b) || is_unsafe(b))
}

#[inline]
pub(crate) const fn is_unreserved(b: u8) -> bool {
    is_alpha(b) || is_digit(b) || is_safe(b) || is_extra(b) || is_national(b)
}

#[inline]
pub(crate) const fn is_separator(b: u8) -> bool {
    is_lws(b)
        || matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}'
        )
}

#[inline]
pub(crate) const fn is_token(b: u8) -> bool {
    b.is_ascii() && !is_ctl(b) && !is_separator(b)
}

#[inline]
pub(crate) const fn is_scheme_char(b: u8) -> bool {
    is_alpha(b) || is_digit(b) || matches!(b, b'+' | b'-' | b'.')
}

#[inline]
pub(crate) const fn is_host_char(b: u8) -> bool {
    is_alnum(b) || matches!(b, b'-' | b'_' | b'.')
}

/// Single-octet members of the user-info production; escapes are handled
/// by the production itself.
#[inline]
pub(crate) const fn is_user_info_char(b: u8) -> bool {
    is_unreserved(b) || matches!(b, b';' | b':' | b'&' | b'=' | b'+')
}

/// Single-octet members of `pchar` besides `uchar`.
#[inline]
pub(crate) const fn is_pchar_extra(b: u8) -> bool {
    matches!(b, b':' | b'@' | b'&' | b'=' | b'+')
}
