use crate::protocol::ParseError;

/// A position over the frame being parsed.
///
/// Productions consume through the cursor and report failure by returning
/// `None`/`false`; the furthest failure and what was expected there are
/// remembered so the final [`ParseError`] points at the most useful place.
#[derive(Debug)]
pub(crate) struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    furthest: usize,
    expected: Option<&'static str>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0, furthest: 0, expected: None }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    #[inline]
    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Consumes `byte` if it is next.
    #[inline]
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        self.eat_if(|b| b == byte)
    }

    /// Consumes the next octet if it satisfies `class`.
    #[inline]
    pub(crate) fn eat_if(&mut self, class: impl Fn(u8) -> bool) -> bool {
        match self.peek() {
            Some(b) if class(b) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Consumes `literal` if the input continues with it.
    pub(crate) fn eat_slice(&mut self, literal: &[u8]) -> bool {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consumes octets while they satisfy `class`, returning how many.
    pub(crate) fn skip_while(&mut self, class: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.eat_if(&class) {}
        self.pos - start
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    /// Records that `expected` was required at the current position.
    pub(crate) fn expect(&mut self, expected: &'static str) {
        if self.expected.is_none() || self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected = Some(expected);
        }
    }

    /// Runs `production`, rewinding to the starting position if it fails.
    pub(crate) fn attempt<T>(&mut self, production: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        let result = production(self);
        if result.is_none() {
            self.pos = start;
        }
        result
    }

    pub(crate) fn error(&self) -> ParseError {
        ParseError::new(self.furthest, self.expected.unwrap_or("request line"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_rewinds_on_failure() {
        let mut cursor = Cursor::new(b"abc:");
        let result = cursor.attempt(|c| {
            c.skip_while(|b| b.is_ascii_alphabetic());
            c.eat(b'@').then_some(())
        });

        assert!(result.is_none());
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn furthest_failure_wins() {
        let mut cursor = Cursor::new(b"GET /");
        cursor.advance(3);
        cursor.expect("SP");
        cursor.reset(1);
        cursor.expect("token");

        assert_eq!(cursor.error(), ParseError::new(3, "SP"));
    }

    #[test]
    fn eat_slice_only_on_full_match() {
        let mut cursor = Cursor::new(b"HTTP/1.1");
        assert!(!cursor.eat_slice(b"HTTPS"));
        assert!(cursor.eat_slice(b"HTTP/"));
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.skip_while(|b| b.is_ascii_digit() || b == b'.'), 3);
        assert!(cursor.is_eof());
    }
}
