//! Byte source abstraction and the lookahead read buffer (spec §4.1).
//!
//! `ByteSource` is the single primitive a caller must supply: fill a page,
//! report how many bytes landed, zero means EOF. Both a file-like stream
//! and a complete in-memory byte slice satisfy it through one blanket
//! impl over `Read`, since `&[u8]` already implements `Read`.
//!
//! `ReadBuffer` layers the grammar's lookahead requirements on top: a
//! stable `current()` byte, `peek_n` that can look past the end of
//! whatever has been buffered so far without disturbing `current()`, and
//! `consume`/`eat_*` helpers that track line/column as they go. Bytes
//! already returned by `peek_n` are never evicted before `consume` walks
//! over them, so a grammar rule can look six bytes ahead, decide not to
//! match, and still consume byte-by-byte afterwards and see the same
//! values.

use crate::error::{TextPosition, TurtleError};
use std::io::Read;

/// One page's worth of bytes requested from the source per refill.
const PAGE: usize = 4096;

/// Sentinel returned by [`ReadBuffer::current`] once the source is
/// exhausted. `0xFF` cannot begin a well-formed UTF-8 sequence, so it
/// never collides with a legal content byte once the input has been
/// accepted as valid UTF-8.
pub const EOF: u8 = u8::max_value();

/// Fills a caller-provided page with up to `page.len()` bytes.
///
/// Implemented once, generically, over `Read` — a file handle, a TCP
/// stream, or an in-memory `&[u8]` (which already implements `Read`) all
/// work without a second trait to implement.
pub trait ByteSource {
    fn fill_page(&mut self, page: &mut [u8]) -> std::io::Result<usize>;
}

impl<R: Read> ByteSource for R {
    fn fill_page(&mut self, page: &mut [u8]) -> std::io::Result<usize> {
        let mut total = 0;
        while total < page.len() {
            match self.read(&mut page[total..])? {
                0 => break,
                n => total += n,
            }
        }
        Ok(total)
    }
}

/// Streaming read buffer with bounded lookahead (spec §4.1).
///
/// Internally this keeps every byte from the last compaction point
/// onward in one growable buffer rather than literally recycling two
/// fixed `PAGE`-sized pages: Rust's `Vec` already gives amortised O(1)
/// growth and the ownership model makes the C-style manual page-swap
/// bookkeeping unnecessary. The externally observable contract — a
/// peeked byte is never evicted before it is consumed, refills happen in
/// `PAGE`-sized chunks, EOF latches once a short read returns zero — is
/// unchanged. See DESIGN.md for the tradeoff.
pub struct ReadBuffer<S> {
    source: S,
    buf: Vec<u8>,
    head: usize,
    eof: bool,
    position: TextPosition,
}

impl<S: ByteSource> ReadBuffer<S> {
    pub fn new(source: S, filename: impl Into<String>) -> Result<Self, TurtleError> {
        let mut buffer = ReadBuffer {
            source,
            buf: Vec::with_capacity(2 * PAGE),
            head: 0,
            eof: false,
            position: TextPosition::start(filename),
        };
        buffer.fill_to(1)?;
        Ok(buffer)
    }

    fn fill_to(&mut self, n: usize) -> Result<(), TurtleError> {
        while !self.eof && self.buf.len() - self.head < n {
            let mut page = [0u8; PAGE];
            let read = self.source.fill_page(&mut page)?;
            if read == 0 {
                self.eof = true;
            } else {
                self.buf.extend_from_slice(&page[..read]);
            }
        }
        if self.head > 2 * PAGE {
            self.buf.drain(0..self.head);
            self.head = 0;
        }
        Ok(())
    }

    /// The byte at the read head, or [`EOF`] once input is exhausted.
    pub fn current(&self) -> u8 {
        if self.head < self.buf.len() {
            self.buf[self.head]
        } else {
            EOF
        }
    }

    pub fn position(&self) -> &TextPosition {
        &self.position
    }

    /// Advances past `current()`. Fails once EOF has latched.
    pub fn consume(&mut self) -> Result<(), TurtleError> {
        let byte = self.current();
        if byte == EOF {
            return Err(TurtleError::syntax(&self.position, "unexpected end of input"));
        }
        self.position.advance(byte);
        self.head += 1;
        self.fill_to(1)?;
        Ok(())
    }

    pub fn check_is_current(&self, expected: u8) -> Result<(), TurtleError> {
        if self.current() == expected {
            Ok(())
        } else {
            self.unexpected_char_error()
        }
    }

    /// Fails with `BadSyntax` unless `current() == expected`, then advances.
    pub fn eat_byte(&mut self, expected: u8) -> Result<(), TurtleError> {
        self.check_is_current(expected)?;
        self.consume()
    }

    /// Consumes `literal` byte by byte, failing at the first mismatch.
    pub fn eat_string(&mut self, literal: &str) -> Result<(), TurtleError> {
        for byte in literal.bytes() {
            self.eat_byte(byte)?;
        }
        Ok(())
    }

    /// Fills `out[..n]` with the next `n` bytes without consuming them.
    /// Positions past EOF are padded with [`EOF`].
    pub fn peek_n(&mut self, out: &mut [u8], n: usize) -> Result<(), TurtleError> {
        self.fill_to(n)?;
        let available = (self.buf.len() - self.head).min(n);
        out[..available].copy_from_slice(&self.buf[self.head..self.head + available]);
        for slot in out.iter_mut().take(n).skip(available) {
            *slot = EOF;
        }
        Ok(())
    }

    pub fn unexpected_char_error<T>(&self) -> Result<T, TurtleError> {
        let byte = self.current();
        Err(TurtleError::syntax(
            &self.position,
            if byte == EOF {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected byte {:#04x} ({:?})", byte, byte as char)
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_tracks_line_and_column() {
        let mut buf = ReadBuffer::new("ab\ncd".as_bytes(), "test").unwrap();
        assert_eq!(buf.current(), b'a');
        buf.consume().unwrap();
        assert_eq!(buf.position().line, 1);
        assert_eq!(buf.position().column, 1);
        buf.consume().unwrap(); // 'b'
        buf.consume().unwrap(); // '\n'
        assert_eq!(buf.position().line, 2);
        assert_eq!(buf.position().column, 0);
        assert_eq!(buf.current(), b'c');
    }

    #[test]
    fn peek_n_does_not_disturb_current() {
        let mut buf = ReadBuffer::new("abcdef".as_bytes(), "test").unwrap();
        let mut out = [0u8; 4];
        buf.peek_n(&mut out, 4).unwrap();
        assert_eq!(&out, b"abcd");
        assert_eq!(buf.current(), b'a');
        buf.consume().unwrap();
        assert_eq!(buf.current(), b'b');
    }

    #[test]
    fn peek_n_across_a_page_boundary_is_stable() {
        let mut big = vec![b'x'; PAGE - 2];
        big.extend_from_slice(b"abcdef");
        let mut buf = ReadBuffer::new(big.as_slice(), "test").unwrap();
        for _ in 0..PAGE - 2 {
            buf.consume().unwrap();
        }
        let mut out = [0u8; 6];
        buf.peek_n(&mut out, 6).unwrap();
        assert_eq!(&out, b"abcdef");
        for expected in b"abcdef" {
            buf.eat_byte(*expected).unwrap();
        }
    }

    #[test]
    fn eof_latches_and_further_consume_fails() {
        let mut buf = ReadBuffer::new("a".as_bytes(), "test").unwrap();
        buf.consume().unwrap();
        assert_eq!(buf.current(), EOF);
        assert!(buf.consume().is_err());
    }
}
