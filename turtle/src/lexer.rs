//! Shared lexical rules (spec §4.4): whitespace/comments, escape
//! sequences, string bodies (short and long), IRI references, language
//! tags, and name scanning. Used by both the Turtle and N-Triples
//! grammars in `turtle.rs` / `ntriples.rs` — they differ only in which
//! of these productions their grammar calls.

use crate::arena::{StrRef, StringArena};
use crate::error::TurtleError;
use crate::read_buffer::{ByteSource, ReadBuffer, EOF};
use oxilangtag::LanguageTag;

/// Set when a short/long string body contained `\n` or `\r` (spec §4.4).
pub const HAS_NEWLINE: u8 = 1 << 0;
/// Set when a short string body contained an escaped quote.
pub const HAS_QUOTE: u8 = 1 << 1;

pub fn skip_whitespace_and_comments<S: ByteSource>(
    read: &mut ReadBuffer<S>,
) -> Result<(), TurtleError> {
    loop {
        match read.current() {
            0x09 | 0x0A | 0x0D | 0x20 => read.consume()?,
            b'#' => {
                while !matches!(read.current(), 0x0A | 0x0D | EOF) {
                    read.consume()?;
                }
            }
            _ => return Ok(()),
        }
    }
}

fn hex_value(byte: u8) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as u32),
        b'a'..=b'f' => Some((byte - b'a' + 10) as u32),
        b'A'..=b'F' => Some((byte - b'A' + 10) as u32),
        _ => None,
    }
}

/// Encodes a Unicode scalar value as 1-4 UTF-8 bytes directly into the
/// arena, following the explicit size rule in spec §4.4 rather than
/// going through `char`/`String` (a stray surrogate half is a syntax
/// error here, not a panic).
fn push_utf8_scalar<S: ByteSource>(
    read: &ReadBuffer<S>,
    arena: &mut StringArena,
    r: StrRef,
    c: u32,
) -> Result<(), TurtleError> {
    if c < 0x80 {
        arena.push_byte(r, c as u8);
    } else if c < 0x800 {
        arena.push_byte(r, 0xC0 | (c >> 6) as u8);
        arena.push_byte(r, 0x80 | (c & 0x3F) as u8);
    } else if c < 0x10000 {
        if (0xD800..=0xDFFF).contains(&c) {
            return read.unexpected_char_error();
        }
        arena.push_byte(r, 0xE0 | (c >> 12) as u8);
        arena.push_byte(r, 0x80 | ((c >> 6) & 0x3F) as u8);
        arena.push_byte(r, 0x80 | (c & 0x3F) as u8);
    } else if c < 0x200000 {
        arena.push_byte(r, 0xF0 | (c >> 18) as u8);
        arena.push_byte(r, 0x80 | ((c >> 12) & 0x3F) as u8);
        arena.push_byte(r, 0x80 | ((c >> 6) & 0x3F) as u8);
        arena.push_byte(r, 0x80 | (c & 0x3F) as u8);
    } else {
        return read.unexpected_char_error();
    }
    Ok(())
}

/// Consumes `digits` (4 or 8) hex characters after a `\u`/`\U` has
/// already been consumed, and pushes the decoded codepoint's UTF-8
/// encoding.
fn push_hex_escape<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
    r: StrRef,
    digits: u8,
) -> Result<(), TurtleError> {
    let mut value = 0u32;
    for _ in 0..digits {
        let d = hex_value(read.current()).ok_or(()).or_else(|_| read.unexpected_char_error())?;
        value = value * 16 + d;
        read.consume()?;
    }
    push_utf8_scalar(read, arena, r, value)
}

/// Copies raw (non-escape) content bytes starting at the current head
/// into the arena: one byte if ASCII, or a whole multibyte UTF-8
/// sequence inferred from the leading byte's high bits (spec §4.4).
fn copy_raw_char<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
    r: StrRef,
) -> Result<(), TurtleError> {
    let first = read.current();
    let extra = if first & 0x80 == 0 {
        0
    } else if first & 0xE0 == 0xC0 {
        1
    } else if first & 0xF0 == 0xE0 {
        2
    } else if first & 0xF8 == 0xF0 {
        3
    } else {
        return read.unexpected_char_error();
    };
    arena.push_byte(r, first);
    read.consume()?;
    for _ in 0..extra {
        let b = read.current();
        if b == EOF || b & 0xC0 != 0x80 {
            return read.unexpected_char_error();
        }
        arena.push_byte(r, b);
        read.consume()?;
    }
    Ok(())
}

/// Context determining which extra escapes (beyond `\\`, `\u`, `\U`) are
/// legal (spec §4.4).
#[derive(Clone, Copy, PartialEq, Eq)]
enum EscapeContext {
    /// Inside `< >`: additionally `\>`.
    Uri,
    /// Inside a quoted string body: additionally `\t \n \r \"`.
    StringBody,
}

/// Handles one `\...` escape starting at the backslash, pushing the
/// decoded bytes to `r`. Returns the OR of any flag bits it set.
fn push_escape<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
    r: StrRef,
    context: EscapeContext,
) -> Result<u8, TurtleError> {
    read.consume()?; // the backslash
    let c = read.current();
    let flags = match (context, c) {
        (_, b'\\') => {
            arena.push_byte(r, b'\\');
            read.consume()?;
            0
        }
        (_, b'u') => {
            read.consume()?;
            push_hex_escape(read, arena, r, 4)?;
            0
        }
        (_, b'U') => {
            read.consume()?;
            push_hex_escape(read, arena, r, 8)?;
            0
        }
        (EscapeContext::Uri, b'>') => {
            arena.push_byte(r, b'>');
            read.consume()?;
            0
        }
        (EscapeContext::StringBody, b't') => {
            arena.push_byte(r, 0x09);
            read.consume()?;
            0
        }
        (EscapeContext::StringBody, b'n') => {
            arena.push_byte(r, 0x0A);
            read.consume()?;
            HAS_NEWLINE
        }
        (EscapeContext::StringBody, b'r') => {
            arena.push_byte(r, 0x0D);
            read.consume()?;
            HAS_NEWLINE
        }
        (EscapeContext::StringBody, b'"') => {
            arena.push_byte(r, b'"');
            read.consume()?;
            HAS_QUOTE
        }
        (EscapeContext::StringBody, b'\'') => {
            arena.push_byte(r, b'\'');
            read.consume()?;
            0
        }
        _ => return read.unexpected_char_error(),
    };
    Ok(flags)
}

/// `uriref ::= '<' ucharacter* '>'`. Pushes the decoded IRI into a fresh
/// arena slot and returns its reference.
pub fn parse_uriref<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
) -> Result<StrRef, TurtleError> {
    read.eat_byte(b'<')?;
    let r = arena.push_empty();
    loop {
        match read.current() {
            b'>' => {
                read.consume()?;
                return Ok(r);
            }
            b'\\' => {
                push_escape(read, arena, r, EscapeContext::Uri)?;
            }
            EOF | 0x00..=0x1F => return read.unexpected_char_error(),
            _ => copy_raw_char(read, arena, r)?,
        }
    }
}

/// Reads a `"..."` short string body (opening quote already at the
/// head). Returns `(reference, flags)`.
pub fn parse_short_string<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
    quote: u8,
) -> Result<(StrRef, u8), TurtleError> {
    read.eat_byte(quote)?;
    let r = arena.push_empty();
    let mut flags = 0;
    loop {
        match read.current() {
            b if b == quote => {
                read.consume()?;
                return Ok((r, flags));
            }
            b'\\' => flags |= push_escape(read, arena, r, EscapeContext::StringBody)?,
            EOF | 0x00..=0x1F => return read.unexpected_char_error(),
            _ => copy_raw_char(read, arena, r)?,
        }
    }
}

/// Reads a `"""..."""` (or `'''...'''`) long string body, with the three
/// opening quote bytes already consumed by the caller (it needed to
/// `peek_n` them to tell a long string apart from an empty short
/// string). Newlines are permitted inside; closing requires three
/// consecutive unescaped quote bytes.
pub fn parse_long_string_body<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
    quote: u8,
) -> Result<(StrRef, u8), TurtleError> {
    let r = arena.push_empty();
    let mut flags = 0;
    loop {
        match read.current() {
            b if b == quote => {
                let mut ahead = [0u8; 2];
                read.peek_n(&mut ahead, 2)?;
                if ahead[0] == quote && ahead[1] == quote {
                    read.consume()?;
                    read.consume()?;
                    read.consume()?;
                    return Ok((r, flags));
                }
                arena.push_byte(r, quote);
                read.consume()?;
            }
            b'\\' => flags |= push_escape(read, arena, r, EscapeContext::StringBody)?,
            EOF => return read.unexpected_char_error(),
            0x0A | 0x0D => {
                flags |= HAS_NEWLINE;
                arena.push_byte(r, read.current());
                read.consume()?;
            }
            0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F => return read.unexpected_char_error(),
            _ => copy_raw_char(read, arena, r)?,
        }
    }
}

/// `language ::= [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*`, with the leading `@`
/// already at the head. Validated against BCP47 via `oxilangtag` once
/// the raw bytes are collected.
pub fn parse_langtag<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
) -> Result<StrRef, TurtleError> {
    read.eat_byte(b'@')?;
    let r = arena.push_empty();
    if !read.current().is_ascii_alphabetic() {
        return read.unexpected_char_error();
    }
    while read.current().is_ascii_alphabetic() {
        arena.push_byte(r, read.current());
        read.consume()?;
    }
    while read.current() == b'-' {
        arena.push_byte(r, b'-');
        read.consume()?;
        if !read.current().is_ascii_alphanumeric() {
            return read.unexpected_char_error();
        }
        while read.current().is_ascii_alphanumeric() {
            arena.push_byte(r, read.current());
            read.consume()?;
        }
    }
    if LanguageTag::parse(arena.as_str(r)).is_err() {
        return read.unexpected_char_error();
    }
    Ok(r)
}

fn is_name_start_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

/// `true` for any byte that can continue (not necessarily start) a bare
/// name — exposed so the Turtle grammar can tell where an identifier
/// ends (disambiguating the `a` keyword and the `BASE`/`PREFIX`
/// keywords from a same-spelled prefixed name).
pub(crate) fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.') || b >= 0x80
}

/// Reads a bare NCName-ish identifier (prefix or local-name part of a
/// qname, or a blank node label) into the arena. Caller has already
/// checked `is_name_start_byte(read.current())`.
fn parse_name<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
) -> Result<StrRef, TurtleError> {
    let r = arena.push_empty();
    while is_name_start_byte(read.current()) || is_name_byte(read.current()) {
        arena.push_byte(r, read.current());
        read.consume()?;
    }
    // A trailing '.' is not part of a name when it would otherwise end
    // the statement; callers that need that distinction trim it.
    Ok(r)
}

/// `nodeID ::= '_:' name`, with `_` already at the head.
pub fn parse_blank_node_label<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
) -> Result<StrRef, TurtleError> {
    read.eat_byte(b'_')?;
    read.eat_byte(b':')?;
    if !is_name_start_byte(read.current()) && !read.current().is_ascii_digit() {
        return read.unexpected_char_error();
    }
    parse_name(read, arena)
}

/// `qname ::= [ prefixName ] ':' [ name ]`. The first byte has already
/// been confirmed to start a name (or to be `:`itself for a no-prefix
/// qname). Returns `(prefix_ref_or_none, local_ref)`.
pub fn parse_prefixed_name<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
) -> Result<(Option<StrRef>, StrRef), TurtleError> {
    let prefix = if read.current() == b':' {
        None
    } else {
        Some(parse_name(read, arena)?)
    };
    read.eat_byte(b':')?;
    let local = if is_name_start_byte(read.current()) || read.current().is_ascii_digit() {
        parse_name(read, arena)?
    } else {
        arena.push_empty()
    };
    Ok((prefix, local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_buffer::ReadBuffer;

    fn read_of(s: &str) -> ReadBuffer<&[u8]> {
        ReadBuffer::new(s.as_bytes(), "test").unwrap()
    }

    #[test]
    fn uriref_with_unicode_escape() {
        let mut read = read_of(r#"<http://x/é>"#);
        let mut arena = StringArena::new();
        let r = parse_uriref(&mut read, &mut arena).unwrap();
        assert_eq!(arena.as_str(r).as_bytes(), b"http://x/\xC3\xA9");
        arena.pop(r);
    }

    #[test]
    fn short_string_with_escaped_quote() {
        let mut read = read_of(r#""a\"b""#);
        let mut arena = StringArena::new();
        let (r, flags) = parse_short_string(&mut read, &mut arena, b'"').unwrap();
        assert_eq!(arena.as_str(r), "a\"b");
        assert_eq!(flags & HAS_QUOTE, HAS_QUOTE);
        arena.pop(r);
    }

    #[test]
    fn long_string_with_embedded_double_quote() {
        // `"""a""b"""` -> literal bytes `a""b`, opening delimiter already
        // consumed by the caller (as `turtle.rs` does).
        let mut read = read_of(r#"a""b""" tail"#);
        let mut arena = StringArena::new();
        let (r, _flags) = parse_long_string_body(&mut read, &mut arena, b'"').unwrap();
        assert_eq!(arena.as_str(r), "a\"\"b");
        arena.pop(r);
    }

    #[test]
    fn langtag_rejects_invalid_bcp47() {
        let mut read = read_of("@en-US");
        let mut arena = StringArena::new();
        let r = parse_langtag(&mut read, &mut arena).unwrap();
        assert_eq!(arena.as_str(r), "en-US");
        arena.pop(r);
    }
}
