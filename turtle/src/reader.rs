//! External entry points (spec §6): pick a syntax, hand it a byte source,
//! get back something that implements [`TripleParser`].

use crate::error::TurtleError;
use crate::ntriples::NTriplesParser;
use crate::read_buffer::ByteSource;
use crate::turtle::TurtleParser;
use crate::uri::{self, ParsedUri};
use rdfio_api::parser::{TripleParser, TripleSink};
use std::fs::File;

/// Which grammar a [`Reader`] should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Turtle,
    NTriples,
}

/// Dispatches to [`TurtleParser`] or [`NTriplesParser`] behind one type,
/// so callers that pick a syntax at runtime (a CLI flag, a content-type
/// header) do not need to be generic over which one it is.
pub enum Reader<S: ByteSource> {
    Turtle(TurtleParser<S>),
    NTriples(NTriplesParser<S>),
}

impl<S: ByteSource> Reader<S> {
    pub fn new(
        syntax: Syntax,
        source: S,
        filename: impl Into<String>,
        base: Option<String>,
    ) -> Result<Self, TurtleError> {
        if let Some(base) = &base {
            if !uri::uri_string_has_scheme(base) {
                return Err(TurtleError::BadArgument(format!(
                    "base {:?} is not an absolute IRI",
                    base
                )));
            }
        }
        Ok(match syntax {
            Syntax::Turtle => Reader::Turtle(TurtleParser::with_base(source, filename, base)?),
            Syntax::NTriples => Reader::NTriples(NTriplesParser::with_filename(source, filename)?),
        })
    }

    /// Prefixes every blank node identifier minted while parsing. A no-op
    /// for N-Triples, which never mints blank nodes of its own — every
    /// `_:id` it emits is copied verbatim from the input.
    pub fn add_blank_prefix(&mut self, prefix: &str) {
        if let Reader::Turtle(parser) = self {
            parser.add_blank_prefix(prefix);
        }
    }
}

impl<S: ByteSource> TripleParser for Reader<S> {
    type Error = TurtleError;

    fn parse_step<Sk: TripleSink>(&mut self, sink: &mut Sk) -> Result<(), TurtleError> {
        match self {
            Reader::Turtle(parser) => parser.parse_step(sink),
            Reader::NTriples(parser) => parser.parse_step(sink),
        }
    }

    fn is_end(&self) -> bool {
        match self {
            Reader::Turtle(parser) => parser.is_end(),
            Reader::NTriples(parser) => parser.is_end(),
        }
    }
}

/// Opens a `file:`/`file://`/`file:///` URL (spec §6) and reads it as
/// `syntax`, using the URL's path as the diagnostic filename and, absent
/// an explicit `base`, leaving relative IRIs to error out rather than
/// silently guessing a `file:` base. Any other scheme is `ErrBadArg`
/// (spec §7), not an I/O failure — the same `BadArgument` variant
/// [`Reader::new`] already returns for a malformed `base`.
pub fn reader_read_file(
    syntax: Syntax,
    file_url: &str,
    base: Option<String>,
) -> Result<Reader<File>, TurtleError> {
    let parsed = ParsedUri::parse(file_url);
    if parsed.scheme() != Some("file") {
        return Err(TurtleError::BadArgument(format!(
            "{:?} is not a file: URL",
            file_url
        )));
    }
    let path = parsed.path().unwrap_or("");
    let file = File::open(path)?;
    Reader::new(syntax, file, path.to_string(), base)
}

/// Reads from an already-open file handle, e.g. one received over a pipe
/// or opened with non-default flags by the caller.
pub fn reader_read_file_handle(
    syntax: Syntax,
    file: File,
    filename: impl Into<String>,
    base: Option<String>,
) -> Result<Reader<File>, TurtleError> {
    Reader::new(syntax, file, filename, base)
}

/// Reads a complete in-memory document. `content` needs no line buffering
/// or file handle — `&[u8]` already satisfies [`ByteSource`] through the
/// blanket `Read` impl.
pub fn reader_read_string(
    syntax: Syntax,
    content: &[u8],
    base: Option<String>,
) -> Result<Reader<&[u8]>, TurtleError> {
    Reader::new(syntax, content, "<string>", base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfio_api::parser::FnSink;
    use std::ops::ControlFlow;

    #[test]
    fn reader_dispatches_on_syntax() {
        let ttl = b"<http://a/s> <http://a/p> <http://a/o> .";
        let mut reader = reader_read_string(Syntax::Turtle, ttl, None).unwrap();
        let mut count = 0;
        reader
            .parse_all(&mut FnSink(|_| {
                count += 1;
                ControlFlow::Continue(())
            }))
            .unwrap();
        assert_eq!(count, 1);

        let nt = b"<http://a/s> <http://a/p> <http://a/o> .\n";
        let mut reader = reader_read_string(Syntax::NTriples, nt, None).unwrap();
        let mut count = 0;
        reader
            .parse_all(&mut FnSink(|_| {
                count += 1;
                ControlFlow::Continue(())
            }))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn relative_base_is_rejected_up_front() {
        let result = reader_read_string(Syntax::Turtle, b"", Some("not-a-uri".to_string()));
        assert!(matches!(result, Err(TurtleError::BadArgument(_))));
    }

    #[test]
    fn non_file_scheme_is_rejected_up_front() {
        let result = reader_read_file(Syntax::Turtle, "http://example/doc.ttl", None);
        assert!(matches!(result, Err(TurtleError::BadArgument(_))));
    }

    #[test]
    fn triple_slash_file_url_opens_the_path() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rdfio_turtle_reader_test_{}.ttl", std::process::id()));
        std::fs::write(&path, b"<http://a/s> <http://a/p> <http://a/o> .\n").unwrap();
        let url = format!("file://{}", path.to_string_lossy());

        let mut reader = reader_read_file(Syntax::Turtle, &url, None).unwrap();
        let mut count = 0;
        reader
            .parse_all(&mut FnSink(|_| {
                count += 1;
                ControlFlow::Continue(())
            }))
            .unwrap();
        assert_eq!(count, 1);

        std::fs::remove_file(&path).unwrap();
    }
}
