//! Streaming [Turtle](https://www.w3.org/TR/turtle/) and
//! [N-Triples](https://www.w3.org/TR/n-triples/) parsers: single-pass,
//! sink-driven, no in-memory graph.

mod arena;
mod blank;
mod error;
mod lexer;
mod ntriples;
mod read_buffer;
mod reader;
mod turtle;
mod uri;

pub use error::{TextPosition, TurtleError};
pub use ntriples::NTriplesParser;
pub use read_buffer::ByteSource;
pub use reader::{reader_read_file, reader_read_file_handle, reader_read_string, Reader, Syntax};
pub use turtle::TurtleParser;
pub use uri::{resolve, resolve_to_string, serialise, uri_string_has_scheme, ParsedUri};
