//! Diagnostics. Modelled by hand (no `thiserror`/`anyhow`) to match the
//! rest of this crate's dependency footprint: `Cargo.toml` carries only
//! `oxilangtag` and `rdfio_api`.

use std::fmt;
use std::io;

/// `(filename, line, column)`, advancing on every consumed byte (spec §3
/// "Cursor"). Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPosition {
    pub filename: String,
    pub line: u64,
    pub column: u64,
}

impl TextPosition {
    pub fn start(filename: impl Into<String>) -> Self {
        TextPosition {
            filename: filename.into(),
            line: 1,
            column: 0,
        }
    }

    pub(crate) fn advance(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// Fatal error surfaced to the outer caller. There is no recoverable
/// variant here: the internal "this production did not match" signal
/// (spec §9, `Failure`) never escapes the parser, and is represented at
/// call sites as `Result<Option<T>, TurtleError>` instead of a shared enum
/// value.
#[derive(Debug)]
pub enum TurtleError {
    /// The byte source returned an I/O error.
    Io(io::Error),
    /// A syntax error located at a specific position (`ErrBadSyntax`).
    Syntax { position: TextPosition, message: String },
    /// A malformed constructor argument, e.g. a non-`file:` URL passed to
    /// `read_file` (`ErrBadArg`).
    BadArgument(String),
    /// A sink returned `ControlFlow::Break`, requesting the parse stop
    /// (`ErrUnknown`, spec §6/§7).
    SinkAborted,
}

impl TurtleError {
    pub(crate) fn syntax(position: &TextPosition, message: impl Into<String>) -> Self {
        TurtleError::Syntax {
            position: position.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TurtleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurtleError::Io(e) => write!(f, "I/O error: {}", e),
            TurtleError::Syntax { position, message } => {
                write!(f, "{}: {}", position, message)
            }
            TurtleError::BadArgument(message) => write!(f, "bad argument: {}", message),
            TurtleError::SinkAborted => write!(f, "aborted by sink"),
        }
    }
}

impl std::error::Error for TurtleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurtleError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TurtleError {
    fn from(error: io::Error) -> Self {
        TurtleError::Io(error)
    }
}
