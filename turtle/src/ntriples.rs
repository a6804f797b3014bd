//! Implementation of [N-Triples](https://www.w3.org/TR/n-triples/) RDF syntax.

use crate::arena::{StrRef, StringArena};
use crate::error::TurtleError;
use crate::lexer;
use crate::read_buffer::{ByteSource, ReadBuffer, EOF};
use rdfio_api::model::{
    BlankNode, Literal, NamedNode, NamedOrBlankNode, NamedOrCurie, StatementFlags, Term, Triple,
};
use rdfio_api::parser::{TripleParser, TripleSink};
use std::ops::ControlFlow;

/// A [N-Triples](https://www.w3.org/TR/n-triples/) streaming parser.
///
/// It implements [`TripleParser`]. N-Triples is accepted by the same
/// read-buffer and string-arena machinery as Turtle (`turtle.rs`), with a
/// much smaller grammar: every statement is one line, there are no
/// `@prefix`/`@base` directives, no CURIEs, and no collection or anonymous
/// blank node shorthand.
///
/// ```
/// use rdfio_turtle::NTriplesParser;
/// use rdfio_api::parser::{TripleParser, FnSink};
/// use rdfio_api::model::NamedNode;
///
/// let file = b"<http://example.com/foo> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> .
/// <http://example.com/foo> <http://schema.org/name> \"Foo\" .
/// <http://example.com/bar> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> .
/// <http://example.com/bar> <http://schema.org/name> \"Bar\" .";
///
/// let rdf_type = NamedNode { iri: "http://www.w3.org/1999/02/22-rdf-syntax-ns#type" };
/// let schema_person = NamedNode { iri: "http://schema.org/Person" };
/// let mut count = 0;
/// NTriplesParser::new(file.as_ref()).unwrap().parse_all(&mut FnSink(|t| {
///     if t.predicate == rdf_type && t.object == schema_person.into() {
///         count += 1;
///     }
///     std::ops::ControlFlow::Continue(())
/// })).unwrap();
/// assert_eq!(2, count)
/// ```
pub struct NTriplesParser<S: ByteSource> {
    read: ReadBuffer<S>,
    arena: StringArena,
}

impl<S: ByteSource> NTriplesParser<S> {
    pub fn new(source: S) -> Result<Self, TurtleError> {
        Self::with_filename(source, "<input>")
    }

    pub fn with_filename(source: S, filename: impl Into<String>) -> Result<Self, TurtleError> {
        Ok(NTriplesParser {
            read: ReadBuffer::new(source, filename)?,
            arena: StringArena::new(),
        })
    }
}

impl<S: ByteSource> TripleParser for NTriplesParser<S> {
    type Error = TurtleError;

    fn parse_step<Sk: TripleSink>(&mut self, sink: &mut Sk) -> Result<(), TurtleError> {
        skip_inline_whitespace(&mut self.read)?;

        match self.read.current() {
            EOF => return Ok(()),
            b'#' | b'\r' | b'\n' => {
                skip_to_next_line(&mut self.read)?;
                return Ok(());
            }
            _ => {}
        }

        let subject = parse_named_or_blank_node(&mut self.read, &mut self.arena)?;
        skip_inline_whitespace(&mut self.read)?;
        let predicate_ref = lexer::parse_uriref(&mut self.read, &mut self.arena)?;
        skip_inline_whitespace(&mut self.read)?;
        let object = parse_object(&mut self.read, &mut self.arena)?;
        skip_inline_whitespace(&mut self.read)?;
        self.read.eat_byte(b'.')?;
        skip_inline_whitespace(&mut self.read)?;
        match self.read.current() {
            EOF | b'#' | b'\r' | b'\n' => skip_to_next_line(&mut self.read)?,
            _ => return self.read.unexpected_char_error(),
        }

        let triple = Triple {
            graph: None,
            subject: ref_to_subject(&self.arena, &subject),
            predicate: NamedNode { iri: self.arena.as_str(predicate_ref) },
            object: ref_to_term(&self.arena, &object),
        };
        let control = sink.triple(StatementFlags::empty(), triple);

        pop_object(&mut self.arena, object);
        self.arena.pop(predicate_ref);
        pop_subject(&mut self.arena, subject);

        match control {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(TurtleError::SinkAborted),
        }
    }

    fn is_end(&self) -> bool {
        self.read.current() == EOF
    }
}

/// A named node or blank node reference still living in the arena, kept
/// just long enough to build one `Triple` and then get popped.
enum Ref {
    Named(StrRef),
    Blank(StrRef),
}

enum ObjectRef {
    Named(StrRef),
    Blank(StrRef),
    Simple(StrRef),
    LangString(StrRef, StrRef),
    Typed(StrRef, StrRef),
}

fn parse_named_or_blank_node<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
) -> Result<Ref, TurtleError> {
    match read.current() {
        b'<' => Ok(Ref::Named(lexer::parse_uriref(read, arena)?)),
        b'_' => Ok(Ref::Blank(lexer::parse_blank_node_label(read, arena)?)),
        _ => read.unexpected_char_error(),
    }
}

fn parse_object<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
) -> Result<ObjectRef, TurtleError> {
    match read.current() {
        b'<' => Ok(ObjectRef::Named(lexer::parse_uriref(read, arena)?)),
        b'_' => Ok(ObjectRef::Blank(lexer::parse_blank_node_label(read, arena)?)),
        b'"' => parse_literal(read, arena),
        _ => read.unexpected_char_error(),
    }
}

fn parse_literal<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    arena: &mut StringArena,
) -> Result<ObjectRef, TurtleError> {
    let (value, _flags) = lexer::parse_short_string(read, arena, b'"')?;
    skip_inline_whitespace(read)?;
    match read.current() {
        b'@' => {
            let lang = lexer::parse_langtag(read, arena)?;
            Ok(ObjectRef::LangString(value, lang))
        }
        b'^' => {
            read.consume()?;
            read.eat_byte(b'^')?;
            let datatype = lexer::parse_uriref(read, arena)?;
            Ok(ObjectRef::Typed(value, datatype))
        }
        _ => Ok(ObjectRef::Simple(value)),
    }
}

fn ref_to_subject<'a>(arena: &'a StringArena, r: &Ref) -> NamedOrBlankNode<'a> {
    match r {
        Ref::Named(sr) => NamedOrBlankNode::NamedNode(NamedNode { iri: arena.as_str(*sr) }),
        Ref::Blank(sr) => NamedOrBlankNode::BlankNode(BlankNode { id: arena.as_str(*sr) }),
    }
}

fn ref_to_term<'a>(arena: &'a StringArena, r: &ObjectRef) -> Term<'a> {
    match r {
        ObjectRef::Named(sr) => Term::NamedNode(NamedNode { iri: arena.as_str(*sr) }),
        ObjectRef::Blank(sr) => Term::BlankNode(BlankNode { id: arena.as_str(*sr) }),
        ObjectRef::Simple(sr) => Term::Literal(Literal::Simple { value: arena.as_str(*sr) }),
        ObjectRef::LangString(v, l) => Term::Literal(Literal::LanguageTaggedString {
            value: arena.as_str(*v),
            language: arena.as_str(*l),
        }),
        ObjectRef::Typed(v, d) => Term::Literal(Literal::Typed {
            value: arena.as_str(*v),
            datatype: NamedOrCurie::NamedNode(NamedNode { iri: arena.as_str(*d) }),
        }),
    }
}

fn pop_subject(arena: &mut StringArena, r: Ref) {
    match r {
        Ref::Named(sr) | Ref::Blank(sr) => arena.pop(sr),
    }
}

fn pop_object(arena: &mut StringArena, r: ObjectRef) {
    match r {
        ObjectRef::Named(sr) | ObjectRef::Blank(sr) | ObjectRef::Simple(sr) => arena.pop(sr),
        ObjectRef::LangString(v, l) => {
            arena.pop(l);
            arena.pop(v);
        }
        ObjectRef::Typed(v, d) => {
            arena.pop(d);
            arena.pop(v);
        }
    }
}

/// N-Triples only allows spaces and tabs between the tokens of a
/// statement — unlike Turtle, a comment or bare newline never appears
/// mid-statement.
fn skip_inline_whitespace<S: ByteSource>(read: &mut ReadBuffer<S>) -> Result<(), TurtleError> {
    loop {
        match read.current() {
            b' ' | b'\t' => read.consume()?,
            _ => return Ok(()),
        }
    }
}

fn skip_to_next_line<S: ByteSource>(read: &mut ReadBuffer<S>) -> Result<(), TurtleError> {
    loop {
        match read.current() {
            EOF => return Ok(()),
            b'\n' => {
                read.consume()?;
                return Ok(());
            }
            _ => read.consume()?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfio_api::parser::FnSink;

    fn parse_all(input: &str) -> Vec<String> {
        let mut parser = NTriplesParser::new(input.as_bytes()).unwrap();
        let mut out = Vec::new();
        parser
            .parse_all(&mut FnSink(|t| {
                out.push(format!("{} {} {}", t.subject, t.predicate, t.object));
                ControlFlow::Continue(())
            }))
            .unwrap();
        out
    }

    #[test]
    fn parses_plain_and_typed_and_tagged_literals() {
        let input = concat!(
            "<http://a/s> <http://a/p> \"plain\" .\n",
            "<http://a/s> <http://a/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n",
            "<http://a/s> <http://a/p> \"hi\"@en .\n",
        );
        let lines = parse_all(input);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("\"plain\""));
        assert!(lines[1].ends_with("\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"));
        assert!(lines[2].ends_with("\"hi\"@en"));
    }

    #[test]
    fn blank_nodes_and_comments_and_blank_lines_are_skipped() {
        let input = "# a comment\n\n_:b1 <http://a/p> _:b2 .\n";
        let lines = parse_all(input);
        assert_eq!(lines, vec!["_:b1 <http://a/p> _:b2".to_string()]);
    }

    #[test]
    fn arena_size_is_unchanged_after_each_statement() {
        let mut parser = NTriplesParser::new(
            "<http://a/s> <http://a/p> <http://a/o> .\n<http://a/s> <http://a/p> <http://a/o> .\n"
                .as_bytes(),
        )
        .unwrap();
        let base = parser.arena.size();
        parser
            .parse_all(&mut FnSink(|_| ControlFlow::Continue(())))
            .unwrap();
        assert_eq!(parser.arena.size(), base);
    }

    #[test]
    fn sink_abort_stops_the_parse() {
        let input = "<http://a/s> <http://a/p> <http://a/o> .\n<http://a/s> <http://a/p> <http://a/o> .\n";
        let mut parser = NTriplesParser::new(input.as_bytes()).unwrap();
        let mut count = 0;
        let result = parser.parse_all(&mut FnSink(|_| {
            count += 1;
            ControlFlow::Break(())
        }));
        assert!(result.is_err());
        assert_eq!(count, 1);
    }
}
