//! Implementation of [Turtle](https://www.w3.org/TR/turtle/) RDF syntax.
//!
//! Built on the same [`ReadBuffer`]/[`StringArena`] machinery as
//! `ntriples.rs`, generalised to Turtle's directives, predicate-object
//! lists, blank node property lists (`[ ... ]`), collections (`( ... )`),
//! and literal shorthands (bare numbers, `true`/`false`, the `a` keyword).

use crate::arena::{StrRef, StringArena, Vocab};
use crate::blank::BlankNodeMint;
use crate::error::TurtleError;
use crate::lexer;
use crate::read_buffer::{ByteSource, ReadBuffer, EOF};
use crate::uri::{self, ParsedUri};
use rdfio_api::model::{
    BlankNode, Curie, Literal, NamedNode, NamedOrBlankNode, NamedOrCurie, StatementFlags, Term,
    Triple,
};
use rdfio_api::parser::{TripleParser, TripleSink};
use std::collections::HashMap;
use std::ops::ControlFlow;

/// A [Turtle](https://www.w3.org/TR/turtle/) streaming parser.
///
/// ```
/// use rdfio_turtle::TurtleParser;
/// use rdfio_api::parser::{TripleParser, FnSink};
///
/// let file = b"@prefix schema: <http://schema.org/> .
/// <http://example.com/foo> a schema:Person ;
///     schema:name \"Foo\" .";
///
/// let mut count = 0;
/// TurtleParser::new(file.as_ref()).unwrap().parse_all(&mut FnSink(|_| {
///     count += 1;
///     std::ops::ControlFlow::Continue(())
/// })).unwrap();
/// assert_eq!(2, count)
/// ```
pub struct TurtleParser<S: ByteSource> {
    read: ReadBuffer<S>,
    arena: StringArena,
    base: Option<String>,
    blank_mint: BlankNodeMint,
    prefixes: HashMap<String, String>,
}

impl<S: ByteSource> TurtleParser<S> {
    pub fn new(source: S) -> Result<Self, TurtleError> {
        Self::with_base(source, "<input>", None)
    }

    pub fn with_base(
        source: S,
        filename: impl Into<String>,
        base: Option<String>,
    ) -> Result<Self, TurtleError> {
        Ok(TurtleParser {
            read: ReadBuffer::new(source, filename)?,
            arena: StringArena::new(),
            base,
            blank_mint: BlankNodeMint::new(),
            prefixes: HashMap::new(),
        })
    }

    /// Prefixes every blank node identifier this parser mints from now on,
    /// so two readers parsing two documents into the same sink never
    /// collide (spec §6, `reader_add_blank_prefix`).
    pub fn add_blank_prefix(&mut self, prefix: &str) {
        self.blank_mint.add_prefix(prefix);
    }
}

impl<S: ByteSource> TripleParser for TurtleParser<S> {
    type Error = TurtleError;

    fn parse_step<Sk: TripleSink>(&mut self, sink: &mut Sk) -> Result<(), TurtleError> {
        lexer::skip_whitespace_and_comments(&mut self.read)?;
        if self.read.current() == EOF {
            return Ok(());
        }
        if self.read.current() == b'@' {
            self.read.consume()?;
            if try_match_keyword(&mut self.read, "base")? {
                return self.finish_base_directive(sink, true);
            }
            if try_match_keyword(&mut self.read, "prefix")? {
                return self.finish_prefix_directive(sink, true);
            }
            return self.read.unexpected_char_error();
        }
        if try_match_keyword(&mut self.read, "BASE")? {
            return self.finish_base_directive(sink, false);
        }
        if try_match_keyword(&mut self.read, "PREFIX")? {
            return self.finish_prefix_directive(sink, false);
        }
        self.parse_triples_statement(sink)
    }

    fn is_end(&self) -> bool {
        self.read.current() == EOF
    }
}

/// Distinguishes, for a `[ ... ]` property list, whether its first
/// emitted triple opens a fresh anonymous scope (when the `[ ... ]`
/// itself *is* the subject of a top-level statement) or continues one
/// that a containing triple already announced via `ANON_O_BEGIN` (when
/// the `[ ... ]` appears nested, in object position).
#[derive(Clone, Copy, PartialEq, Eq)]
enum AnonMode {
    None,
    SubjectBegin,
    Continuation,
}

/// What remains to be parsed for an object whose identity (and the
/// containing triple referencing it) has already been emitted, but whose
/// own nested content, if any, is still waiting (spec §4.5/§8.5: the
/// triple that points at a fresh blank node must reach the sink before
/// that blank node's own internal triples do).
enum PendingObject {
    /// A simple node with nothing further to parse.
    Done,
    /// A non-empty `[ ... ]`: the opening bracket has been consumed and
    /// the id minted, but its predicateObjectList and closing `]` remain.
    AnonPropertyList(String),
    /// A non-empty `( ... )`: the opening paren has been consumed and the
    /// first cell minted, but its items and closing `)` remain.
    Collection(String),
}

/// A parsed node still referencing data that must be popped from the
/// arena (the `Named`/`Curie`/`Blank`/`Literal` variants) or an owned,
/// synthesised blank node identifier that needs no popping at all
/// (`MintedBlank`) — minted identifiers never go through the arena's
/// LIFO discipline because their lifetime does not nest the way parsed
/// input tokens do (spec §4.5: a collection cell born while parsing its
/// own item must still be reachable after that item's tokens are
/// popped).
enum NodeRef {
    Named(StrRef),
    Curie(Option<StrRef>, StrRef),
    Blank(StrRef),
    MintedBlank(String),
    Literal(LiteralRef),
}

enum DatatypeRef {
    Named(StrRef),
    Curie(Option<StrRef>, StrRef),
}

enum LiteralRef {
    Simple(StrRef),
    LangString(StrRef, StrRef),
    Typed(StrRef, DatatypeRef),
}

impl<S: ByteSource> TurtleParser<S> {
    fn resolve_iri(&self, iri: &str) -> Result<String, TurtleError> {
        match &self.base {
            Some(base) => {
                let parsed = ParsedUri::parse(base);
                Ok(uri::resolve_to_string(&parsed, iri))
            }
            None if uri::uri_string_has_scheme(iri) => Ok(iri.to_string()),
            None => Err(TurtleError::syntax(
                self.read.position(),
                "relative IRI used with no base set",
            )),
        }
    }

    fn finish_base_directive<Sk: TripleSink>(
        &mut self,
        sink: &mut Sk,
        requires_dot: bool,
    ) -> Result<(), TurtleError> {
        lexer::skip_whitespace_and_comments(&mut self.read)?;
        let r = lexer::parse_uriref(&mut self.read, &mut self.arena)?;
        let absolute = self.resolve_iri(self.arena.as_str(r))?;
        self.arena.pop(r);
        let control = sink.base(NamedNode { iri: &absolute });
        self.base = Some(absolute);
        lexer::skip_whitespace_and_comments(&mut self.read)?;
        if requires_dot {
            self.read.eat_byte(b'.')?;
        }
        match control {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(TurtleError::SinkAborted),
        }
    }

    fn finish_prefix_directive<Sk: TripleSink>(
        &mut self,
        sink: &mut Sk,
        requires_dot: bool,
    ) -> Result<(), TurtleError> {
        lexer::skip_whitespace_and_comments(&mut self.read)?;
        let (prefix_ref, local_ref) = lexer::parse_prefixed_name(&mut self.read, &mut self.arena)?;
        let name = prefix_ref.map(|r| self.arena.as_str(r).to_string()).unwrap_or_default();
        self.arena.pop(local_ref);
        if let Some(r) = prefix_ref {
            self.arena.pop(r);
        }
        lexer::skip_whitespace_and_comments(&mut self.read)?;
        let iri_ref = lexer::parse_uriref(&mut self.read, &mut self.arena)?;
        let absolute = self.resolve_iri(self.arena.as_str(iri_ref))?;
        self.arena.pop(iri_ref);
        self.prefixes.insert(name.clone(), absolute.clone());
        let control = sink.prefix(&name, NamedNode { iri: &absolute });
        lexer::skip_whitespace_and_comments(&mut self.read)?;
        if requires_dot {
            self.read.eat_byte(b'.')?;
        }
        match control {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(TurtleError::SinkAborted),
        }
    }

    fn parse_triples_statement<Sk: TripleSink>(&mut self, sink: &mut Sk) -> Result<(), TurtleError> {
        let (subject, subject_flags, subject_was_bare_anon) = self.parse_subject(sink)?;
        lexer::skip_whitespace_and_comments(&mut self.read)?;
        if self.read.current() != b'.' {
            self.parse_predicate_object_list(sink, &subject, AnonMode::None, subject_flags)?;
            lexer::skip_whitespace_and_comments(&mut self.read)?;
        } else if !subject_was_bare_anon {
            return self.read.unexpected_char_error();
        }
        self.pop_node(subject);
        self.read.eat_byte(b'.')?;
        Ok(())
    }

    fn parse_subject<Sk: TripleSink>(
        &mut self,
        sink: &mut Sk,
    ) -> Result<(NodeRef, StatementFlags, bool), TurtleError> {
        match self.read.current() {
            b'[' => {
                self.read.eat_byte(b'[')?;
                lexer::skip_whitespace_and_comments(&mut self.read)?;
                let mut id = String::new();
                self.blank_mint.mint(&mut id);

                if self.read.current() == b']' {
                    self.read.consume()?;
                    let mut flags = StatementFlags::empty();
                    flags.insert(StatementFlags::EMPTY_S);
                    return Ok((NodeRef::MintedBlank(id), flags, true));
                }

                self.parse_predicate_object_list(
                    sink,
                    &NodeRef::MintedBlank(id.clone()),
                    AnonMode::SubjectBegin,
                    StatementFlags::empty(),
                )?;
                lexer::skip_whitespace_and_comments(&mut self.read)?;
                self.read.eat_byte(b']')?;
                match sink.end_anonymous(BlankNode { id: &id }) {
                    ControlFlow::Continue(()) => {}
                    ControlFlow::Break(()) => return Err(TurtleError::SinkAborted),
                }
                Ok((NodeRef::MintedBlank(id), StatementFlags::empty(), true))
            }
            b'(' => {
                let (node, pending) = self.start_collection()?;
                self.finish_pending(sink, pending)?;
                Ok((node, StatementFlags::empty(), false))
            }
            b'_' => {
                let r = lexer::parse_blank_node_label(&mut self.read, &mut self.arena)?;
                self.rewrite_genid(r);
                Ok((NodeRef::Blank(r), StatementFlags::empty(), false))
            }
            _ => Ok((self.parse_named_resource()?, StatementFlags::empty(), false)),
        }
    }

    /// Turtle-only: a `_:genid*` input label is rewritten in place to
    /// `_:docid*` (spec §4.5) so it can never collide with an id this
    /// parser mints itself via [`BlankNodeMint`], which always produces
    /// `genid`-prefixed ids. N-Triples keeps labels verbatim (spec §9) and
    /// has its own `parse_blank_node_label` call site in `ntriples.rs`
    /// that does not go through this method.
    fn rewrite_genid(&mut self, r: StrRef) {
        if self.arena.as_str(r).starts_with("genid") {
            self.arena.overwrite_prefix(r, b"docid");
        }
    }

    fn parse_predicate_object_list<Sk: TripleSink>(
        &mut self,
        sink: &mut Sk,
        subject: &NodeRef,
        anon_mode: AnonMode,
        initial_flags: StatementFlags,
    ) -> Result<(), TurtleError> {
        let mut first = true;
        loop {
            let predicate_ref = self.parse_verb()?;
            lexer::skip_whitespace_and_comments(&mut self.read)?;
            loop {
                let mut flags = StatementFlags::empty();
                if first {
                    flags.insert(initial_flags);
                }
                match anon_mode {
                    AnonMode::SubjectBegin if first => flags.insert(StatementFlags::ANON_S_BEGIN),
                    AnonMode::SubjectBegin | AnonMode::Continuation => {
                        flags.insert(StatementFlags::ANON_CONT)
                    }
                    AnonMode::None => {}
                }
                first = false;

                let (object, object_flags, pending) = self.parse_object()?;
                flags.insert(object_flags);
                // The triple naming this fresh blank node must reach the
                // sink before the blank node's own nested content does
                // (spec §4.5, §8.2/§8.5).
                self.emit(sink, flags, subject, predicate_ref, &object)?;
                self.finish_pending(sink, pending)?;
                self.pop_node(object);
                lexer::skip_whitespace_and_comments(&mut self.read)?;
                if self.read.current() == b',' {
                    self.read.consume()?;
                    lexer::skip_whitespace_and_comments(&mut self.read)?;
                    continue;
                }
                break;
            }
            self.arena.pop(predicate_ref);
            lexer::skip_whitespace_and_comments(&mut self.read)?;
            if self.read.current() == b';' {
                self.read.consume()?;
                lexer::skip_whitespace_and_comments(&mut self.read)?;
                if matches!(self.read.current(), b'.' | b']') {
                    return Ok(());
                }
                continue;
            }
            return Ok(());
        }
    }

    /// Parses whatever is left of a [`PendingObject`] once the triple that
    /// names it has already reached the sink.
    fn finish_pending<Sk: TripleSink>(
        &mut self,
        sink: &mut Sk,
        pending: PendingObject,
    ) -> Result<(), TurtleError> {
        match pending {
            PendingObject::Done => Ok(()),
            PendingObject::AnonPropertyList(id) => {
                self.parse_predicate_object_list(
                    sink,
                    &NodeRef::MintedBlank(id.clone()),
                    AnonMode::Continuation,
                    StatementFlags::empty(),
                )?;
                lexer::skip_whitespace_and_comments(&mut self.read)?;
                self.read.eat_byte(b']')?;
                match sink.end_anonymous(BlankNode { id: &id }) {
                    ControlFlow::Continue(()) => Ok(()),
                    ControlFlow::Break(()) => Err(TurtleError::SinkAborted),
                }
            }
            PendingObject::Collection(first_cell) => self.finish_collection(sink, first_cell),
        }
    }

    /// Eats `(`, skips to the first item, and mints just enough — the
    /// empty-vs-non-empty check and (if non-empty) the first cell's id —
    /// for a caller to know the collection's value before any of its
    /// internal triples exist.
    fn start_collection(&mut self) -> Result<(NodeRef, PendingObject), TurtleError> {
        self.read.eat_byte(b'(')?;
        lexer::skip_whitespace_and_comments(&mut self.read)?;
        if self.read.current() == b')' {
            self.read.consume()?;
            return Ok((NodeRef::Named(self.arena.vocab(Vocab::RdfNil)), PendingObject::Done));
        }
        let mut cell = String::new();
        self.blank_mint.mint(&mut cell);
        Ok((NodeRef::MintedBlank(cell.clone()), PendingObject::Collection(cell)))
    }

    /// Parses the items and `rdf:first`/`rdf:rest` chain of a non-empty
    /// collection whose first cell (`first_cell`) has already been minted
    /// by [`Self::start_collection`].
    fn finish_collection<Sk: TripleSink>(
        &mut self,
        sink: &mut Sk,
        first_cell: String,
    ) -> Result<(), TurtleError> {
        let mut cell = first_cell;
        loop {
            let (item, item_flags, item_pending) = self.parse_object()?;
            let first_pred = self.arena.vocab(Vocab::RdfFirst);
            self.emit(sink, item_flags, &NodeRef::MintedBlank(cell.clone()), first_pred, &item)?;
            self.finish_pending(sink, item_pending)?;
            self.pop_node(item);

            lexer::skip_whitespace_and_comments(&mut self.read)?;
            if self.read.current() == b')' {
                self.read.consume()?;
                let rest = self.arena.vocab(Vocab::RdfRest);
                let nil = self.arena.vocab(Vocab::RdfNil);
                self.emit(
                    sink,
                    StatementFlags::empty(),
                    &NodeRef::MintedBlank(cell),
                    rest,
                    &NodeRef::Named(nil),
                )?;
                return Ok(());
            }

            let mut next_cell = String::new();
            self.blank_mint.mint(&mut next_cell);
            let rest = self.arena.vocab(Vocab::RdfRest);
            self.emit(
                sink,
                StatementFlags::empty(),
                &NodeRef::MintedBlank(cell),
                rest,
                &NodeRef::MintedBlank(next_cell.clone()),
            )?;
            cell = next_cell;
        }
    }

    /// `verb ::= predicate | 'a'`. A predicate is always delivered to the
    /// sink as a full IRI (`Triple::predicate` has no CURIE variant), so a
    /// prefixed-name verb is expanded here rather than left for the
    /// caller, unlike subject/object CURIEs.
    fn parse_verb(&mut self) -> Result<StrRef, TurtleError> {
        if self.read.current() == b'a' {
            let mut ahead = [0u8; 2];
            self.read.peek_n(&mut ahead, 2)?;
            if !lexer::is_name_byte(ahead[1]) && ahead[1] != b':' {
                self.read.consume()?;
                return Ok(self.arena.vocab(Vocab::RdfType));
            }
        }
        if self.read.current() == b'<' {
            let r = lexer::parse_uriref(&mut self.read, &mut self.arena)?;
            let absolute = self.resolve_iri(self.arena.as_str(r))?;
            self.arena.pop(r);
            let out = self.arena.push_empty();
            self.arena.append(out, absolute.as_bytes());
            return Ok(out);
        }
        let (prefix_ref, local_ref) = lexer::parse_prefixed_name(&mut self.read, &mut self.arena)?;
        let local = self.arena.as_str(local_ref).to_string();
        let prefix_name = prefix_ref.map(|r| self.arena.as_str(r).to_string()).unwrap_or_default();
        self.arena.pop(local_ref);
        if let Some(r) = prefix_ref {
            self.arena.pop(r);
        }
        self.expand_curie(&prefix_name, &local)
    }

    fn expand_curie(&mut self, prefix: &str, local: &str) -> Result<StrRef, TurtleError> {
        let base_iri = self.prefixes.get(prefix).cloned().ok_or_else(|| {
            TurtleError::syntax(self.read.position(), format!("undefined prefix {:?}", prefix))
        })?;
        let r = self.arena.push_empty();
        self.arena.append(r, base_iri.as_bytes());
        self.arena.append(r, local.as_bytes());
        Ok(r)
    }

    fn parse_named_resource(&mut self) -> Result<NodeRef, TurtleError> {
        if self.read.current() == b'<' {
            let r = lexer::parse_uriref(&mut self.read, &mut self.arena)?;
            let absolute = self.resolve_iri(self.arena.as_str(r))?;
            self.arena.pop(r);
            let out = self.arena.push_empty();
            self.arena.append(out, absolute.as_bytes());
            return Ok(NodeRef::Named(out));
        }
        let (prefix_ref, local_ref) = lexer::parse_prefixed_name(&mut self.read, &mut self.arena)?;
        Ok(NodeRef::Curie(prefix_ref, local_ref))
    }

    /// Parses one object, returning its node reference, the flags its own
    /// identity contributes, and whatever nested content (if any) is still
    /// waiting to be parsed after the caller has emitted the containing
    /// triple (see [`PendingObject`]).
    fn parse_object(&mut self) -> Result<(NodeRef, StatementFlags, PendingObject), TurtleError> {
        match self.read.current() {
            b'_' => {
                let r = lexer::parse_blank_node_label(&mut self.read, &mut self.arena)?;
                self.rewrite_genid(r);
                Ok((NodeRef::Blank(r), StatementFlags::empty(), PendingObject::Done))
            }
            b'[' => {
                self.read.eat_byte(b'[')?;
                lexer::skip_whitespace_and_comments(&mut self.read)?;
                let mut id = String::new();
                self.blank_mint.mint(&mut id);
                if self.read.current() == b']' {
                    self.read.consume()?;
                    let mut flags = StatementFlags::empty();
                    flags.insert(StatementFlags::EMPTY_O);
                    Ok((NodeRef::MintedBlank(id), flags, PendingObject::Done))
                } else {
                    let mut flags = StatementFlags::empty();
                    flags.insert(StatementFlags::ANON_O_BEGIN);
                    Ok((NodeRef::MintedBlank(id.clone()), flags, PendingObject::AnonPropertyList(id)))
                }
            }
            b'(' => {
                let (node, pending) = self.start_collection()?;
                Ok((node, StatementFlags::empty(), pending))
            }
            b'"' | b'\'' => Ok((
                NodeRef::Literal(self.parse_quoted_literal()?),
                StatementFlags::empty(),
                PendingObject::Done,
            )),
            b'+' | b'-' | b'.' | b'0'..=b'9' => Ok((
                NodeRef::Literal(self.parse_numeric_literal()?),
                StatementFlags::empty(),
                PendingObject::Done,
            )),
            b't' | b'f' => {
                if let Some(lit) = self.try_parse_boolean()? {
                    Ok((NodeRef::Literal(lit), StatementFlags::empty(), PendingObject::Done))
                } else {
                    Ok((self.parse_named_resource()?, StatementFlags::empty(), PendingObject::Done))
                }
            }
            _ => Ok((self.parse_named_resource()?, StatementFlags::empty(), PendingObject::Done)),
        }
    }

    fn parse_quoted_literal(&mut self) -> Result<LiteralRef, TurtleError> {
        let quote = self.read.current();
        let mut ahead = [0u8; 2];
        self.read.peek_n(&mut ahead, 2)?;
        let value = if ahead[0] == quote && ahead[1] == quote {
            self.read.consume()?;
            self.read.consume()?;
            self.read.consume()?;
            lexer::parse_long_string_body(&mut self.read, &mut self.arena, quote)?.0
        } else {
            lexer::parse_short_string(&mut self.read, &mut self.arena, quote)?.0
        };

        match self.read.current() {
            b'@' => {
                let lang = lexer::parse_langtag(&mut self.read, &mut self.arena)?;
                Ok(LiteralRef::LangString(value, lang))
            }
            b'^' => {
                self.read.consume()?;
                self.read.eat_byte(b'^')?;
                let datatype = self.parse_datatype()?;
                Ok(LiteralRef::Typed(value, datatype))
            }
            _ => Ok(LiteralRef::Simple(value)),
        }
    }

    fn parse_datatype(&mut self) -> Result<DatatypeRef, TurtleError> {
        if self.read.current() == b'<' {
            let r = lexer::parse_uriref(&mut self.read, &mut self.arena)?;
            let absolute = self.resolve_iri(self.arena.as_str(r))?;
            self.arena.pop(r);
            let out = self.arena.push_empty();
            self.arena.append(out, absolute.as_bytes());
            return Ok(DatatypeRef::Named(out));
        }
        let (prefix_ref, local_ref) = lexer::parse_prefixed_name(&mut self.read, &mut self.arena)?;
        Ok(DatatypeRef::Curie(prefix_ref, local_ref))
    }

    /// `INTEGER | DECIMAL | DOUBLE`, disambiguated after the fact by which
    /// of a decimal point and an exponent were present (spec §4.5).
    fn parse_numeric_literal(&mut self) -> Result<LiteralRef, TurtleError> {
        let r = self.arena.push_empty();
        if matches!(self.read.current(), b'+' | b'-') {
            self.arena.push_byte(r, self.read.current());
            self.read.consume()?;
        }

        let mut has_leading_digits = false;
        while self.read.current().is_ascii_digit() {
            self.arena.push_byte(r, self.read.current());
            self.read.consume()?;
            has_leading_digits = true;
        }

        let mut has_dot = false;
        let mut has_trailing_digits = false;
        if self.read.current() == b'.' {
            let mut ahead = [0u8; 2];
            self.read.peek_n(&mut ahead, 2)?;
            if ahead[1].is_ascii_digit() {
                has_dot = true;
                self.arena.push_byte(r, b'.');
                self.read.consume()?;
                while self.read.current().is_ascii_digit() {
                    self.arena.push_byte(r, self.read.current());
                    self.read.consume()?;
                    has_trailing_digits = true;
                }
            }
        }

        if !has_leading_digits && !has_trailing_digits {
            self.arena.pop(r);
            return self.read.unexpected_char_error();
        }

        let mut has_exponent = false;
        if matches!(self.read.current(), b'e' | b'E') {
            has_exponent = true;
            self.arena.push_byte(r, self.read.current());
            self.read.consume()?;
            if matches!(self.read.current(), b'+' | b'-') {
                self.arena.push_byte(r, self.read.current());
                self.read.consume()?;
            }
            if !self.read.current().is_ascii_digit() {
                self.arena.pop(r);
                return self.read.unexpected_char_error();
            }
            while self.read.current().is_ascii_digit() {
                self.arena.push_byte(r, self.read.current());
                self.read.consume()?;
            }
        }

        let datatype = if has_exponent {
            Vocab::XsdDouble
        } else if has_dot {
            Vocab::XsdDecimal
        } else {
            Vocab::XsdInteger
        };
        Ok(LiteralRef::Typed(r, DatatypeRef::Named(self.arena.vocab(datatype))))
    }

    fn try_parse_boolean(&mut self) -> Result<Option<LiteralRef>, TurtleError> {
        let keyword = if self.read.current() == b't' { "true" } else { "false" };
        if try_match_keyword(&mut self.read, keyword)? {
            let r = self.arena.push_empty();
            self.arena.append(r, keyword.as_bytes());
            Ok(Some(LiteralRef::Typed(r, DatatypeRef::Named(self.arena.vocab(Vocab::XsdBoolean)))))
        } else {
            Ok(None)
        }
    }

    fn emit<Sk: TripleSink>(
        &self,
        sink: &mut Sk,
        flags: StatementFlags,
        subject: &NodeRef,
        predicate_ref: StrRef,
        object: &NodeRef,
    ) -> Result<(), TurtleError> {
        let triple = Triple {
            graph: None,
            subject: self.node_ref_to_subject(subject),
            predicate: NamedNode { iri: self.arena.as_str(predicate_ref) },
            object: self.node_ref_to_term(object),
        };
        match sink.triple(flags, triple) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(TurtleError::SinkAborted),
        }
    }

    fn node_ref_to_subject<'n>(&'n self, r: &'n NodeRef) -> NamedOrBlankNode<'n> {
        match r {
            NodeRef::Named(sr) => NamedOrBlankNode::NamedNode(NamedNode { iri: self.arena.as_str(*sr) }),
            NodeRef::Curie(prefix, local) => NamedOrBlankNode::Curie(Curie {
                prefix: prefix.map(|r| self.arena.as_str(r)).unwrap_or(""),
                local: self.arena.as_str(*local),
            }),
            NodeRef::Blank(sr) => NamedOrBlankNode::BlankNode(BlankNode { id: self.arena.as_str(*sr) }),
            NodeRef::MintedBlank(s) => NamedOrBlankNode::BlankNode(BlankNode { id: s.as_str() }),
            NodeRef::Literal(_) => unreachable!("a literal can never occupy subject position"),
        }
    }

    fn node_ref_to_term<'n>(&'n self, r: &'n NodeRef) -> Term<'n> {
        match r {
            NodeRef::Named(sr) => Term::NamedNode(NamedNode { iri: self.arena.as_str(*sr) }),
            NodeRef::Curie(prefix, local) => Term::Curie(Curie {
                prefix: prefix.map(|r| self.arena.as_str(r)).unwrap_or(""),
                local: self.arena.as_str(*local),
            }),
            NodeRef::Blank(sr) => Term::BlankNode(BlankNode { id: self.arena.as_str(*sr) }),
            NodeRef::MintedBlank(s) => Term::BlankNode(BlankNode { id: s.as_str() }),
            NodeRef::Literal(lit) => Term::Literal(self.literal_ref_to_literal(lit)),
        }
    }

    fn literal_ref_to_literal<'n>(&'n self, lit: &'n LiteralRef) -> Literal<'n> {
        match lit {
            LiteralRef::Simple(sr) => Literal::Simple { value: self.arena.as_str(*sr) },
            LiteralRef::LangString(v, l) => Literal::LanguageTaggedString {
                value: self.arena.as_str(*v),
                language: self.arena.as_str(*l),
            },
            LiteralRef::Typed(v, dt) => Literal::Typed {
                value: self.arena.as_str(*v),
                datatype: self.datatype_ref_to_named_or_curie(dt),
            },
        }
    }

    fn datatype_ref_to_named_or_curie<'n>(&'n self, dt: &'n DatatypeRef) -> NamedOrCurie<'n> {
        match dt {
            DatatypeRef::Named(sr) => NamedOrCurie::NamedNode(NamedNode { iri: self.arena.as_str(*sr) }),
            DatatypeRef::Curie(prefix, local) => NamedOrCurie::Curie(Curie {
                prefix: prefix.map(|r| self.arena.as_str(r)).unwrap_or(""),
                local: self.arena.as_str(*local),
            }),
        }
    }

    fn pop_node(&mut self, r: NodeRef) {
        match r {
            NodeRef::Named(sr) | NodeRef::Blank(sr) => self.arena.pop(sr),
            NodeRef::Curie(prefix, local) => {
                self.arena.pop(local);
                if let Some(p) = prefix {
                    self.arena.pop(p);
                }
            }
            NodeRef::MintedBlank(_) => {}
            NodeRef::Literal(lit) => self.pop_literal(lit),
        }
    }

    fn pop_literal(&mut self, lit: LiteralRef) {
        match lit {
            LiteralRef::Simple(sr) => self.arena.pop(sr),
            LiteralRef::LangString(v, l) => {
                self.arena.pop(l);
                self.arena.pop(v);
            }
            LiteralRef::Typed(v, dt) => {
                match dt {
                    DatatypeRef::Named(d) => self.arena.pop(d),
                    DatatypeRef::Curie(prefix, local) => {
                        self.arena.pop(local);
                        if let Some(p) = prefix {
                            self.arena.pop(p);
                        }
                    }
                }
                self.arena.pop(v);
            }
        }
    }
}

/// Matches `keyword` case-insensitively at the read head, only if it is
/// not itself the prefix of a longer identifier (so `BASE` does not
/// misfire on a prefixed name like `base:foo`, and `a` does not misfire
/// on a local name like `abc`). Consumes `keyword.len()` bytes and
/// returns `true` on a match; otherwise consumes nothing.
fn try_match_keyword<S: ByteSource>(
    read: &mut ReadBuffer<S>,
    keyword: &str,
) -> Result<bool, TurtleError> {
    let n = keyword.len();
    let mut buf = vec![0u8; n + 1];
    read.peek_n(&mut buf, n + 1)?;
    let body_matches = keyword
        .as_bytes()
        .iter()
        .enumerate()
        .all(|(i, &kb)| buf[i].to_ascii_uppercase() == kb.to_ascii_uppercase());
    let boundary_ok = !lexer::is_name_byte(buf[n]) && buf[n] != b':';
    if body_matches && boundary_ok {
        for _ in 0..n {
            read.consume()?;
        }
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfio_api::parser::FnSink;

    fn triples(input: &str) -> Vec<String> {
        let mut parser = TurtleParser::new(input.as_bytes()).unwrap();
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
    fn prefixed_names_and_the_a_keyword() {
        let input = "@prefix schema: <http://schema.org/> .\n\
                     <http://example.com/foo> a schema:Person ; schema:name \"Foo\" .\n";
        let lines = triples(input);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("rdf-syntax-ns#type"));
        assert!(lines[0].ends_with("schema:Person"));
        assert_eq!(lines[1], "<http://example.com/foo> <http://schema.org/name> \"Foo\"");
    }

    #[test]
    fn numeric_and_boolean_literals_infer_datatypes() {
        let input = "<http://a/s> <http://a/p> 1, 1.5, 1.5e10, true .\n";
        let lines = triples(input);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("XMLSchema#integer>"));
        assert!(lines[1].ends_with("XMLSchema#decimal>"));
        assert!(lines[2].ends_with("XMLSchema#double>"));
        assert!(lines[3].ends_with("XMLSchema#boolean>"));
    }

    #[test]
    fn empty_and_nonempty_collections_expand_to_rdf_list() {
        let input = "<http://a/s> <http://a/p> ( 1 2 ) .\n<http://a/s> <http://a/p> () .\n";
        let lines = triples(input);
        // two items: (cell1 first 1), (cell1 rest cell2), (cell2 first 2), (cell2 rest nil)
        // plus the two outer triples referencing cell1 and nil.
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().any(|l| l.ends_with("rdf-syntax-ns#nil>")));
    }

    #[test]
    fn anonymous_blank_node_property_list_as_object() {
        let input = "<http://a/s> <http://a/p> [ <http://a/q> <http://a/r> ] .\n";
        let lines = triples(input);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("_:"));
    }

    #[test]
    fn relative_iri_resolves_against_base() {
        let input = "@base <http://example.com/a/> .\n<b> <http://a/p> <c> .\n";
        let lines = triples(input);
        assert_eq!(lines[0], "<http://example.com/a/b> <http://a/p> <http://example.com/a/c>");
    }

    #[test]
    fn long_string_with_embedded_newline_and_quote() {
        let input = "<http://a/s> <http://a/p> \"\"\"line one\nhas \"\"a quote\"\"\" .\n";
        let lines = triples(input);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("line one\nhas \"a quote"));
    }
}
