//! RDF data model shared by the streaming parsers.
//!
//! Every type here is a thin, `Copy`-able view over string slices borrowed
//! from the parser's internal buffers. Nothing in this module owns memory:
//! a `Triple` (or any node inside it) is valid only for the duration of the
//! sink call it was handed to.

use std::fmt;

/// An RDF IRI, stored verbatim (no normalisation, no percent-decoding).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct NamedNode<'a> {
    pub iri: &'a str,
}

impl<'a> fmt::Display for NamedNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// A compact URI of the form `prefix:local`, kept unexpanded.
///
/// Expanding a CURIE against the prefix mapping observed through
/// [`PrefixSink`](crate::parser::PrefixSink) is the caller's responsibility;
/// the parser never resolves one on its own (spec: Node kinds include
/// `CURIE` as distinct from `URI`).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct Curie<'a> {
    pub prefix: &'a str,
    pub local: &'a str,
}

impl<'a> fmt::Display for Curie<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

/// A blank node, identified only within the scope of a single document.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct BlankNode<'a> {
    pub id: &'a str,
}

impl<'a> fmt::Display for BlankNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.id)
    }
}

/// Either a full IRI or a not-yet-expanded CURIE, used for literal
/// datatypes (`^^xsd:integer` is a CURIE until a prefix sink expands it).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum NamedOrCurie<'a> {
    NamedNode(NamedNode<'a>),
    Curie(Curie<'a>),
}

impl<'a> fmt::Display for NamedOrCurie<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedOrCurie::NamedNode(n) => n.fmt(f),
            NamedOrCurie::Curie(c) => c.fmt(f),
        }
    }
}

impl<'a> From<NamedNode<'a>> for NamedOrCurie<'a> {
    fn from(node: NamedNode<'a>) -> Self {
        NamedOrCurie::NamedNode(node)
    }
}

impl<'a> From<Curie<'a>> for NamedOrCurie<'a> {
    fn from(curie: Curie<'a>) -> Self {
        NamedOrCurie::Curie(curie)
    }
}

/// An RDF literal. Never carries both a language tag and a datatype at
/// once (spec invariant, §8).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum Literal<'a> {
    Simple {
        value: &'a str,
    },
    LanguageTaggedString {
        value: &'a str,
        language: &'a str,
    },
    Typed {
        value: &'a str,
        datatype: NamedOrCurie<'a>,
    },
}

impl<'a> fmt::Display for Literal<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Simple { value } => write!(f, "{:?}", value),
            Literal::LanguageTaggedString { value, language } => {
                write!(f, "{:?}@{}", value, language)
            }
            Literal::Typed { value, datatype } => write!(f, "{:?}^^{}", value, datatype),
        }
    }
}

/// A node that may stand in subject or graph-name position.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum NamedOrBlankNode<'a> {
    NamedNode(NamedNode<'a>),
    Curie(Curie<'a>),
    BlankNode(BlankNode<'a>),
}

impl<'a> fmt::Display for NamedOrBlankNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedOrBlankNode::NamedNode(n) => n.fmt(f),
            NamedOrBlankNode::Curie(c) => c.fmt(f),
            NamedOrBlankNode::BlankNode(b) => b.fmt(f),
        }
    }
}

impl<'a> From<NamedNode<'a>> for NamedOrBlankNode<'a> {
    fn from(node: NamedNode<'a>) -> Self {
        NamedOrBlankNode::NamedNode(node)
    }
}

impl<'a> From<Curie<'a>> for NamedOrBlankNode<'a> {
    fn from(curie: Curie<'a>) -> Self {
        NamedOrBlankNode::Curie(curie)
    }
}

impl<'a> From<BlankNode<'a>> for NamedOrBlankNode<'a> {
    fn from(node: BlankNode<'a>) -> Self {
        NamedOrBlankNode::BlankNode(node)
    }
}

/// A node that may stand in object position.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum Term<'a> {
    NamedNode(NamedNode<'a>),
    Curie(Curie<'a>),
    BlankNode(BlankNode<'a>),
    Literal(Literal<'a>),
}

impl<'a> fmt::Display for Term<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(n) => n.fmt(f),
            Term::Curie(c) => c.fmt(f),
            Term::BlankNode(b) => b.fmt(f),
            Term::Literal(l) => l.fmt(f),
        }
    }
}

impl<'a> From<NamedNode<'a>> for Term<'a> {
    fn from(node: NamedNode<'a>) -> Self {
        Term::NamedNode(node)
    }
}

impl<'a> From<Curie<'a>> for Term<'a> {
    fn from(curie: Curie<'a>) -> Self {
        Term::Curie(curie)
    }
}

impl<'a> From<BlankNode<'a>> for Term<'a> {
    fn from(node: BlankNode<'a>) -> Self {
        Term::BlankNode(node)
    }
}

impl<'a> From<Literal<'a>> for Term<'a> {
    fn from(literal: Literal<'a>) -> Self {
        Term::Literal(literal)
    }
}

impl<'a> From<NamedOrBlankNode<'a>> for Term<'a> {
    fn from(node: NamedOrBlankNode<'a>) -> Self {
        match node {
            NamedOrBlankNode::NamedNode(n) => Term::NamedNode(n),
            NamedOrBlankNode::Curie(c) => Term::Curie(c),
            NamedOrBlankNode::BlankNode(b) => Term::BlankNode(b),
        }
    }
}

/// Bitset describing the anonymous-node / collection context a statement
/// was produced under (spec §6 "Flags").
///
/// `ANON_CONT` is the only flag that survives across statements within the
/// same `[ ... ]` scope; the others are one-shot and apply to the statement
/// they are attached to.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub struct StatementFlags(u8);

impl StatementFlags {
    pub const EMPTY_S: StatementFlags = StatementFlags(1 << 0);
    pub const EMPTY_O: StatementFlags = StatementFlags(1 << 1);
    pub const ANON_S_BEGIN: StatementFlags = StatementFlags(1 << 2);
    pub const ANON_O_BEGIN: StatementFlags = StatementFlags(1 << 3);
    pub const ANON_CONT: StatementFlags = StatementFlags(1 << 4);

    pub const fn empty() -> Self {
        StatementFlags(0)
    }

    pub fn contains(self, other: StatementFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: StatementFlags) {
        self.0 |= other.0;
    }

    /// Keeps only the flags that are allowed to persist across statements
    /// (`ANON_CONT`), clearing every one-shot flag. Called after every
    /// sink invocation (spec §4.6).
    pub fn retain_sticky(&mut self) {
        self.0 &= Self::ANON_CONT.0;
    }
}

impl std::ops::BitOr for StatementFlags {
    type Output = StatementFlags;

    fn bitor(self, rhs: StatementFlags) -> StatementFlags {
        StatementFlags(self.0 | rhs.0)
    }
}

/// A single RDF statement delivered to [`StatementSink`](crate::parser::StatementSink).
///
/// `graph` is always `None` for Turtle/N-Triples input; the field is kept
/// so the sink signature does not need to change if a quad syntax is added
/// later (spec §3, `ReadContext`: "current graph, always null in Turtle").
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Triple<'a> {
    pub graph: Option<NamedOrBlankNode<'a>>,
    pub subject: NamedOrBlankNode<'a>,
    pub predicate: NamedNode<'a>,
    pub object: Term<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_retain_only_anon_cont() {
        let mut flags = StatementFlags::EMPTY_O | StatementFlags::ANON_CONT;
        assert!(flags.contains(StatementFlags::EMPTY_O));
        flags.retain_sticky();
        assert!(!flags.contains(StatementFlags::EMPTY_O));
        assert!(flags.contains(StatementFlags::ANON_CONT));
    }

    #[test]
    fn display_matches_turtle_surface_forms() {
        let n = NamedNode { iri: "http://example.com/x" };
        assert_eq!(format!("{}", n), "<http://example.com/x>");
        let b = BlankNode { id: "g1" };
        assert_eq!(format!("{}", b), "_:g1");
        let c = Curie { prefix: "xsd", local: "integer" };
        assert_eq!(format!("{}", c), "xsd:integer");
    }
}
