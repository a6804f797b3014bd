//! Traits implemented by callers to receive parsed directives and triples.
//!
//! The parser is a blocking pull-parser (spec §5): it drives itself to
//! completion on the caller's thread, invoking [`TripleSink`] methods
//! synchronously. A sink may abort the parse at any point by returning
//! [`ControlFlow::Break`]; the parser then stops mid-document and the
//! outer `parse_all` call reports a sink-initiated abort.

use crate::model::{BlankNode, NamedNode, StatementFlags, Triple};
use std::ops::ControlFlow;

/// Receives the events a [`TripleParser`] produces.
///
/// Every method has a no-op default except [`triple`](TripleSink::triple):
/// N-Triples input never calls `base`, `prefix` or `end_anonymous`, so a
/// sink that only cares about triples needs to implement one method.
pub trait TripleSink {
    /// Called once for every `@base`/`BASE` directive.
    fn base(&mut self, _iri: NamedNode<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called once for every `@prefix`/`PREFIX` directive.
    fn prefix(&mut self, _name: &str, _iri: NamedNode<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called once per parsed triple, in document order.
    fn triple(&mut self, flags: StatementFlags, triple: Triple<'_>) -> ControlFlow<()>;

    /// Called when a `[ ... ]` anonymous-node scope closes, naming the
    /// blank node that scope minted.
    fn end_anonymous(&mut self, _node: BlankNode<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// A streaming parser that drives itself over its input, calling into a
/// [`TripleSink`] as it goes.
pub trait TripleParser {
    type Error;

    /// Parses forward until the next triple (or directive) has been
    /// delivered to `sink`, or the input is exhausted.
    fn parse_step<S: TripleSink>(&mut self, sink: &mut S) -> Result<(), Self::Error>;

    /// `true` once the whole input has been consumed.
    fn is_end(&self) -> bool;

    /// Runs [`parse_step`](TripleParser::parse_step) until [`is_end`](TripleParser::is_end).
    fn parse_all<S: TripleSink>(&mut self, sink: &mut S) -> Result<(), Self::Error> {
        while !self.is_end() {
            self.parse_step(sink)?;
        }
        Ok(())
    }
}

/// Adapts a plain `FnMut(Triple) -> ControlFlow<()>` closure into a
/// [`TripleSink`] that ignores directives and anonymous-scope-end events.
///
/// Convenient for the common case (N-Triples, or Turtle callers who do not
/// need `@base`/`@prefix` echoed back).
pub struct FnSink<F>(pub F);

impl<F> TripleSink for FnSink<F>
where
    F: FnMut(Triple<'_>) -> ControlFlow<()>,
{
    fn triple(&mut self, _flags: StatementFlags, triple: Triple<'_>) -> ControlFlow<()> {
        (self.0)(triple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NamedNode, NamedOrBlankNode, Term};

    struct CountingParser {
        remaining: u32,
    }

    impl TripleParser for CountingParser {
        type Error = std::convert::Infallible;

        fn parse_step<S: TripleSink>(&mut self, sink: &mut S) -> Result<(), Self::Error> {
            let s = NamedNode { iri: "http://example.com/s" };
            let p = NamedNode { iri: "http://example.com/p" };
            let o = NamedNode { iri: "http://example.com/o" };
            sink.triple(
                StatementFlags::empty(),
                Triple {
                    graph: None,
                    subject: NamedOrBlankNode::NamedNode(s),
                    predicate: p,
                    object: Term::NamedNode(o),
                },
            );
            self.remaining -= 1;
            Ok(())
        }

        fn is_end(&self) -> bool {
            self.remaining == 0
        }
    }

    #[test]
    fn parse_all_runs_until_end() {
        let mut parser = CountingParser { remaining: 3 };
        let mut count = 0;
        parser
            .parse_all(&mut FnSink(|_| {
                count += 1;
                ControlFlow::Continue(())
            }))
            .unwrap();
        assert_eq!(count, 3);
    }
}
