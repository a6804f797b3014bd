//! Data model and sink traits shared by the `rdfio` streaming RDF parsers.
//!
//! This crate has no parsing logic of its own. It exists so that a sink
//! implementation can depend on the node types and traits without pulling
//! in a tokenizer, the same way `rio_api` sits underneath `rio_turtle`.

pub mod model;
pub mod parser;
