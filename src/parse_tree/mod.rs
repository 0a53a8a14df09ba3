//! Parse tree consumed by the compiler.
//!
//! Tokenizing and parsing happen outside this crate; the parser produces
//! `ParseNode`s, each tagged with a `ParseKind`, its ordered children and
//! parameters, and up to three source tokens.

pub mod parse_tree;

#[cfg(test)]
pub(crate) mod testing;
