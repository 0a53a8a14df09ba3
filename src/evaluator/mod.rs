//! Executable node tree and its tree-walking evaluator.
//!
//! Every node execution yields a [`crate::runtime::ret::Return`]; anything
//! other than `Nothing` unwinds the enclosing blocks until the construct
//! owning the signal intercepts it.

pub mod evaluator;
pub mod node;

#[cfg(test)]
mod tests;
