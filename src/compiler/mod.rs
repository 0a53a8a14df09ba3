//! Type checking and lowering of parse trees.
//!
//! This module turns a parse tree into the executable node chain run by
//! the evaluator, rejecting ill-typed programs on the way. It handles:
//!
//! - Resolution of names against the compile-time scope
//! - Operand, assignment, argument and return type checks
//! - Function signatures, recursion and return-statement requirements
//! - Placement rules for `return`, `break` and `continue`

pub mod compiler;
pub mod expr;
pub mod stmt;
