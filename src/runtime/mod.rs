//! Runtime data model shared by the compiler and the evaluator.
//!
//! - `pointer`: runtime values and the shared cells that hold them
//! - `scope`: nested blocks of name bindings
//! - `ret`: the control-flow signal every execution step returns
//! - `function`: parameters, callable values and call-frame setup

pub mod function;
pub mod pointer;
pub mod ret;
pub mod scope;
