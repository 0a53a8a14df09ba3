#![allow(clippy::module_inception)]

//! Semantic analysis and execution core for the selinus scripting language.
//!
//! A parse tree goes in, is type checked and lowered by [`compiler`] into a
//! linked chain of executable nodes, and is run by [`evaluator`] against a
//! [`runtime::scope::Scope`].

use std::{fmt::Display, rc::Rc};

pub mod compiler;
pub mod errors;
pub mod evaluator;
pub mod parse_tree;
pub mod runtime;
pub mod types;

pub use compiler::compiler::{compile, Program};

/// Byte offset into a source file, plus the file's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.1, self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::Position;

    #[test]
    fn test_position_display() {
        let position = Position(17, Rc::new(String::from("main.sel")));
        assert_eq!(position.to_string(), "main.sel:17");
        assert_eq!(Position::null().to_string(), "<null>:0");
    }
}
