//! Shorthand constructors for building parse trees in unit tests.

use std::rc::Rc;

use crate::{
    compiler::compiler::{compile, Program},
    errors::errors::Error,
    runtime::{ret::Return, scope::Scope},
    Position,
};

use super::parse_tree::{ParseKind, ParseNode, Token};

pub fn position(offset: u32) -> Position {
    Position(offset, Rc::new("test.sel".to_string()))
}

pub fn token(value: &str) -> Token {
    Token::new(value, Position::null())
}

pub fn variable(name: &str) -> ParseNode {
    ParseNode::new(ParseKind::Variable, token(name))
}

pub fn integer(value: i64) -> ParseNode {
    ParseNode::new(ParseKind::Integer, token(&value.to_string()))
}

pub fn string(value: &str) -> ParseNode {
    ParseNode::new(ParseKind::String, token(value))
}

pub fn boolean(value: bool) -> ParseNode {
    ParseNode::new(ParseKind::Boolean, token(&value.to_string()))
}

pub fn binary(kind: ParseKind, operator: &str, left: ParseNode, right: ParseNode) -> ParseNode {
    ParseNode::new(kind, token(operator))
        .with_child(left)
        .with_child(right)
}

pub fn negate(operand: ParseNode) -> ParseNode {
    ParseNode::new(ParseKind::Subtraction, token("-"))
        .with_optional_child(None)
        .with_child(operand)
}

pub fn gets(left: ParseNode, right: ParseNode) -> ParseNode {
    binary(ParseKind::Gets, "=", left, right)
}

pub fn declaration(keyword: &str, name: &str) -> ParseNode {
    ParseNode::new(ParseKind::Declaration, token(keyword)).with_token2(token(name))
}

pub fn csv(elements: Vec<ParseNode>) -> ParseNode {
    elements
        .into_iter()
        .fold(ParseNode::new(ParseKind::Csv, token(",")), ParseNode::with_child)
}

pub fn if_(condition: ParseNode, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::new(ParseKind::If, token("if"))
        .with_child(condition)
        .with_optional_child(ParseNode::chain(body))
}

pub fn while_(condition: ParseNode, body: Vec<ParseNode>) -> ParseNode {
    ParseNode::new(ParseKind::While, token("while"))
        .with_child(condition)
        .with_optional_child(ParseNode::chain(body))
}

/// `function <return_type> <name>(<keyword> <parameter>, ..) { body }`.
pub fn function(
    name: Option<&str>,
    parameters: &[(&str, &str)],
    return_type: Option<&str>,
    body: Vec<ParseNode>,
) -> ParseNode {
    let mut node = ParseNode::new(ParseKind::Function, token("function"))
        .with_optional_child(ParseNode::chain(body));
    for (keyword, parameter) in parameters {
        node = node.with_parameter(declaration(keyword, parameter));
    }
    if let Some(name) = name {
        node = node.with_token2(token(name));
    }
    if let Some(return_type) = return_type {
        node = node.with_token3(token(return_type));
    }
    node
}

pub fn call(name: &str, arguments: Vec<ParseNode>) -> ParseNode {
    arguments
        .into_iter()
        .fold(ParseNode::new(ParseKind::FunctionCall, token(name)), ParseNode::with_parameter)
}

pub fn ret(value: Option<ParseNode>) -> ParseNode {
    ParseNode::new(ParseKind::Return, token("return")).with_optional_child(value)
}

pub fn compile_statements(statements: Vec<ParseNode>) -> Result<Program, Error> {
    compile(ParseNode::chain(statements).as_ref(), &Scope::new())
}

/// Compiles and runs `statements`, panicking on compile errors.
pub fn run_statements(statements: Vec<ParseNode>, scope: &mut Scope) -> Return {
    compile(ParseNode::chain(statements).as_ref(), scope)
        .unwrap()
        .run_in(scope)
}
