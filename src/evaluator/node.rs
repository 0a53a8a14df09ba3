use std::rc::Rc;

use crate::{runtime::function::Parameter, types::types::TypeRef, Position};

/// A compiled construct, linked to the next statement of its block.
#[derive(Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Position of the token the construct was compiled from.
    pub position: Position,
    pub next: Option<Box<Node>>,
}

#[derive(Debug, PartialEq)]
pub enum NodeKind {
    Variable {
        name: String,
    },
    Integer {
        value: i64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool,
    },
    Summation {
        left: Box<Node>,
        right: Box<Node>,
    },
    Concatenation {
        left: Box<Node>,
        right: Box<Node>,
    },
    /// A missing left operand reads as `0`.
    Subtraction {
        left: Option<Box<Node>>,
        right: Box<Node>,
    },
    Division {
        left: Box<Node>,
        right: Box<Node>,
    },
    Equality {
        left: Box<Node>,
        right: Box<Node>,
    },
    Less {
        left: Box<Node>,
        right: Box<Node>,
    },
    Greater {
        left: Box<Node>,
        right: Box<Node>,
    },
    Csv {
        children: Vec<Node>,
        typ: TypeRef,
    },
    Declaration {
        identifier: String,
        typ: TypeRef,
    },
    Set {
        left: Box<Node>,
        right: Box<Node>,
    },
    Condition {
        condition: Box<Node>,
        body: Option<Box<Node>>,
    },
    Loop {
        condition: Box<Node>,
        body: Option<Box<Node>>,
    },
    Function(FunctionDefinition),
    FunctionCall {
        name: String,
        arguments: Vec<Node>,
    },
    Return {
        value: Option<Box<Node>>,
    },
    Break,
    Continue,
}

/// Everything a function node needs to build a function value at runtime.
#[derive(Debug, PartialEq)]
pub struct FunctionDefinition {
    /// `None` for lambdas.
    pub name: Option<String>,
    pub typ: TypeRef,
    pub parameters: Vec<Parameter>,
    pub entry_node: Option<Rc<Node>>,
}

impl Node {
    pub fn new(kind: NodeKind, position: Position) -> Self {
        Node {
            kind,
            position,
            next: None,
        }
    }

    /// Links a block's statements and returns the head of the chain.
    pub fn link(nodes: Vec<Node>) -> Option<Box<Node>> {
        nodes.into_iter().rev().fold(None, |next, mut node| {
            node.next = next;
            Some(Box::new(node))
        })
    }

    /// This node followed by the rest of its block.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter {
            current: Some(self),
        }
    }
}

pub struct NodeIter<'a> {
    current: Option<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = current.next.as_deref();
        Some(current)
    }
}
