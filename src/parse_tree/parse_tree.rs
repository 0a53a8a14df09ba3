use crate::Position;

/// Grammar constructs the compiler understands.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ParseKind {
    Variable,
    String,
    Integer,
    Boolean,
    Summation,
    Subtraction,
    Divide,
    Equal,
    Less,
    Greater,
    Csv,
    Declaration,
    Gets,
    If,
    While,
    Function,
    FunctionCall,
    Return,
    Break,
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: String,
    pub position: Position,
}

impl Token {
    pub fn new(value: &str, position: Position) -> Self {
        Token {
            value: value.to_string(),
            position,
        }
    }
}

/// One node of the parse tree handed over by the parser.
///
/// Layout per kind:
///
/// * binary operators: `children = [left, right]`; unary minus leaves the
///   left slot empty
/// * `Csv`: one child per element
/// * `Declaration`: `token` is the type keyword, `token2` the identifier
/// * `Gets`: `children = [left, right]`
/// * `If`, `While`: `children = [condition, body]`, the body being the
///   first statement of a chain linked through `next`
/// * `Function`: `children = [body]`, `parameters` are declarations,
///   `token2` is the name (absent for lambdas), `token3` the return type
/// * `FunctionCall`: `token` is the callee name, `parameters` the arguments
/// * `Return`: optional single child
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    pub kind: ParseKind,
    pub children: Vec<Option<ParseNode>>,
    pub parameters: Vec<ParseNode>,
    pub token: Token,
    pub token2: Option<Token>,
    pub token3: Option<Token>,
    pub next: Option<Box<ParseNode>>,
}

impl ParseNode {
    pub fn new(kind: ParseKind, token: Token) -> Self {
        ParseNode {
            kind,
            children: vec![],
            parameters: vec![],
            token,
            token2: None,
            token3: None,
            next: None,
        }
    }

    pub fn with_child(mut self, child: ParseNode) -> Self {
        self.children.push(Some(child));
        self
    }

    /// Appends a child slot that may be empty (missing operand or body).
    pub fn with_optional_child(mut self, child: Option<ParseNode>) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_parameter(mut self, parameter: ParseNode) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_token2(mut self, token: Token) -> Self {
        self.token2 = Some(token);
        self
    }

    pub fn with_token3(mut self, token: Token) -> Self {
        self.token3 = Some(token);
        self
    }

    /// Links `statements` into a sibling chain and returns its head.
    pub fn chain(statements: Vec<ParseNode>) -> Option<ParseNode> {
        statements.into_iter().rev().fold(None, |next, mut statement| {
            statement.next = next.map(Box::new);
            Some(statement)
        })
    }

    pub fn child(&self, index: usize) -> Option<&ParseNode> {
        self.children.get(index).and_then(|child| child.as_ref())
    }

    /// This node followed by its siblings.
    pub fn iter(&self) -> ParseNodeIter<'_> {
        ParseNodeIter {
            current: Some(self),
        }
    }
}

pub struct ParseNodeIter<'a> {
    current: Option<&'a ParseNode>,
}

impl<'a> Iterator for ParseNodeIter<'a> {
    type Item = &'a ParseNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = current.next.as_deref();
        Some(current)
    }
}
