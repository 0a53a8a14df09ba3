use std::ops::{Deref, DerefMut};

use crate::{
    errors::errors::{Error, ErrorImpl},
    evaluator::{
        evaluator::execute_chain,
        node::{Node, NodeKind},
    },
    parse_tree::parse_tree::{ParseKind, ParseNode},
    runtime::{ret::Return, scope::Scope},
    types::types::TypeRef,
    Position,
};

use super::{
    expr::{
        compile_boolean, compile_csv, compile_divide, compile_equal, compile_function_call,
        compile_greater, compile_integer, compile_less, compile_string, compile_subtraction,
        compile_summation, compile_variable,
    },
    stmt::{
        compile_break, compile_continue, compile_declaration, compile_function, compile_gets,
        compile_if, compile_return, compile_while,
    },
};

/// What a `return` may look like where a statement is being compiled.
#[derive(Debug, Clone)]
pub enum ReturnContext {
    /// Outside of any function: `return` is not allowed.
    TopLevel,
    /// Inside a function without a declared return type: bare `return` only.
    Procedure,
    /// Inside a function returning the given type.
    Typed(TypeRef),
}

/// Compile-time state: the type environment and how many `while` bodies of
/// the current function enclose the construct being compiled.
pub struct Compiler {
    pub scope: Scope,
    pub loop_depth: usize,
}

impl Compiler {
    pub fn new(scope: Scope) -> Self {
        Compiler {
            scope,
            loop_depth: 0,
        }
    }

    /// Pushes a compile-time block that is released when the guard goes out
    /// of scope.
    pub fn enter_block(&mut self) -> CompilerBlock<'_> {
        self.scope.create_block();
        CompilerBlock { compiler: self }
    }

    /// Runs `f` inside a fresh block that is released afterwards, whether or
    /// not `f` failed.
    pub fn with_block<T>(
        &mut self,
        f: impl FnOnce(&mut Compiler) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut block = self.enter_block();
        f(&mut *block)
    }
}

/// The compiler-side counterpart of `runtime::scope::BlockGuard`.
pub struct CompilerBlock<'a> {
    compiler: &'a mut Compiler,
}

impl Deref for CompilerBlock<'_> {
    type Target = Compiler;

    fn deref(&self) -> &Self::Target {
        self.compiler
    }
}

impl DerefMut for CompilerBlock<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.compiler
    }
}

impl Drop for CompilerBlock<'_> {
    fn drop(&mut self) {
        self.compiler.scope.release_block();
    }
}

/// Output of a successful compilation.
#[derive(Debug, PartialEq)]
pub struct Program {
    entry: Option<Box<Node>>,
}

impl Program {
    pub fn entry(&self) -> Option<&Node> {
        self.entry.as_deref()
    }

    /// Runs the program in a fresh root scope.
    pub fn run(&self) -> Return {
        self.run_in(&mut Scope::new())
    }

    /// Runs the program in a scope supplied by the host; top-level bindings
    /// land in its innermost block.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run_in(&self, scope: &mut Scope) -> Return {
        execute_chain(self.entry(), scope)
    }
}

/// Type checks the statement chain starting at `tree` and lowers it into an
/// executable program.
///
/// `scope` is consulted for names the host already provides. The compiler
/// works in a block of its own on a clone of it, so the host's bindings are
/// never modified. The first error stops compilation.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile(tree: Option<&ParseNode>, scope: &Scope) -> Result<Program, Error> {
    let mut compiler = Compiler::new(scope.clone());
    let entry = compiler.with_block(|compiler| {
        compile_block(compiler, tree, &ReturnContext::TopLevel, None)
    })?;

    tracing::debug!("compilation complete");
    Ok(Program { entry })
}

/// Compiles a sibling chain into a linked node chain.
///
/// When `required_return` carries a position, the chain must end with a
/// `return` statement; the position is reported for an empty chain.
pub fn compile_block(
    compiler: &mut Compiler,
    first: Option<&ParseNode>,
    context: &ReturnContext,
    required_return: Option<&Position>,
) -> Result<Option<Box<Node>>, Error> {
    let mut nodes = vec![];
    let mut last_position = None;
    for statement in first.into_iter().flat_map(|node| node.iter()) {
        let (node, _) = create_node(compiler, statement, false, context)?;
        last_position = Some(statement.token.position.clone());
        nodes.push(node);
    }

    if let Some(position) = required_return {
        let ends_with_return = matches!(
            nodes.last(),
            Some(Node {
                kind: NodeKind::Return { .. },
                ..
            })
        );
        if !ends_with_return {
            return Err(Error::new(
                ErrorImpl::ExpectedReturnStatement,
                last_position.unwrap_or_else(|| position.clone()),
            ));
        }
    }

    Ok(Node::link(nodes))
}

/// Lowers one parse node, returning the node and the type of its value
/// (`None` for constructs without one, such as `if`).
///
/// `conditional` is set for the condition of `if` and `while`, where `=`
/// compares instead of assigning.
pub fn create_node(
    compiler: &mut Compiler,
    node: &ParseNode,
    conditional: bool,
    context: &ReturnContext,
) -> Result<(Node, Option<TypeRef>), Error> {
    let (kind, typ) = create_node_kind(compiler, node, conditional, context)?;
    Ok((Node::new(kind, node.token.position.clone()), typ))
}

fn create_node_kind(
    compiler: &mut Compiler,
    node: &ParseNode,
    conditional: bool,
    context: &ReturnContext,
) -> Result<(NodeKind, Option<TypeRef>), Error> {
    match node.kind {
        ParseKind::Variable => compile_variable(compiler, node),
        ParseKind::String => compile_string(node),
        ParseKind::Integer => compile_integer(node),
        ParseKind::Boolean => compile_boolean(node),
        ParseKind::Summation => compile_summation(compiler, node),
        ParseKind::Subtraction => compile_subtraction(compiler, node),
        ParseKind::Divide => compile_divide(compiler, node),
        ParseKind::Equal => compile_equal(compiler, node),
        ParseKind::Less => compile_less(compiler, node),
        ParseKind::Greater => compile_greater(compiler, node),
        ParseKind::Csv => compile_csv(compiler, node),
        ParseKind::FunctionCall => compile_function_call(compiler, node),
        ParseKind::Declaration => compile_declaration(compiler, node),
        ParseKind::Gets => compile_gets(compiler, node, conditional),
        ParseKind::If => compile_if(compiler, node, context),
        ParseKind::While => compile_while(compiler, node, context),
        ParseKind::Function => compile_function(compiler, node),
        ParseKind::Return => compile_return(compiler, node, context),
        ParseKind::Break => compile_break(compiler, node),
        ParseKind::Continue => compile_continue(compiler, node),
    }
}

/// Fetches a required child, reporting a malformed tree when it is missing.
pub fn required_child<'a>(node: &'a ParseNode, index: usize) -> Result<&'a ParseNode, Error> {
    node.child(index).ok_or_else(|| {
        Error::new(
            ErrorImpl::MalformedTree {
                message: format!("{:?} is missing child {}", node.kind, index),
            },
            node.token.position.clone(),
        )
    })
}
