use std::rc::Rc;

use crate::{
    errors::errors::{Error, ErrorImpl},
    evaluator::node::{FunctionDefinition, Node, NodeKind},
    parse_tree::parse_tree::{ParseKind, ParseNode, Token},
    runtime::function::Parameter,
    types::types::{builtin_type, Type, TypeRef, BOOLEAN_TYPE},
};

use super::{
    compiler::{compile_block, create_node, required_child, Compiler, ReturnContext},
    expr::{compile_conditional_equal, conforms},
};

type Lowered = Result<(NodeKind, Option<TypeRef>), Error>;

fn resolve_type(token: &Token) -> Result<TypeRef, Error> {
    builtin_type(&token.value).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownType {
                type_: token.value.clone(),
            },
            token.position.clone(),
        )
    })
}

fn identifier(node: &ParseNode) -> Result<String, Error> {
    match &node.token2 {
        Some(token) if !token.value.is_empty() => Ok(token.value.clone()),
        _ => Err(Error::new(
            ErrorImpl::MalformedTree {
                message: format!("{} declaration without identifier", node.token.value),
            },
            node.token.position.clone(),
        )),
    }
}

/// `var x`, `int x`, `string x`, `bool x`.
pub fn compile_declaration(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let typ = resolve_type(&node.token)?;
    let identifier = identifier(node)?;
    compiler.scope.declare(&identifier, typ.clone());

    Ok((
        NodeKind::Declaration {
            identifier,
            typ: typ.clone(),
        },
        Some(typ),
    ))
}

/// Assignment, or an integer comparison inside a condition.
///
/// The right side is compiled first and decides the result type. An
/// undeclared identifier on the left is declared at that type.
pub fn compile_gets(compiler: &mut Compiler, node: &ParseNode, conditional: bool) -> Lowered {
    if conditional {
        return compile_conditional_equal(compiler, node);
    }

    let left_tree = required_child(node, 0)?;
    let right_tree = required_child(node, 1)?;

    let (right, right_type) = create_node(compiler, right_tree, false, &ReturnContext::TopLevel)?;
    let right_type = right_type.ok_or_else(|| {
        Error::new(
            ErrorImpl::RightSideWithoutValue,
            node.token.position.clone(),
        )
    })?;

    let (left, left_type) = compile_left_side(compiler, left_tree, &right_type)?;
    let compatible = left_type
        .as_ref()
        .is_some_and(|left_type| right_type.is_compatible(left_type));
    if !compatible {
        return Err(Error::new(
            ErrorImpl::IncompatibleTypes,
            node.token.position.clone(),
        ));
    }

    Ok((
        NodeKind::Set {
            left: Box::new(left),
            right: Box::new(right),
        },
        Some(right_type),
    ))
}

fn compile_left_side(
    compiler: &mut Compiler,
    node: &ParseNode,
    typ: &TypeRef,
) -> Result<(Node, Option<TypeRef>), Error> {
    let name = &node.token.value;
    if node.kind == ParseKind::Variable && compiler.scope.must_get(name).is_none() {
        compiler.scope.declare(name, typ.clone());
        let declaration = NodeKind::Declaration {
            identifier: name.clone(),
            typ: typ.clone(),
        };
        return Ok((
            Node::new(declaration, node.token.position.clone()),
            Some(typ.clone()),
        ));
    }

    create_node(compiler, node, false, &ReturnContext::TopLevel)
}

fn compile_condition(compiler: &mut Compiler, node: &ParseNode) -> Result<Box<Node>, Error> {
    let condition_tree = required_child(node, 0)?;
    let (condition, typ) = create_node(compiler, condition_tree, true, &ReturnContext::TopLevel)?;
    if !conforms(&typ, &BOOLEAN_TYPE) {
        return Err(Error::new(
            ErrorImpl::ExpectedBoolean,
            condition_tree.token.position.clone(),
        ));
    }
    Ok(Box::new(condition))
}

/// The body inherits the return context but, unlike a function body, may
/// end without `return`.
pub fn compile_if(compiler: &mut Compiler, node: &ParseNode, context: &ReturnContext) -> Lowered {
    let condition = compile_condition(compiler, node)?;
    let body = compiler.with_block(|compiler| compile_block(compiler, node.child(1), context, None))?;

    Ok((NodeKind::Condition { condition, body }, None))
}

pub fn compile_while(compiler: &mut Compiler, node: &ParseNode, context: &ReturnContext) -> Lowered {
    let condition = compile_condition(compiler, node)?;

    compiler.loop_depth += 1;
    let body = compiler.with_block(|compiler| compile_block(compiler, node.child(1), context, None));
    compiler.loop_depth -= 1;

    Ok((NodeKind::Loop { condition, body: body? }, None))
}

fn parameterize(node: &ParseNode) -> Result<Parameter, Error> {
    Ok(Parameter {
        typ: resolve_type(&node.token)?,
        name: identifier(node)?,
        default_value: None,
    })
}

/// Named functions and lambdas.
///
/// A named function is declared in the enclosing scope before its body is
/// compiled, and again in the body's own scope so it can call itself. The
/// body sees the enclosing names through a cloned scope, never leaks its
/// own declarations, and must end with `return` when a return type is
/// declared.
pub fn compile_function(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let parameters = node
        .parameters
        .iter()
        .map(parameterize)
        .collect::<Result<Vec<Parameter>, Error>>()?;

    let return_type = match &node.token3 {
        Some(token) if !token.value.is_empty() => Some(resolve_type(token)?),
        _ => None,
    };
    let typ = Type::function(
        return_type.clone(),
        parameters.iter().map(|parameter| parameter.typ.clone()).collect(),
    );

    let name = node
        .token2
        .as_ref()
        .filter(|token| !token.value.is_empty())
        .map(|token| token.value.clone());

    let body_scope = match &name {
        Some(name) => {
            compiler.scope.declare(name, typ.clone());
            compiler.scope.clone_with_name(name, typ.clone())
        }
        None => compiler.scope.clone(),
    };

    let context = match &return_type {
        Some(return_type) => ReturnContext::Typed(return_type.clone()),
        None => ReturnContext::Procedure,
    };
    let required_return = return_type.as_ref().map(|_| &node.token.position);

    let outer_scope = std::mem::replace(&mut compiler.scope, body_scope);
    let outer_loop_depth = std::mem::replace(&mut compiler.loop_depth, 0);
    let body = compiler.with_block(|compiler| {
        for parameter in &parameters {
            compiler.scope.declare(&parameter.name, parameter.typ.clone());
        }
        compile_block(compiler, node.child(0), &context, required_return)
    });
    compiler.scope = outer_scope;
    compiler.loop_depth = outer_loop_depth;
    let body = body?;

    tracing::debug!(name = name.as_deref().unwrap_or("<lambda>"), %typ, "compiled function");

    Ok((
        NodeKind::Function(FunctionDefinition {
            name,
            typ: typ.clone(),
            parameters,
            entry_node: body.map(Rc::from),
        }),
        Some(typ),
    ))
}

pub fn compile_return(compiler: &mut Compiler, node: &ParseNode, context: &ReturnContext) -> Lowered {
    let unexpected = || {
        Error::new(
            ErrorImpl::UnexpectedReturnStatement,
            node.token.position.clone(),
        )
    };

    match context {
        ReturnContext::TopLevel => Err(unexpected()),
        ReturnContext::Procedure => match node.child(0) {
            Some(_) => Err(unexpected()),
            None => Ok((NodeKind::Return { value: None }, None)),
        },
        ReturnContext::Typed(expected) => {
            let value_tree = node.child(0).ok_or_else(|| {
                Error::new(
                    ErrorImpl::ExpectedReturnValue,
                    node.token.position.clone(),
                )
            })?;
            let (value, typ) = create_node(compiler, value_tree, false, context)?;
            if !conforms(&typ, expected) {
                return Err(Error::new(
                    ErrorImpl::ReturnTypeMismatch,
                    node.token.position.clone(),
                ));
            }

            Ok((
                NodeKind::Return {
                    value: Some(Box::new(value)),
                },
                typ,
            ))
        }
    }
}

fn loop_control(compiler: &Compiler, node: &ParseNode, kind: NodeKind, keyword: &str) -> Lowered {
    if compiler.loop_depth == 0 {
        return Err(Error::new(
            ErrorImpl::UnexpectedControlFlow {
                keyword: keyword.to_string(),
            },
            node.token.position.clone(),
        ));
    }
    Ok((kind, None))
}

pub fn compile_break(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    loop_control(compiler, node, NodeKind::Break, "break")
}

pub fn compile_continue(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    loop_control(compiler, node, NodeKind::Continue, "continue")
}
