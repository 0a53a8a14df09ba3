use crate::{
    errors::errors::{Error, ErrorImpl},
    evaluator::node::{Node, NodeKind},
    parse_tree::parse_tree::ParseNode,
    types::types::{
        Type, TypeRef, BOOLEAN_TYPE, FUNCTION_TYPE, INTEGER_TYPE, STRING_TYPE, VOID_TYPE,
    },
};

use super::compiler::{create_node, required_child, Compiler, ReturnContext};

type Lowered = Result<(NodeKind, Option<TypeRef>), Error>;

/// Whether a possibly absent type can be used where `target` is expected.
pub fn conforms(typ: &Option<TypeRef>, target: &Type) -> bool {
    typ.as_ref().is_some_and(|typ| typ.is_compatible(target))
}

fn incompatible_operand(operator: &str, operand: &ParseNode) -> Error {
    Error::new(
        ErrorImpl::IncompatibleOperand {
            operator: operator.to_string(),
            operand: operand.token.value.clone(),
        },
        operand.token.position.clone(),
    )
}

/// Compiles an operand outside of any statement context.
fn compile_operand(
    compiler: &mut Compiler,
    operand: &ParseNode,
) -> Result<(Box<Node>, Option<TypeRef>), Error> {
    let (node, typ) = create_node(compiler, operand, false, &ReturnContext::TopLevel)?;
    Ok((Box::new(node), typ))
}

/// Compiles both operands of a binary operator and requires them to be
/// integers.
fn integer_operands(
    compiler: &mut Compiler,
    node: &ParseNode,
    operator: &str,
) -> Result<(Box<Node>, Box<Node>), Error> {
    let left_tree = required_child(node, 0)?;
    let right_tree = required_child(node, 1)?;
    let (left, left_type) = compile_operand(compiler, left_tree)?;
    let (right, right_type) = compile_operand(compiler, right_tree)?;

    if !conforms(&left_type, &INTEGER_TYPE) {
        return Err(incompatible_operand(operator, left_tree));
    }
    if !conforms(&right_type, &INTEGER_TYPE) {
        return Err(incompatible_operand(operator, right_tree));
    }
    Ok((left, right))
}

pub fn compile_variable(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let name = &node.token.value;
    let pointer = compiler.scope.get(name).map_err(|_| {
        Error::new(
            ErrorImpl::VariableNotDeclared {
                variable: name.clone(),
            },
            node.token.position.clone(),
        )
    })?;

    Ok((
        NodeKind::Variable { name: name.clone() },
        Some(pointer.get_type()),
    ))
}

pub fn compile_string(node: &ParseNode) -> Lowered {
    Ok((
        NodeKind::String {
            value: node.token.value.clone(),
        },
        Some(STRING_TYPE.clone()),
    ))
}

pub fn compile_integer(node: &ParseNode) -> Lowered {
    let value = node.token.value.parse::<i64>().map_err(|_| {
        Error::new(
            ErrorImpl::InvalidInteger {
                token: node.token.value.clone(),
            },
            node.token.position.clone(),
        )
    })?;

    Ok((NodeKind::Integer { value }, Some(INTEGER_TYPE.clone())))
}

pub fn compile_boolean(node: &ParseNode) -> Lowered {
    Ok((
        NodeKind::Boolean {
            value: node.token.value == "true",
        },
        Some(BOOLEAN_TYPE.clone()),
    ))
}

/// `+` adds two integers or concatenates two strings.
pub fn compile_summation(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let left_tree = required_child(node, 0)?;
    let right_tree = required_child(node, 1)?;
    let (left, left_type) = compile_operand(compiler, left_tree)?;
    let (right, right_type) = compile_operand(compiler, right_tree)?;

    if conforms(&left_type, &INTEGER_TYPE) && conforms(&right_type, &INTEGER_TYPE) {
        return Ok((
            NodeKind::Summation { left, right },
            Some(INTEGER_TYPE.clone()),
        ));
    }
    if conforms(&left_type, &STRING_TYPE) && conforms(&right_type, &STRING_TYPE) {
        return Ok((
            NodeKind::Concatenation { left, right },
            Some(STRING_TYPE.clone()),
        ));
    }

    let left_usable = conforms(&left_type, &INTEGER_TYPE) || conforms(&left_type, &STRING_TYPE);
    if left_usable {
        Err(incompatible_operand("+", right_tree))
    } else {
        Err(incompatible_operand("+", left_tree))
    }
}

/// `-`, with an absent left operand meaning `0 - right`.
pub fn compile_subtraction(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let left = match node.child(0) {
        Some(left_tree) => {
            let (left, left_type) = compile_operand(compiler, left_tree)?;
            if !conforms(&left_type, &INTEGER_TYPE) {
                return Err(incompatible_operand("-", left_tree));
            }
            Some(left)
        }
        None => None,
    };

    let right_tree = required_child(node, 1)?;
    let (right, right_type) = compile_operand(compiler, right_tree)?;
    if !conforms(&right_type, &INTEGER_TYPE) {
        return Err(incompatible_operand("-", right_tree));
    }

    Ok((
        NodeKind::Subtraction { left, right },
        Some(INTEGER_TYPE.clone()),
    ))
}

/// `/`; a zero divisor is only caught when the program runs.
pub fn compile_divide(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let (left, right) = integer_operands(compiler, node, "/")?;
    Ok((NodeKind::Division { left, right }, Some(INTEGER_TYPE.clone())))
}

pub fn compile_equal(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let (left, right) = integer_operands(compiler, node, "==")?;
    Ok((NodeKind::Equality { left, right }, Some(BOOLEAN_TYPE.clone())))
}

/// `=` inside an `if` or `while` condition.
pub fn compile_conditional_equal(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let (left, right) = integer_operands(compiler, node, "=")?;
    Ok((NodeKind::Equality { left, right }, Some(BOOLEAN_TYPE.clone())))
}

pub fn compile_less(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let (left, right) = integer_operands(compiler, node, "<")?;
    Ok((NodeKind::Less { left, right }, Some(BOOLEAN_TYPE.clone())))
}

pub fn compile_greater(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let (left, right) = integer_operands(compiler, node, ">")?;
    Ok((NodeKind::Greater { left, right }, Some(BOOLEAN_TYPE.clone())))
}

/// A comma separated list; its type is a `Set` of the element types.
pub fn compile_csv(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let mut children = vec![];
    let mut types = vec![];
    for child in node.children.iter().flatten() {
        let (child_node, child_type) =
            create_node(compiler, child, false, &ReturnContext::TopLevel)?;
        children.push(child_node);
        types.push(child_type.unwrap_or_else(|| VOID_TYPE.clone()));
    }

    let typ = Type::set(types);
    Ok((
        NodeKind::Csv {
            children,
            typ: typ.clone(),
        },
        Some(typ),
    ))
}

/// A call by name. The argument count must match the declared parameters
/// exactly and every argument must be compatible with its parameter.
pub fn compile_function_call(compiler: &mut Compiler, node: &ParseNode) -> Lowered {
    let name = &node.token.value;
    let position = node.token.position.clone();

    let callee = compiler.scope.must_get(name).ok_or_else(|| {
        Error::new(
            ErrorImpl::FunctionNotDefined {
                function: name.clone(),
            },
            position.clone(),
        )
    })?;
    let signature = callee.get_type();
    if !signature.is_compatible(&FUNCTION_TYPE) {
        return Err(Error::new(
            ErrorImpl::NotAFunction { name: name.clone() },
            position,
        ));
    }

    let parameters = signature.parameter_types();
    let given = node.parameters.len();
    let expected = parameters.len();
    if given > expected {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                function: name.clone(),
                expected,
                received: given,
            },
            position,
        ));
    }
    if given < expected {
        return Err(Error::new(
            ErrorImpl::MissingArguments {
                function: name.clone(),
                expected,
                received: given,
            },
            position,
        ));
    }

    let mut arguments = Vec::with_capacity(given);
    for (argument, parameter_type) in node.parameters.iter().zip(parameters) {
        let (argument_node, argument_type) =
            create_node(compiler, argument, false, &ReturnContext::TopLevel)?;
        if !conforms(&argument_type, parameter_type) {
            return Err(Error::new(
                ErrorImpl::IncompatibleParameter,
                argument.token.position.clone(),
            ));
        }
        arguments.push(argument_node);
    }

    Ok((
        NodeKind::FunctionCall {
            name: name.clone(),
            arguments,
        },
        signature.return_type(),
    ))
}
