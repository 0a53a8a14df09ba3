use std::rc::Rc;

use crate::{
    runtime::{
        function::{invoke, CustomFunction, Function},
        pointer::{Pointer, Variable},
        ret::{Return, ReturnKind},
        scope::Scope,
    },
    types::types::{TypeRef, VARIABLE_TYPE},
};

use super::node::{FunctionDefinition, Node, NodeKind};

/// Runs a block's statements in order.
///
/// Stops at the first result that is not `Nothing` and hands it back
/// untouched. Otherwise the result of the last statement is returned
/// (`Nothing` without a pointer for an empty block).
pub fn execute_chain(first: Option<&Node>, scope: &mut Scope) -> Return {
    let mut last = Return::nothing();
    for node in first.into_iter().flat_map(|node| node.iter()) {
        last = node.execute(scope);
        if !last.is_nothing() {
            return last;
        }
    }
    last
}

/// Unwraps a `Nothing` result into its pointer, or yields the signal to
/// propagate.
macro_rules! propagate {
    ($result:expr) => {{
        let result = $result;
        if !result.is_nothing() {
            return result;
        }
        result.pointer
    }};
}

fn integer(pointer: Option<Pointer>) -> Result<i64, Return> {
    pointer
        .and_then(|pointer| pointer.as_integer())
        .ok_or_else(|| Return::exception("expected an integer value"))
}

fn string(pointer: Option<Pointer>) -> Result<String, Return> {
    pointer
        .and_then(|pointer| pointer.as_string())
        .ok_or_else(|| Return::exception("expected a string value"))
}

fn boolean(pointer: Option<Pointer>) -> Result<bool, Return> {
    pointer
        .and_then(|pointer| pointer.as_boolean())
        .ok_or_else(|| Return::exception("expected a boolean value"))
}

/// Evaluates both operands as integers, left first.
fn integer_operands(left: &Node, right: &Node, scope: &mut Scope) -> Result<(i64, i64), Return> {
    let l = left.execute(scope);
    if !l.is_nothing() {
        return Err(l);
    }
    let r = right.execute(scope);
    if !r.is_nothing() {
        return Err(r);
    }
    Ok((integer(l.pointer)?, integer(r.pointer)?))
}

impl Node {
    /// Executes this node alone; the rest of its block is the caller's
    /// business.
    pub fn execute(&self, scope: &mut Scope) -> Return {
        match &self.kind {
            NodeKind::Variable { name } => match scope.get(name) {
                Ok(pointer) => Return::value(pointer),
                Err(error) => Return::exception(error.to_string()),
            },
            NodeKind::Integer { value } => Return::value(Pointer::integer(*value)),
            NodeKind::String { value } => Return::value(Pointer::string(value.clone())),
            NodeKind::Boolean { value } => Return::value(Pointer::boolean(*value)),
            NodeKind::Summation { left, right } => {
                match integer_operands(left, right, scope) {
                    Ok((l, r)) => Return::value(Pointer::integer(l.wrapping_add(r))),
                    Err(signal) => signal,
                }
            }
            NodeKind::Concatenation { left, right } => {
                let l = propagate!(left.execute(scope));
                let r = propagate!(right.execute(scope));
                match (string(l), string(r)) {
                    (Ok(l), Ok(r)) => Return::value(Pointer::string(l + &r)),
                    (Err(signal), _) | (_, Err(signal)) => signal,
                }
            }
            NodeKind::Subtraction { left, right } => {
                let l = match left {
                    Some(left) => match integer(propagate!(left.execute(scope))) {
                        Ok(value) => value,
                        Err(signal) => return signal,
                    },
                    None => 0,
                };
                match integer(propagate!(right.execute(scope))) {
                    Ok(r) => Return::value(Pointer::integer(l.wrapping_sub(r))),
                    Err(signal) => signal,
                }
            }
            NodeKind::Division { left, right } => match integer_operands(left, right, scope) {
                Ok((_, 0)) => Return::exception("division by zero"),
                Ok((l, r)) => Return::value(Pointer::integer(l.wrapping_div(r))),
                Err(signal) => signal,
            },
            NodeKind::Equality { left, right } => match integer_operands(left, right, scope) {
                Ok((l, r)) => Return::value(Pointer::boolean(l == r)),
                Err(signal) => signal,
            },
            NodeKind::Less { left, right } => match integer_operands(left, right, scope) {
                Ok((l, r)) => Return::value(Pointer::boolean(l < r)),
                Err(signal) => signal,
            },
            NodeKind::Greater { left, right } => match integer_operands(left, right, scope) {
                Ok((l, r)) => Return::value(Pointer::boolean(l > r)),
                Err(signal) => signal,
            },
            NodeKind::Csv { children, typ } => {
                let mut elements = Vec::with_capacity(children.len());
                for (index, child) in children.iter().enumerate() {
                    let pointer = propagate!(child.execute(scope));
                    elements.push(pointer.unwrap_or_else(|| Pointer::new(element_type(typ, index))));
                }
                Return::value(Pointer::with_variable(typ.clone(), Variable::Set(elements)))
            }
            NodeKind::Declaration { identifier, typ } => {
                let pointer = Pointer::new(typ.clone());
                scope.declare_and_set(identifier, pointer.clone());
                Return::value(pointer)
            }
            NodeKind::Set { left, right } => {
                let r = propagate!(right.execute(scope));
                let l = propagate!(left.execute(scope));
                let value = r.as_ref().and_then(|pointer| pointer.get());
                if let Some(l) = l {
                    l.set(value);
                }
                Return {
                    pointer: r,
                    ..Return::nothing()
                }
            }
            NodeKind::Condition { condition, body } => {
                let taken = match boolean(propagate!(condition.execute(scope))) {
                    Ok(taken) => taken,
                    Err(signal) => return signal,
                };
                if taken {
                    let mut scope = scope.enter_block();
                    let result = execute_chain(body.as_deref(), &mut scope);
                    if !result.is_nothing() {
                        return result;
                    }
                }
                Return::nothing()
            }
            NodeKind::Loop { condition, body } => {
                let mut scope = scope.enter_block();
                loop {
                    match boolean(propagate!(condition.execute(&mut scope))) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(signal) => return signal,
                    }
                    for statement in body.iter().flat_map(|body| body.iter()) {
                        let result = statement.execute(&mut scope);
                        match result.kind {
                            ReturnKind::Nothing => {}
                            ReturnKind::Break => return Return::nothing(),
                            ReturnKind::Continue => break,
                            _ => return result,
                        }
                    }
                }
                Return::nothing()
            }
            NodeKind::Function(definition) => define_function(definition, scope),
            NodeKind::FunctionCall { name, arguments } => {
                let function = match scope.get(name).map(|pointer| pointer.get()) {
                    Ok(Some(Variable::Function(function))) => function,
                    Ok(_) => return Return::exception(format!("{} is not a function", name)),
                    Err(error) => return Return::exception(error.to_string()),
                };

                let mut supplied = Vec::with_capacity(arguments.len());
                for (index, argument) in arguments.iter().enumerate() {
                    let pointer = propagate!(argument.execute(scope));
                    supplied.push(pointer.unwrap_or_else(|| {
                        let typ = function.get_parameters().get(index).map(|parameter| parameter.typ.clone());
                        Pointer::new(typ.unwrap_or_else(|| VARIABLE_TYPE.clone()))
                    }));
                }

                invoke(function.as_ref(), supplied)
            }
            NodeKind::Return { value } => match value {
                Some(value) => Return::returned(propagate!(value.execute(scope))),
                None => Return::returned(None),
            },
            NodeKind::Break => Return::brk(),
            NodeKind::Continue => Return::cont(),
        }
    }
}

fn element_type(typ: &TypeRef, index: usize) -> TypeRef {
    typ.generics
        .get(index)
        .cloned()
        .unwrap_or_else(|| VARIABLE_TYPE.clone())
}

/// Builds the function value and, for named functions, binds it both in
/// the defining scope and in the function's own self-name slot.
fn define_function(definition: &FunctionDefinition, scope: &mut Scope) -> Return {
    let mut captured = match &definition.name {
        Some(name) => scope.clone_with_name(name, definition.typ.clone()),
        None => scope.clone(),
    };

    let function: Rc<dyn Function> = Rc::new(CustomFunction {
        scope: captured.clone(),
        parameters: definition.parameters.clone(),
        entry_node: definition.entry_node.clone(),
        typ: definition.typ.clone(),
    });
    let pointer = Pointer::with_variable(definition.typ.clone(), Variable::Function(function));

    if let Some(name) = &definition.name {
        tracing::debug!(%name, "defining function");
        // The self-name block is shared with the function's own scope.
        captured.declare_and_set(name, pointer.clone());
        scope.declare_and_set(name, pointer.clone());
    }

    Return::value(pointer)
}
