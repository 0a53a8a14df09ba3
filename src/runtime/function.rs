use std::{fmt::Debug, rc::Rc};

use crate::{
    evaluator::{evaluator::execute_chain, node::Node},
    types::types::TypeRef,
};

use super::{pointer::Pointer, ret::Return, scope::Scope};

/// A declared function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub typ: TypeRef,
    /// Bound when a call supplies fewer arguments than parameters.
    pub default_value: Option<Pointer>,
}

/// A callable runtime value.
pub trait Function: Debug {
    /// The scope the function was defined in; every call runs in a clone
    /// of it.
    fn get_scope(&self) -> &Scope;
    fn get_parameters(&self) -> &[Parameter];
    /// The function-shaped type, `function<return, params..>`.
    fn get_type(&self) -> TypeRef;
    /// Runs the body against a prepared call frame.
    fn execute(&self, scope: &mut Scope) -> Return;
}

/// A function defined in source, named or lambda.
pub struct CustomFunction {
    pub scope: Scope,
    pub parameters: Vec<Parameter>,
    pub entry_node: Option<Rc<Node>>,
    pub typ: TypeRef,
}

impl Debug for CustomFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The captured scope can reach this function again.
        f.debug_struct("CustomFunction")
            .field("typ", &self.typ.to_string())
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

impl Function for CustomFunction {
    fn get_scope(&self) -> &Scope {
        &self.scope
    }

    fn get_parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn get_type(&self) -> TypeRef {
        self.typ.clone()
    }

    fn execute(&self, scope: &mut Scope) -> Return {
        execute_chain(self.entry_node.as_deref(), scope)
    }
}

/// Calls `function` with already evaluated arguments.
///
/// The frame is a clone of the function's captured scope plus one block.
/// Each parameter is declared in that block and then set to the argument's
/// pointer itself, so writes to a parameter reach the caller's variable.
/// Parameters without an argument get their default pointer, or stay
/// empty. The block is released on every exit path.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(function = %function.get_type(), arguments = arguments.len())
)]
pub fn invoke(function: &dyn Function, arguments: Vec<Pointer>) -> Return {
    let mut frame = function.get_scope().clone();
    let mut frame = frame.enter_block();

    let mut arguments = arguments.into_iter();
    for parameter in function.get_parameters() {
        frame.declare(&parameter.name, parameter.typ.clone());
        let bound = arguments
            .next()
            .or_else(|| parameter.default_value.clone());
        if let Some(pointer) = bound {
            if let Err(error) = frame.set(&parameter.name, pointer) {
                return Return::exception(error.to_string());
            }
        }
    }

    function.execute(&mut frame)
}
