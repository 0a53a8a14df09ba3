use std::{cell::RefCell, fmt::Debug, rc::Rc};

use crate::types::types::{TypeRef, BOOLEAN_TYPE, INTEGER_TYPE, STRING_TYPE};

use super::function::Function;

/// A runtime value.
#[derive(Clone)]
pub enum Variable {
    Integer(i64),
    String(String),
    Boolean(bool),
    /// Elements of a comma separated list, each kept behind its own pointer.
    Set(Vec<Pointer>),
    Function(Rc<dyn Function>),
}

impl Debug for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variable::Integer(value) => write!(f, "Integer({})", value),
            Variable::String(value) => write!(f, "String({:?})", value),
            Variable::Boolean(value) => write!(f, "Boolean({})", value),
            Variable::Set(children) => f.debug_tuple("Set").field(children).finish(),
            // Function values capture their defining scope, which may hold
            // the function itself.
            Variable::Function(function) => write!(f, "Function({:?})", function),
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variable::Integer(a), Variable::Integer(b)) => a == b,
            (Variable::String(a), Variable::String(b)) => a == b,
            (Variable::Boolean(a), Variable::Boolean(b)) => a == b,
            (Variable::Set(a), Variable::Set(b)) => a == b,
            (Variable::Function(a), Variable::Function(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

struct PointerCell {
    typ: TypeRef,
    variable: RefCell<Option<Variable>>,
}

/// Shared, mutable value cell.
///
/// Cloning a `Pointer` creates another alias of the same cell; writes
/// through any alias are seen by all of them. Equality is identity.
#[derive(Clone)]
pub struct Pointer(Rc<PointerCell>);

impl Pointer {
    /// An empty cell of the given type.
    pub fn new(typ: TypeRef) -> Self {
        Pointer(Rc::new(PointerCell {
            typ,
            variable: RefCell::new(None),
        }))
    }

    pub fn with_variable(typ: TypeRef, variable: Variable) -> Self {
        Pointer(Rc::new(PointerCell {
            typ,
            variable: RefCell::new(Some(variable)),
        }))
    }

    pub fn integer(value: i64) -> Self {
        Pointer::with_variable(INTEGER_TYPE.clone(), Variable::Integer(value))
    }

    pub fn string(value: String) -> Self {
        Pointer::with_variable(STRING_TYPE.clone(), Variable::String(value))
    }

    pub fn boolean(value: bool) -> Self {
        Pointer::with_variable(BOOLEAN_TYPE.clone(), Variable::Boolean(value))
    }

    pub fn get_type(&self) -> TypeRef {
        self.0.typ.clone()
    }

    pub fn get(&self) -> Option<Variable> {
        self.0.variable.borrow().clone()
    }

    /// Replaces the held variable in place.
    pub fn set(&self, variable: Option<Variable>) {
        *self.0.variable.borrow_mut() = variable;
    }

    pub fn is_empty(&self) -> bool {
        self.0.variable.borrow().is_none()
    }

    pub fn ptr_eq(a: &Pointer, b: &Pointer) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match &*self.0.variable.borrow() {
            Some(Variable::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match &*self.0.variable.borrow() {
            Some(Variable::String(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match &*self.0.variable.borrow() {
            Some(Variable::Boolean(value)) => Some(*value),
            _ => None,
        }
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        Pointer::ptr_eq(self, other)
    }
}

impl Debug for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.variable.try_borrow() {
            Ok(variable) => write!(f, "Pointer({}, {:?})", self.0.typ, *variable),
            Err(_) => write!(f, "Pointer({}, <borrowed>)", self.0.typ),
        }
    }
}
