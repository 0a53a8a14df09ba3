use std::{
    cell::RefCell,
    collections::HashMap,
    ops::{Deref, DerefMut},
    rc::Rc,
};

use thiserror::Error;

use crate::types::types::TypeRef;

use super::pointer::Pointer;

type Block = Rc<RefCell<HashMap<String, Pointer>>>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    #[error("{name} is not declared")]
    NotDeclared { name: String },
}

/// Lexical environment: a stack of blocks mapping names to pointers.
///
/// The same structure serves as the compile-time type environment (the
/// pointers are empty and only their type tags are read) and as the
/// runtime value environment.
///
/// `clone` copies the stack, not the blocks: the clone resolves free names
/// through the original's blocks, while blocks it pushes afterwards stay
/// private to it. Call frames are built this way.
#[derive(Debug, Clone)]
pub struct Scope {
    blocks: Vec<Block>,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new()
    }
}

impl Scope {
    /// A scope with a single, empty root block.
    pub fn new() -> Self {
        Scope {
            blocks: vec![Block::default()],
        }
    }

    /// Resolves `name` from the innermost block outward.
    pub fn get(&self, name: &str) -> Result<Pointer, ScopeError> {
        self.must_get(name).ok_or_else(|| ScopeError::NotDeclared {
            name: name.to_string(),
        })
    }

    /// Same lookup as `get`, for callers where absence is expected.
    pub fn must_get(&self, name: &str) -> Option<Pointer> {
        self.blocks
            .iter()
            .rev()
            .find_map(|block| block.borrow().get(name).cloned())
    }

    /// Binds a fresh empty pointer of type `typ` in the innermost block.
    pub fn declare(&mut self, name: &str, typ: TypeRef) -> Pointer {
        let pointer = Pointer::new(typ);
        self.declare_and_set(name, pointer.clone());
        pointer
    }

    /// Rebinds the nearest slot called `name` to `pointer`.
    pub fn set(&mut self, name: &str, pointer: Pointer) -> Result<(), ScopeError> {
        let block = self
            .blocks
            .iter()
            .rev()
            .find(|block| block.borrow().contains_key(name))
            .ok_or_else(|| ScopeError::NotDeclared {
                name: name.to_string(),
            })?;
        block.borrow_mut().insert(name.to_string(), pointer);
        Ok(())
    }

    /// Binds `pointer` itself (not a copy) under `name` in the innermost block.
    pub fn declare_and_set(&mut self, name: &str, pointer: Pointer) {
        if self.blocks.is_empty() {
            self.create_block();
        }
        if let Some(block) = self.blocks.last() {
            block.borrow_mut().insert(name.to_string(), pointer);
        }
    }

    pub fn create_block(&mut self) {
        self.blocks.push(Block::default());
        tracing::trace!(depth = self.blocks.len(), "created block");
    }

    pub fn release_block(&mut self) {
        self.blocks.pop();
        tracing::trace!(depth = self.blocks.len(), "released block");
    }

    /// Pushes a block that is released when the guard goes out of scope, on
    /// every exit path.
    pub fn enter_block(&mut self) -> BlockGuard<'_> {
        self.create_block();
        BlockGuard { scope: self }
    }

    /// A clone with one extra block in which `name` is pre-declared, so a
    /// function body can refer to its own name.
    pub fn clone_with_name(&self, name: &str, typ: TypeRef) -> Scope {
        let mut scope = self.clone();
        scope.create_block();
        scope.declare(name, typ);
        scope
    }

    /// Number of live blocks.
    pub fn depth(&self) -> usize {
        self.blocks.len()
    }
}

pub struct BlockGuard<'a> {
    scope: &'a mut Scope,
}

impl Deref for BlockGuard<'_> {
    type Target = Scope;

    fn deref(&self) -> &Self::Target {
        self.scope
    }
}

impl DerefMut for BlockGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.scope
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        self.scope.release_block();
    }
}
