use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, sync::Arc};

/// Shared handle to an immutable type.
pub type TypeRef = Arc<Type>;

lazy_static! {
    /// Root of every value type, also what a `var` declaration holds.
    pub static ref VARIABLE_TYPE: TypeRef = Type::new("var", None);
    pub static ref INTEGER_TYPE: TypeRef = Type::new("int", Some(VARIABLE_TYPE.clone()));
    pub static ref STRING_TYPE: TypeRef = Type::new("string", Some(VARIABLE_TYPE.clone()));
    pub static ref BOOLEAN_TYPE: TypeRef = Type::new("bool", Some(VARIABLE_TYPE.clone()));
    pub static ref FUNCTION_TYPE: TypeRef = Type::new("Function", Some(VARIABLE_TYPE.clone()));
    pub static ref SET_TYPE: TypeRef = Type::new("Set", Some(VARIABLE_TYPE.clone()));
    /// Return slot of a function-shaped type whose function returns nothing.
    pub static ref VOID_TYPE: TypeRef = Type::new("void", None);

    pub static ref BUILTIN_LOOKUP: HashMap<&'static str, TypeRef> = {
        let mut map = HashMap::new();
        map.insert("var", VARIABLE_TYPE.clone());
        map.insert("int", INTEGER_TYPE.clone());
        map.insert("string", STRING_TYPE.clone());
        map.insert("bool", BOOLEAN_TYPE.clone());
        map
    };
}

/// Resolves a declaration keyword or return type name.
pub fn builtin_type(name: &str) -> Option<TypeRef> {
    BUILTIN_LOOKUP.get(name).cloned()
}

/// A nominal type with an optional single supertype and, for generic
/// types, an ordered argument list.
///
/// Function-shaped types store `[return, param1, .., paramN]` in
/// `generics`; aggregates store one entry per element.
#[derive(Debug, PartialEq)]
pub struct Type {
    pub name: String,
    pub parent: Option<TypeRef>,
    pub generic: bool,
    pub generics: Vec<TypeRef>,
}

impl Type {
    pub fn new(name: &str, parent: Option<TypeRef>) -> TypeRef {
        Arc::new(Type {
            name: name.to_string(),
            parent,
            generic: false,
            generics: vec![],
        })
    }

    pub fn generic(name: &str, parent: Option<TypeRef>, generics: Vec<TypeRef>) -> TypeRef {
        Arc::new(Type {
            name: name.to_string(),
            parent,
            generic: true,
            generics,
        })
    }

    /// Builds `function<return, params..>`. A missing return type is stored
    /// as `void`.
    pub fn function(return_type: Option<TypeRef>, parameters: Vec<TypeRef>) -> TypeRef {
        let mut generics = vec![return_type.unwrap_or_else(|| VOID_TYPE.clone())];
        generics.extend(parameters);
        Type::generic("function", Some(FUNCTION_TYPE.clone()), generics)
    }

    /// Builds the aggregate type of a comma separated list.
    pub fn set(children: Vec<TypeRef>) -> TypeRef {
        Type::generic("Set", Some(SET_TYPE.clone()), children)
    }

    /// Directional compatibility: `self` can be used where `target` is
    /// expected.
    ///
    /// `target` must be reachable from `self` through the parent chain. When
    /// `target` is generic, `self`'s arguments must match it position by
    /// position.
    pub fn is_compatible(&self, target: &Type) -> bool {
        let mut current = Some(self);
        let reachable = loop {
            match current {
                Some(ty) if ty.is_same_nominal(target) => break true,
                Some(ty) => current = ty.parent.as_deref(),
                None => break false,
            }
        };

        if !reachable {
            return false;
        }
        if !target.generic {
            return true;
        }

        self.generics.len() == target.generics.len()
            && self
                .generics
                .iter()
                .zip(target.generics.iter())
                .all(|(candidate, expected)| candidate.is_compatible(expected))
    }

    fn is_same_nominal(&self, other: &Type) -> bool {
        std::ptr::eq(self, other) || self.name == other.name
    }

    pub fn is_void(&self) -> bool {
        self.is_same_nominal(&VOID_TYPE)
    }

    /// Declared return type of a function-shaped type, `None` for `void`.
    pub fn return_type(&self) -> Option<TypeRef> {
        self.generics
            .first()
            .filter(|ty| !ty.is_void())
            .cloned()
    }

    /// Parameter types of a function-shaped type.
    pub fn parameter_types(&self) -> &[TypeRef] {
        self.generics.get(1..).unwrap_or(&[])
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.generic {
            let arguments = self
                .generics
                .iter()
                .map(|ty| ty.to_string())
                .collect::<Vec<String>>();
            write!(f, "<{}>", arguments.join(", "))?;
        }
        Ok(())
    }
}
