// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type signature extraction.
//!
//! A generated test can only build table fields for three shapes: `T`, `*T`
//! and `...T` where `T` is a bare type name. Everything else is rejected for
//! the one declaration that uses it.

use godoctest_ast::decl::{FuncDecl, Param, TypeExpr};

use crate::GenError;

/// Classification of one parameter or result type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Plain(String),
    Pointer(String),
    Variadic(String),
}

impl TypeDescriptor {
    /// Map a type expression to a descriptor, if it has a supported shape.
    pub fn describe(ty: &TypeExpr) -> Option<Self> {
        match ty {
            TypeExpr::Named(name) => Some(TypeDescriptor::Plain(name.clone())),
            TypeExpr::Pointer(inner) => match inner.as_ref() {
                TypeExpr::Named(name) => Some(TypeDescriptor::Pointer(name.clone())),
                _ => None,
            },
            TypeExpr::Variadic(inner) => match inner.as_ref() {
                TypeExpr::Named(name) => Some(TypeDescriptor::Variadic(name.clone())),
                _ => None,
            },
            _ => None,
        }
    }

    /// The bare type name.
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Plain(name)
            | TypeDescriptor::Pointer(name)
            | TypeDescriptor::Variadic(name) => name,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeDescriptor::Pointer(_))
    }

    /// Struct field declaration for this slot in the test table.
    pub fn field(&self, field: &str) -> String {
        match self {
            TypeDescriptor::Plain(name) => format!("{} {}", field, name),
            TypeDescriptor::Pointer(name) => format!("{} *{}", field, name),
            TypeDescriptor::Variadic(name) => format!("{} []{}", field, name),
        }
    }

    /// Call argument reading this slot from the loop variable.
    pub fn arg(&self, field: &str) -> String {
        match self {
            TypeDescriptor::Variadic(_) => format!("test.{}...", field),
            _ => format!("test.{}", field),
        }
    }
}

/// One positional field of the test table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Field name in the generated struct: `f<i>` for parameters, `e<j>` for
    /// expected results.
    pub field: String,
    pub descriptor: TypeDescriptor,
}

/// Parameter and result slots of one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Slot>,
    pub results: Vec<Slot>,
}

impl Signature {
    /// Parameters then results, in table order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.params.iter().chain(self.results.iter())
    }

    pub fn field_count(&self) -> usize {
        self.params.len() + self.results.len()
    }

    pub fn has_pointers(&self) -> bool {
        self.slots().any(|s| s.descriptor.is_pointer())
    }
}

/// Extract the slots of a declaration.
pub fn extract(func: &FuncDecl) -> Result<Signature, GenError> {
    // `init` cannot be referenced, so no test can call it.
    if func.name == "init" && func.receiver.is_none() {
        return Err(GenError::UnsupportedTypeShape {
            slot: "package initializer".to_string(),
            ty: "func init()".to_string(),
        });
    }
    if let Some(receiver) = &func.receiver {
        return Err(GenError::UnsupportedTypeShape {
            slot: "method receiver".to_string(),
            ty: receiver.ty.to_string(),
        });
    }
    if let Some(type_params) = &func.type_params {
        return Err(GenError::UnsupportedTypeShape {
            slot: "type parameters".to_string(),
            ty: format!("[{}]", type_params),
        });
    }

    let mut params = Vec::with_capacity(func.params.len());
    for (i, param) in func.params.iter().enumerate() {
        params.push(Slot { field: format!("f{}", i), descriptor: classify(param, "parameter", i)? });
    }

    let mut results = Vec::with_capacity(func.results.len());
    for (j, result) in func.results.iter().enumerate() {
        let descriptor = classify(result, "result", j)?;
        if matches!(descriptor, TypeDescriptor::Variadic(_)) {
            return Err(unsupported(result, "result", j));
        }
        results.push(Slot { field: format!("e{}", j), descriptor });
    }

    Ok(Signature { params, results })
}

fn classify(param: &Param, role: &str, index: usize) -> Result<TypeDescriptor, GenError> {
    TypeDescriptor::describe(&param.ty).ok_or_else(|| unsupported(param, role, index))
}

fn unsupported(param: &Param, role: &str, index: usize) -> GenError {
    let slot = match &param.name {
        Some(name) => format!("{} `{}`", role, name),
        None => format!("{} {}", role, index + 1),
    };
    GenError::UnsupportedTypeShape { slot, ty: param.ty.to_string() }
}
