// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function signature and import nodes.
//!
//! Only what a table-driven test needs is modelled: names, receiver, type
//! parameters and the parameter/result type expressions, plus the file's
//! import specs. Bodies are skipped.

use std::fmt;

use crate::Span;

/// A top-level `func` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// Method receiver, `None` for plain functions.
    pub receiver: Option<Param>,
    /// Raw text of the type parameter list, without brackets.
    pub type_params: Option<String>,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    /// From the `func` keyword to the end of the last result type.
    pub signature: Span,
    /// Whether a body follows the signature.
    pub has_body: bool,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn is_generic(&self) -> bool {
        self.type_params.is_some()
    }
}

/// One import spec: `alias "path"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    /// Explicit name, including `_` and `.`.
    pub alias: Option<String>,
    /// Import path without quotes.
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    /// The name the file refers to the package by.
    ///
    /// Without an alias this is the name the path suggests: the last
    /// element, skipping a `vN` major-version element, cut at the first
    /// character that cannot appear in an identifier, and without a `go-`
    /// prefix. This can differ from the package clause of the imported
    /// package, which cannot be known without reading it.
    pub fn name(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        let mut elems = self.path.rsplit('/');
        let mut last = elems.next().unwrap_or(&self.path);
        if is_major_version(last) {
            if let Some(prev) = elems.next() {
                last = prev;
            }
        }
        let last = last.strip_prefix("go-").unwrap_or(last);
        let end = last
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(last.len());
        &last[..end]
    }

    /// Blank and dot imports cannot be referenced as `name.Member`.
    pub fn is_named_reference(&self) -> bool {
        !matches!(self.alias.as_deref(), Some("_") | Some("."))
    }
}

fn is_major_version(elem: &str) -> bool {
    elem.len() > 1
        && elem.starts_with('v')
        && elem[1..].chars().all(|c| c.is_ascii_digit())
}

/// One parameter or result slot.
///
/// `a, b int` yields two `Param`s sharing the same type.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeExpr,
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A Go type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `int`, `MyType`
    Named(String),
    /// `pkg.Type`
    Qualified { package: String, name: String },
    /// `List[int]`
    Generic { base: Box<TypeExpr>, args: Vec<TypeExpr> },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T`; the length is kept as source text.
    Array { len: String, elem: Box<TypeExpr> },
    /// `map[K]V`
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// `func(params) results`
    Func { params: Vec<Param>, results: Vec<Param> },
    /// `struct{...}`, kept as source text.
    Struct(String),
    /// `interface{...}`, kept as source text.
    Interface(String),
    /// `...T`, only valid as the last parameter.
    Variadic(Box<TypeExpr>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => write!(f, "{}", name),
            TypeExpr::Qualified { package, name } => write!(f, "{}.{}", package, name),
            TypeExpr::Generic { base, args } => {
                write!(f, "{}[", base)?;
                write_list(f, args.iter())?;
                write!(f, "]")
            }
            TypeExpr::Pointer(inner) => write!(f, "*{}", inner),
            TypeExpr::Slice(elem) => write!(f, "[]{}", elem),
            TypeExpr::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {}", elem),
                ChanDir::Send => write!(f, "chan<- {}", elem),
                ChanDir::Recv => write!(f, "<-chan {}", elem),
            },
            TypeExpr::Func { params, results } => {
                write!(f, "func(")?;
                write_list(f, params.iter().map(|p| &p.ty))?;
                write!(f, ")")?;
                match results.as_slice() {
                    [] => Ok(()),
                    [single] if single.name.is_none() => write!(f, " {}", single.ty),
                    _ => {
                        write!(f, " (")?;
                        write_list(f, results.iter().map(|p| &p.ty))?;
                        write!(f, ")")
                    }
                }
            }
            TypeExpr::Struct(raw) | TypeExpr::Interface(raw) => write!(f, "{}", raw),
            TypeExpr::Variadic(elem) => write!(f, "...{}", elem),
        }
    }
}

fn write_list<'a>(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = &'a TypeExpr>) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
