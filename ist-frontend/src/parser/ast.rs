//! This module contains the untyped syntax tree produced by the parser.
//!
//! Every node is built with its final span and never changes afterwards. Nodes expose the span
//! through [`Spanned`].
use std::sync::Arc;

use num::BigInt;

use crate::{Span, Spanned, Token};

/// All top level declarations of one source unit, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    source: Arc<str>,
    declarations: Vec<Decl>,
}

impl ParseTree {
    pub fn new(source: Arc<str>) -> Self {
        Self {
            source,
            declarations: Vec::new(),
        }
    }

    /// Returns the name of the source unit the tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn declarations(&self) -> &[Decl] {
        &self.declarations
    }

    pub(crate) fn push(&mut self, decl: Decl) {
        self.declarations.push(decl);
    }
}

/// A piece of text that remembers where it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocatedString {
    span: Span,
    value: String,
}

impl LocatedString {
    pub fn new(span: Span, value: impl Into<String>) -> Self {
        Self {
            span,
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<&Token> for LocatedString {
    fn from(token: &Token) -> Self {
        Self::new(token.span().clone(), token.text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Type(TypeDecl),
    Var(VarDecl),
}

impl Decl {
    pub fn as_var(&self) -> Option<&VarDecl> {
        match self {
            Decl::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeDecl> {
        match self {
            Decl::Type(ty) => Some(ty),
            _ => None,
        }
    }
}

/// A named type definition.
///
/// The grammar for these is not settled, so the parser never produces one yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    span: Span,
    name: LocatedString,
    ty: TypeReference,
}

impl TypeDecl {
    pub fn new(span: Span, name: LocatedString, ty: TypeReference) -> Self {
        Self { span, name, ty }
    }

    pub fn name(&self) -> &LocatedString {
        &self.name
    }

    pub fn ty(&self) -> &TypeReference {
        &self.ty
    }
}

/// `name type [= value]`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    span: Span,
    name: LocatedString,
    ty: Option<TypeReference>,
    value: Option<Expr>,
}

impl VarDecl {
    /// Builds the declaration, spanning from the name to the value, or to the type when there is
    /// no value.
    pub fn new(name: LocatedString, ty: Option<TypeReference>, value: Option<Expr>) -> Self {
        debug_assert!(ty.is_some() || value.is_some());

        let end = match (&value, &ty) {
            (Some(value), _) => value.span(),
            (None, Some(ty)) => ty.span(),
            (None, None) => name.span(),
        };
        let span = Span::merge(name.span(), end);

        Self {
            span,
            name,
            ty,
            value,
        }
    }

    pub fn name(&self) -> &LocatedString {
        &self.name
    }

    pub fn ty(&self) -> Option<&TypeReference> {
        self.ty.as_ref()
    }

    pub fn value(&self) -> Option<&Expr> {
        self.value.as_ref()
    }
}

/// A single identifier occurrence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    span: Span,
    name: LocatedString,
}

impl Name {
    pub fn new(name: LocatedString) -> Self {
        Self {
            span: name.span().clone(),
            name,
        }
    }

    pub fn name(&self) -> &LocatedString {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Named(NamedType),
}

/// A type referred to purely by its name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    span: Span,
    name: Name,
}

impl NamedType {
    pub fn new(name: Name) -> Self {
        Self {
            span: name.span().clone(),
            name,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }
}

/// A type as written at a declaration site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeReference {
    span: Span,
    ty: Type,
}

impl TypeReference {
    pub fn new(ty: Type) -> Self {
        Self {
            span: ty.span().clone(),
            ty,
        }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberLit),
}

impl Expr {
    pub fn as_number(&self) -> Option<&NumberLit> {
        match self {
            Expr::Number(number) => Some(number),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLit {
    span: Span,
    value: NumberValue,
}

impl NumberLit {
    pub fn new(span: Span, value: NumberValue) -> Self {
        Self { span, value }
    }

    pub fn value(&self) -> &NumberValue {
        &self.value
    }

    /// Returns the integer value, or `None` for floating literals.
    pub fn as_int(&self) -> Option<&BigInt> {
        match &self.value {
            NumberValue::Int(value) => Some(value),
            NumberValue::Float { .. } => None,
        }
    }
}

/// The value of a numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberValue {
    Int(BigInt),
    Float { value: f64, size: FloatSize },
}

impl NumberValue {
    pub fn is_float(&self) -> bool {
        matches!(self, NumberValue::Float { .. })
    }
}

/// The width requested by a floating literal's suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatSize {
    /// No suffix
    Unsized,
    /// `f` suffix
    F32,
    /// `d` suffix
    F64,
}

impl FloatSize {
    pub fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            'f' => Some(FloatSize::F32),
            'd' => Some(FloatSize::F64),
            _ => None,
        }
    }
}

macro_rules! impl_spanned {
    ($($node:ty),* $(,)?) => {
        $(
            impl Spanned for $node {
                fn span(&self) -> &Span {
                    &self.span
                }
            }
        )*
    };
}

impl_spanned!(
    LocatedString,
    TypeDecl,
    VarDecl,
    Name,
    NamedType,
    TypeReference,
    NumberLit,
);

impl Spanned for Decl {
    fn span(&self) -> &Span {
        match self {
            Decl::Type(decl) => decl.span(),
            Decl::Var(decl) => decl.span(),
        }
    }
}

impl Spanned for Type {
    fn span(&self) -> &Span {
        match self {
            Type::Named(named) => named.span(),
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> &Span {
        match self {
            Expr::Number(number) => number.span(),
        }
    }
}
