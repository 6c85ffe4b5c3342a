//! Type annotations as they appear in the syntax tree.
//!
//! These are the written forms (`int`, `array [10] of float`). The checker
//! turns them into semantic types from
//! [`crate::type_checker::types`]; nothing here is validated yet.

use crate::Span;

use super::ast::NodeId;

/// A type annotation: either a basic type or an array of a basic type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Basic(BasicTypeSpec),
    Array(ArrayTypeSpec),
}

impl TypeSpec {
    pub fn id(&self) -> NodeId {
        match self {
            TypeSpec::Basic(basic) => basic.id,
            TypeSpec::Array(array) => array.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            TypeSpec::Basic(basic) => &basic.span,
            TypeSpec::Array(array) => &array.span,
        }
    }
}

/// A basic type, holding the type name exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicTypeSpec {
    pub name: String,
    pub id: NodeId,
    pub span: Span,
}

/// `array [size] of element`
///
/// The size is kept as written so the checker can reject sizes that are
/// not non-negative integer constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTypeSpec {
    pub size: String,
    pub element: BasicTypeSpec,
    pub id: NodeId,
    pub span: Span,
}
