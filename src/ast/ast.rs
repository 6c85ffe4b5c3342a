use std::fmt::Display;

use crate::Span;

use super::{
    expressions::Ident,
    statements::Statements,
    types::{BasicTypeSpec, TypeSpec},
};

/// Identifies one node of a syntax tree.
///
/// Ids are handed out by whoever builds the tree and must be unique within
/// it. The checker keys every decoration on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Program
///
/// Root of the tree: every function of the compilation unit, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
    pub id: NodeId,
    pub span: Span,
}

/// Function Declaration
///
/// `func name(params) : ret  var ...  statements  endfunc`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Ident,
    pub parameters: Parameters,
    pub return_value: Option<ReturnValue>,
    pub declarations: Declarations,
    pub body: Statements,
    pub id: NodeId,
    pub span: Span,
}

impl Function {
    pub fn returns_value(&self) -> bool {
        self.return_value.is_some()
    }
}

/// Formal parameter list of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub parameters: Vec<Parameter>,
    pub id: NodeId,
    pub span: Span,
}

impl Parameters {
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Ident,
    pub parameter_type: TypeSpec,
    pub id: NodeId,
    pub span: Span,
}

/// Declared return type of a function. Only basic types can be returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnValue {
    pub return_type: BasicTypeSpec,
    pub id: NodeId,
    pub span: Span,
}

/// The `var` declarations at the top of a function body.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarations {
    pub declarations: Vec<VariableDecl>,
    pub id: NodeId,
    pub span: Span,
}

impl Declarations {
    pub fn iter(&self) -> std::slice::Iter<'_, VariableDecl> {
        self.declarations.iter()
    }
}

/// `var a, b, c : type` - every name shares the declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub names: Vec<Ident>,
    pub variable_type: TypeSpec,
    pub id: NodeId,
    pub span: Span,
}
