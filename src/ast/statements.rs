use std::slice::Iter;

use crate::Span;

use super::{
    ast::NodeId,
    expressions::{Expr, FunctionCall, Ident},
};

/// A sequence of statements: a function body or a branch of a conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct Statements {
    pub statements: Vec<Stmt>,
    pub id: NodeId,
    pub span: Span,
}

impl Statements {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Statement
///
/// One variant per statement form of the language.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    ProcCall(ProcCall),
    Return(ReturnStmt),
    Read(ReadStmt),
    WriteExpr(WriteExpr),
    WriteString(WriteString),
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Assign(stmt) => stmt.id,
            Stmt::If(stmt) => stmt.id,
            Stmt::While(stmt) => stmt.id,
            Stmt::ProcCall(stmt) => stmt.id,
            Stmt::Return(stmt) => stmt.id,
            Stmt::Read(stmt) => stmt.id,
            Stmt::WriteExpr(stmt) => stmt.id,
            Stmt::WriteString(stmt) => stmt.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Stmt::Assign(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::ProcCall(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Read(stmt) => &stmt.span,
            Stmt::WriteExpr(stmt) => &stmt.span,
            Stmt::WriteString(stmt) => &stmt.span,
        }
    }
}

/// `left := value;`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub left: LeftExpr,
    pub value: Expr,
    pub id: NodeId,
    pub span: Span,
}

/// `if condition then ... [else ...] endif`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Statements,
    pub else_body: Option<Statements>,
    pub id: NodeId,
    pub span: Span,
}

/// `while condition do ... endwhile`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Statements,
    pub id: NodeId,
    pub span: Span,
}

/// A call in statement position. Any returned value is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcCall {
    pub call: FunctionCall,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadStmt {
    pub target: LeftExpr,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteExpr {
    pub value: Expr,
    pub id: NodeId,
    pub span: Span,
}

/// Writes a string literal. The text is stored without its quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteString {
    pub text: String,
    pub id: NodeId,
    pub span: Span,
}

/// Target of an assignment or a read: `x` or `x[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LeftExpr {
    pub ident: Ident,
    pub index: Option<Box<Expr>>,
    pub id: NodeId,
    pub span: Span,
}
