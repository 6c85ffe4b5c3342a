use std::fmt::Display;

use crate::Span;

use super::{
    ast::NodeId,
    lookups::{ARITHMETIC_LOOKUP, LOGIC_LOOKUP, RELATIONAL_LOOKUP, UNARY_LOOKUP},
};

/// A name, either in a declaration or at a use site.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub id: NodeId,
    pub span: Span,
}

/// Expression
///
/// One variant per expression form. Operator precedence is already encoded
/// in the shape of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Arithmetic(Arithmetic),
    Relational(Relational),
    ArrayAccess(ArrayAccess),
    Unary(Unary),
    Logic(Logic),
    Parenthesis(Parenthesis),
    Value(Value),
    Call(FunctionCall),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Ident(expr) => expr.id,
            Expr::Arithmetic(expr) => expr.id,
            Expr::Relational(expr) => expr.id,
            Expr::ArrayAccess(expr) => expr.id,
            Expr::Unary(expr) => expr.id,
            Expr::Logic(expr) => expr.id,
            Expr::Parenthesis(expr) => expr.id,
            Expr::Value(expr) => expr.id,
            Expr::Call(expr) => expr.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expr::Ident(expr) => &expr.span,
            Expr::Arithmetic(expr) => &expr.span,
            Expr::Relational(expr) => &expr.span,
            Expr::ArrayAccess(expr) => &expr.span,
            Expr::Unary(expr) => &expr.span,
            Expr::Logic(expr) => &expr.span,
            Expr::Parenthesis(expr) => &expr.span,
            Expr::Value(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
        }
    }

    /// Strips any number of enclosing parentheses.
    pub fn peel_parentheses(&self) -> &Expr {
        match self {
            Expr::Parenthesis(parenthesis) => parenthesis.inner.peel_parentheses(),
            _ => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOp {
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
}

impl RelationalOp {
    /// Whether the operator only tests for equality, which also applies to
    /// booleans.
    pub fn is_equality(&self) -> bool {
        matches!(self, RelationalOp::Equals | RelationalOp::NotEquals)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
}

macro_rules! operator_symbols {
    ($op:ty, $lookup:ident) => {
        impl $op {
            /// Maps the operator as written in source to its variant.
            pub fn from_symbol(symbol: &str) -> Option<Self> {
                $lookup.get(symbol).copied()
            }

            pub fn symbol(&self) -> &'static str {
                $lookup
                    .iter()
                    .find(|(_, op)| *op == self)
                    .map(|(symbol, _)| *symbol)
                    .unwrap_or("?")
            }
        }

        impl Display for $op {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.symbol())
            }
        }
    };
}

operator_symbols!(ArithmeticOp, ARITHMETIC_LOOKUP);
operator_symbols!(RelationalOp, RELATIONAL_LOOKUP);
operator_symbols!(LogicOp, LOGIC_LOOKUP);
operator_symbols!(UnaryOp, UNARY_LOOKUP);

#[derive(Debug, Clone, PartialEq)]
pub struct Arithmetic {
    pub operator: ArithmeticOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relational {
    pub operator: RelationalOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Logic {
    pub operator: LogicOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub id: NodeId,
    pub span: Span,
}

/// `base[index]` used as a value.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub base: Ident,
    pub index: Box<Expr>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parenthesis {
    pub inner: Box<Expr>,
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
}

/// A literal constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub literal: Literal,
    pub id: NodeId,
    pub span: Span,
}

/// `callee(arguments...)`, used both as an expression and, wrapped in a
/// [`super::statements::ProcCall`], as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub callee: Ident,
    pub arguments: Vec<ActualParameter>,
    pub id: NodeId,
    pub span: Span,
}

/// One argument of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualParameter {
    pub value: Expr,
    pub id: NodeId,
    pub span: Span,
}
