use std::fmt::Display;

use log::trace;

use crate::{
    ast::{
        ast::{
            Declarations, Function, NodeId, Parameter, Parameters, Program, ReturnValue,
            VariableDecl,
        },
        expressions::{
            ActualParameter, Arithmetic, ArrayAccess, Expr, FunctionCall, Ident, Logic,
            Parenthesis, Relational, Unary, Value,
        },
        statements::{
            AssignStmt, IfStmt, LeftExpr, ProcCall, ReadStmt, ReturnStmt, Statements, Stmt,
            WhileStmt, WriteExpr, WriteString,
        },
        types::{ArrayTypeSpec, BasicTypeSpec, TypeSpec},
    },
    errors::errors::InternalError,
    Span,
};

/// Node Kinds
///
/// Every kind of node a syntax tree can contain, one per grammar rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Function,
    Parameters,
    Parameter,
    ReturnValue,
    Declarations,
    VariableDecl,
    Type,
    ArrayType,
    BasicType,
    Statements,
    AssignStmt,
    IfStmt,
    WhileStmt,
    ProcCall,
    ReturnStmt,
    ReadStmt,
    WriteExpr,
    WriteString,
    LeftExpr,
    FunctionCall,
    ExprIdent,
    Arithmetic,
    Relational,
    ArrayAccess,
    Unary,
    Logic,
    Parenthesis,
    Value,
    Paramexp,
    Ident,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A borrowed view of any node of the tree, tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Function(&'a Function),
    Parameters(&'a Parameters),
    Parameter(&'a Parameter),
    ReturnValue(&'a ReturnValue),
    Declarations(&'a Declarations),
    VariableDecl(&'a VariableDecl),
    Type(&'a TypeSpec),
    ArrayType(&'a ArrayTypeSpec),
    BasicType(&'a BasicTypeSpec),
    Statements(&'a Statements),
    AssignStmt(&'a AssignStmt),
    IfStmt(&'a IfStmt),
    WhileStmt(&'a WhileStmt),
    ProcCall(&'a ProcCall),
    ReturnStmt(&'a ReturnStmt),
    ReadStmt(&'a ReadStmt),
    WriteExpr(&'a WriteExpr),
    WriteString(&'a WriteString),
    LeftExpr(&'a LeftExpr),
    FunctionCall(&'a FunctionCall),
    ExprIdent(&'a Ident),
    Arithmetic(&'a Arithmetic),
    Relational(&'a Relational),
    ArrayAccess(&'a ArrayAccess),
    Unary(&'a Unary),
    Logic(&'a Logic),
    Parenthesis(&'a Parenthesis),
    Value(&'a Value),
    Paramexp(&'a ActualParameter),
    Ident(&'a Ident),
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program(_) => NodeKind::Program,
            Node::Function(_) => NodeKind::Function,
            Node::Parameters(_) => NodeKind::Parameters,
            Node::Parameter(_) => NodeKind::Parameter,
            Node::ReturnValue(_) => NodeKind::ReturnValue,
            Node::Declarations(_) => NodeKind::Declarations,
            Node::VariableDecl(_) => NodeKind::VariableDecl,
            Node::Type(_) => NodeKind::Type,
            Node::ArrayType(_) => NodeKind::ArrayType,
            Node::BasicType(_) => NodeKind::BasicType,
            Node::Statements(_) => NodeKind::Statements,
            Node::AssignStmt(_) => NodeKind::AssignStmt,
            Node::IfStmt(_) => NodeKind::IfStmt,
            Node::WhileStmt(_) => NodeKind::WhileStmt,
            Node::ProcCall(_) => NodeKind::ProcCall,
            Node::ReturnStmt(_) => NodeKind::ReturnStmt,
            Node::ReadStmt(_) => NodeKind::ReadStmt,
            Node::WriteExpr(_) => NodeKind::WriteExpr,
            Node::WriteString(_) => NodeKind::WriteString,
            Node::LeftExpr(_) => NodeKind::LeftExpr,
            Node::FunctionCall(_) => NodeKind::FunctionCall,
            Node::ExprIdent(_) => NodeKind::ExprIdent,
            Node::Arithmetic(_) => NodeKind::Arithmetic,
            Node::Relational(_) => NodeKind::Relational,
            Node::ArrayAccess(_) => NodeKind::ArrayAccess,
            Node::Unary(_) => NodeKind::Unary,
            Node::Logic(_) => NodeKind::Logic,
            Node::Parenthesis(_) => NodeKind::Parenthesis,
            Node::Value(_) => NodeKind::Value,
            Node::Paramexp(_) => NodeKind::Paramexp,
            Node::Ident(_) => NodeKind::Ident,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Program(node) => node.id,
            Node::Function(node) => node.id,
            Node::Parameters(node) => node.id,
            Node::Parameter(node) => node.id,
            Node::ReturnValue(node) => node.id,
            Node::Declarations(node) => node.id,
            Node::VariableDecl(node) => node.id,
            Node::Type(node) => node.id(),
            Node::ArrayType(node) => node.id,
            Node::BasicType(node) => node.id,
            Node::Statements(node) => node.id,
            Node::AssignStmt(node) => node.id,
            Node::IfStmt(node) => node.id,
            Node::WhileStmt(node) => node.id,
            Node::ProcCall(node) => node.id,
            Node::ReturnStmt(node) => node.id,
            Node::ReadStmt(node) => node.id,
            Node::WriteExpr(node) => node.id,
            Node::WriteString(node) => node.id,
            Node::LeftExpr(node) => node.id,
            Node::FunctionCall(node) => node.id,
            Node::ExprIdent(node) => node.id,
            Node::Arithmetic(node) => node.id,
            Node::Relational(node) => node.id,
            Node::ArrayAccess(node) => node.id,
            Node::Unary(node) => node.id,
            Node::Logic(node) => node.id,
            Node::Parenthesis(node) => node.id,
            Node::Value(node) => node.id,
            Node::Paramexp(node) => node.id,
            Node::Ident(node) => node.id,
        }
    }

    pub fn span(&self) -> &'a Span {
        match *self {
            Node::Program(node) => &node.span,
            Node::Function(node) => &node.span,
            Node::Parameters(node) => &node.span,
            Node::Parameter(node) => &node.span,
            Node::ReturnValue(node) => &node.span,
            Node::Declarations(node) => &node.span,
            Node::VariableDecl(node) => &node.span,
            Node::Type(node) => node.span(),
            Node::ArrayType(node) => &node.span,
            Node::BasicType(node) => &node.span,
            Node::Statements(node) => &node.span,
            Node::AssignStmt(node) => &node.span,
            Node::IfStmt(node) => &node.span,
            Node::WhileStmt(node) => &node.span,
            Node::ProcCall(node) => &node.span,
            Node::ReturnStmt(node) => &node.span,
            Node::ReadStmt(node) => &node.span,
            Node::WriteExpr(node) => &node.span,
            Node::WriteString(node) => &node.span,
            Node::LeftExpr(node) => &node.span,
            Node::FunctionCall(node) => &node.span,
            Node::ExprIdent(node) => &node.span,
            Node::Arithmetic(node) => &node.span,
            Node::Relational(node) => &node.span,
            Node::ArrayAccess(node) => &node.span,
            Node::Unary(node) => &node.span,
            Node::Logic(node) => &node.span,
            Node::Parenthesis(node) => &node.span,
            Node::Value(node) => &node.span,
            Node::Paramexp(node) => &node.span,
            Node::Ident(node) => &node.span,
        }
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        match stmt {
            Stmt::Assign(stmt) => Node::AssignStmt(stmt),
            Stmt::If(stmt) => Node::IfStmt(stmt),
            Stmt::While(stmt) => Node::WhileStmt(stmt),
            Stmt::ProcCall(stmt) => Node::ProcCall(stmt),
            Stmt::Return(stmt) => Node::ReturnStmt(stmt),
            Stmt::Read(stmt) => Node::ReadStmt(stmt),
            Stmt::WriteExpr(stmt) => Node::WriteExpr(stmt),
            Stmt::WriteString(stmt) => Node::WriteString(stmt),
        }
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        match expr {
            Expr::Ident(expr) => Node::ExprIdent(expr),
            Expr::Arithmetic(expr) => Node::Arithmetic(expr),
            Expr::Relational(expr) => Node::Relational(expr),
            Expr::ArrayAccess(expr) => Node::ArrayAccess(expr),
            Expr::Unary(expr) => Node::Unary(expr),
            Expr::Logic(expr) => Node::Logic(expr),
            Expr::Parenthesis(expr) => Node::Parenthesis(expr),
            Expr::Value(expr) => Node::Value(expr),
            Expr::Call(expr) => Node::FunctionCall(expr),
        }
    }
}

impl<'a> From<&'a TypeSpec> for Node<'a> {
    fn from(type_spec: &'a TypeSpec) -> Self {
        Node::Type(type_spec)
    }
}

pub type VisitResult<T> = Result<T, InternalError>;

macro_rules! unhandled {
    ($kind:ident) => {
        Err(InternalError::MissingHandler {
            pass: Self::PASS,
            kind: NodeKind::$kind,
        })
    };
}

/// Visitor
///
/// One handler per node kind. A pass overrides the handlers for every kind
/// it can reach; reaching any other kind is a defect in the pass and
/// aborts it with [`InternalError::MissingHandler`].
///
/// Handlers visit their children themselves, through [`dispatch`], in
/// whatever order the pass needs.
pub trait Visitor {
    /// What a handler produces for its node.
    type Output;
    /// Name of the pass, used in internal error reports.
    const PASS: &'static str;

    fn visit_program(&mut self, _node: &Program) -> VisitResult<Self::Output> {
        unhandled!(Program)
    }
    fn visit_function(&mut self, _node: &Function) -> VisitResult<Self::Output> {
        unhandled!(Function)
    }
    fn visit_parameters(&mut self, _node: &Parameters) -> VisitResult<Self::Output> {
        unhandled!(Parameters)
    }
    fn visit_parameter(&mut self, _node: &Parameter) -> VisitResult<Self::Output> {
        unhandled!(Parameter)
    }
    fn visit_return_value(&mut self, _node: &ReturnValue) -> VisitResult<Self::Output> {
        unhandled!(ReturnValue)
    }
    fn visit_declarations(&mut self, _node: &Declarations) -> VisitResult<Self::Output> {
        unhandled!(Declarations)
    }
    fn visit_variable_decl(&mut self, _node: &VariableDecl) -> VisitResult<Self::Output> {
        unhandled!(VariableDecl)
    }
    fn visit_type(&mut self, _node: &TypeSpec) -> VisitResult<Self::Output> {
        unhandled!(Type)
    }
    fn visit_array_type(&mut self, _node: &ArrayTypeSpec) -> VisitResult<Self::Output> {
        unhandled!(ArrayType)
    }
    fn visit_basic_type(&mut self, _node: &BasicTypeSpec) -> VisitResult<Self::Output> {
        unhandled!(BasicType)
    }
    fn visit_statements(&mut self, _node: &Statements) -> VisitResult<Self::Output> {
        unhandled!(Statements)
    }
    fn visit_assign_stmt(&mut self, _node: &AssignStmt) -> VisitResult<Self::Output> {
        unhandled!(AssignStmt)
    }
    fn visit_if_stmt(&mut self, _node: &IfStmt) -> VisitResult<Self::Output> {
        unhandled!(IfStmt)
    }
    fn visit_while_stmt(&mut self, _node: &WhileStmt) -> VisitResult<Self::Output> {
        unhandled!(WhileStmt)
    }
    fn visit_proc_call(&mut self, _node: &ProcCall) -> VisitResult<Self::Output> {
        unhandled!(ProcCall)
    }
    fn visit_return_stmt(&mut self, _node: &ReturnStmt) -> VisitResult<Self::Output> {
        unhandled!(ReturnStmt)
    }
    fn visit_read_stmt(&mut self, _node: &ReadStmt) -> VisitResult<Self::Output> {
        unhandled!(ReadStmt)
    }
    fn visit_write_expr(&mut self, _node: &WriteExpr) -> VisitResult<Self::Output> {
        unhandled!(WriteExpr)
    }
    fn visit_write_string(&mut self, _node: &WriteString) -> VisitResult<Self::Output> {
        unhandled!(WriteString)
    }
    fn visit_left_expr(&mut self, _node: &LeftExpr) -> VisitResult<Self::Output> {
        unhandled!(LeftExpr)
    }
    fn visit_function_call(&mut self, _node: &FunctionCall) -> VisitResult<Self::Output> {
        unhandled!(FunctionCall)
    }
    fn visit_expr_ident(&mut self, _node: &Ident) -> VisitResult<Self::Output> {
        unhandled!(ExprIdent)
    }
    fn visit_arithmetic(&mut self, _node: &Arithmetic) -> VisitResult<Self::Output> {
        unhandled!(Arithmetic)
    }
    fn visit_relational(&mut self, _node: &Relational) -> VisitResult<Self::Output> {
        unhandled!(Relational)
    }
    fn visit_array_access(&mut self, _node: &ArrayAccess) -> VisitResult<Self::Output> {
        unhandled!(ArrayAccess)
    }
    fn visit_unary(&mut self, _node: &Unary) -> VisitResult<Self::Output> {
        unhandled!(Unary)
    }
    fn visit_logic(&mut self, _node: &Logic) -> VisitResult<Self::Output> {
        unhandled!(Logic)
    }
    fn visit_parenthesis(&mut self, _node: &Parenthesis) -> VisitResult<Self::Output> {
        unhandled!(Parenthesis)
    }
    fn visit_value(&mut self, _node: &Value) -> VisitResult<Self::Output> {
        unhandled!(Value)
    }
    fn visit_paramexp(&mut self, _node: &ActualParameter) -> VisitResult<Self::Output> {
        unhandled!(Paramexp)
    }
    fn visit_ident(&mut self, _node: &Ident) -> VisitResult<Self::Output> {
        unhandled!(Ident)
    }
}

/// Runs the one handler of `visitor` responsible for the kind of `node`.
pub fn dispatch<'a, V: Visitor + ?Sized>(
    visitor: &mut V,
    node: impl Into<Node<'a>>,
) -> VisitResult<V::Output> {
    let node = node.into();
    trace!("{}: visiting {} {}", V::PASS, node.kind(), node.id());

    match node {
        Node::Program(node) => visitor.visit_program(node),
        Node::Function(node) => visitor.visit_function(node),
        Node::Parameters(node) => visitor.visit_parameters(node),
        Node::Parameter(node) => visitor.visit_parameter(node),
        Node::ReturnValue(node) => visitor.visit_return_value(node),
        Node::Declarations(node) => visitor.visit_declarations(node),
        Node::VariableDecl(node) => visitor.visit_variable_decl(node),
        Node::Type(node) => visitor.visit_type(node),
        Node::ArrayType(node) => visitor.visit_array_type(node),
        Node::BasicType(node) => visitor.visit_basic_type(node),
        Node::Statements(node) => visitor.visit_statements(node),
        Node::AssignStmt(node) => visitor.visit_assign_stmt(node),
        Node::IfStmt(node) => visitor.visit_if_stmt(node),
        Node::WhileStmt(node) => visitor.visit_while_stmt(node),
        Node::ProcCall(node) => visitor.visit_proc_call(node),
        Node::ReturnStmt(node) => visitor.visit_return_stmt(node),
        Node::ReadStmt(node) => visitor.visit_read_stmt(node),
        Node::WriteExpr(node) => visitor.visit_write_expr(node),
        Node::WriteString(node) => visitor.visit_write_string(node),
        Node::LeftExpr(node) => visitor.visit_left_expr(node),
        Node::FunctionCall(node) => visitor.visit_function_call(node),
        Node::ExprIdent(node) => visitor.visit_expr_ident(node),
        Node::Arithmetic(node) => visitor.visit_arithmetic(node),
        Node::Relational(node) => visitor.visit_relational(node),
        Node::ArrayAccess(node) => visitor.visit_array_access(node),
        Node::Unary(node) => visitor.visit_unary(node),
        Node::Logic(node) => visitor.visit_logic(node),
        Node::Parenthesis(node) => visitor.visit_parenthesis(node),
        Node::Value(node) => visitor.visit_value(node),
        Node::Paramexp(node) => visitor.visit_paramexp(node),
        Node::Ident(node) => visitor.visit_ident(node),
    }
}
