//! Construction helpers for syntax trees.
//!
//! The parser that feeds this crate lives outside of it; whatever produces
//! the tree only has to hand out unique [`NodeId`]s and spans. `TreeBuilder`
//! does both, numbering nodes in creation order and giving each node a
//! distinct position so diagnostics can be traced back to it.

use std::rc::Rc;

use crate::{Span, MK_SPAN};

use super::{
    ast::{
        Declarations, Function, NodeId, Parameter, Parameters, Program, ReturnValue, VariableDecl,
    },
    expressions::{
        ActualParameter, Arithmetic, ArithmeticOp, ArrayAccess, Expr, FunctionCall, Ident,
        Literal, Logic, LogicOp, Parenthesis, Relational, RelationalOp, Unary, UnaryOp, Value,
    },
    statements::{
        AssignStmt, IfStmt, LeftExpr, ProcCall, ReadStmt, ReturnStmt, Statements, Stmt,
        WhileStmt, WriteExpr, WriteString,
    },
    types::{ArrayTypeSpec, BasicTypeSpec, TypeSpec},
};

#[derive(Debug)]
pub struct TreeBuilder {
    file: Rc<String>,
    next_id: u32,
}

impl TreeBuilder {
    pub fn new(file_name: &str) -> Self {
        TreeBuilder {
            file: Rc::new(String::from(file_name)),
            next_id: 0,
        }
    }

    fn next(&mut self) -> (NodeId, Span) {
        let id = self.next_id;
        self.next_id += 1;
        (NodeId(id), MK_SPAN!(id, id + 1, self.file))
    }

    pub fn program(&mut self, functions: Vec<Function>) -> Program {
        let (id, span) = self.next();
        Program { functions, id, span }
    }

    pub fn function(
        &mut self,
        name: &str,
        parameters: Vec<Parameter>,
        return_type: Option<&str>,
        declarations: Vec<VariableDecl>,
        body: Vec<Stmt>,
    ) -> Function {
        let name = self.ident(name);
        let parameters = {
            let (id, span) = self.next();
            Parameters { parameters, id, span }
        };
        let return_value = return_type.map(|type_name| {
            let return_type = self.basic_type(type_name);
            let (id, span) = self.next();
            ReturnValue { return_type, id, span }
        });
        let declarations = {
            let (id, span) = self.next();
            Declarations { declarations, id, span }
        };
        let body = self.statements(body);
        let (id, span) = self.next();
        Function {
            name,
            parameters,
            return_value,
            declarations,
            body,
            id,
            span,
        }
    }

    pub fn parameter(&mut self, name: &str, parameter_type: TypeSpec) -> Parameter {
        let name = self.ident(name);
        let (id, span) = self.next();
        Parameter {
            name,
            parameter_type,
            id,
            span,
        }
    }

    pub fn variable_decl(&mut self, names: &[&str], variable_type: TypeSpec) -> VariableDecl {
        let names = names.iter().map(|name| self.ident(name)).collect();
        let (id, span) = self.next();
        VariableDecl {
            names,
            variable_type,
            id,
            span,
        }
    }

    pub fn basic_type(&mut self, name: &str) -> BasicTypeSpec {
        let (id, span) = self.next();
        BasicTypeSpec {
            name: String::from(name),
            id,
            span,
        }
    }

    pub fn basic(&mut self, name: &str) -> TypeSpec {
        TypeSpec::Basic(self.basic_type(name))
    }

    pub fn array(&mut self, size: &str, element: &str) -> TypeSpec {
        let element = self.basic_type(element);
        let (id, span) = self.next();
        TypeSpec::Array(ArrayTypeSpec {
            size: String::from(size),
            element,
            id,
            span,
        })
    }

    pub fn statements(&mut self, statements: Vec<Stmt>) -> Statements {
        let (id, span) = self.next();
        Statements {
            statements,
            id,
            span,
        }
    }

    pub fn assign(&mut self, left: LeftExpr, value: Expr) -> Stmt {
        let (id, span) = self.next();
        Stmt::Assign(AssignStmt {
            left,
            value,
            id,
            span,
        })
    }

    pub fn if_stmt(&mut self, condition: Expr, then_body: Vec<Stmt>, else_body: Option<Vec<Stmt>>) -> Stmt {
        let then_body = self.statements(then_body);
        let else_body = else_body.map(|body| self.statements(body));
        let (id, span) = self.next();
        Stmt::If(IfStmt {
            condition,
            then_body,
            else_body,
            id,
            span,
        })
    }

    pub fn while_stmt(&mut self, condition: Expr, body: Vec<Stmt>) -> Stmt {
        let body = self.statements(body);
        let (id, span) = self.next();
        Stmt::While(WhileStmt {
            condition,
            body,
            id,
            span,
        })
    }

    pub fn proc_call(&mut self, callee: &str, arguments: Vec<Expr>) -> Stmt {
        let call = self.function_call(callee, arguments);
        let (id, span) = self.next();
        Stmt::ProcCall(ProcCall { call, id, span })
    }

    pub fn return_stmt(&mut self, value: Option<Expr>) -> Stmt {
        let (id, span) = self.next();
        Stmt::Return(ReturnStmt { value, id, span })
    }

    pub fn read(&mut self, target: LeftExpr) -> Stmt {
        let (id, span) = self.next();
        Stmt::Read(ReadStmt { target, id, span })
    }

    pub fn write_expr(&mut self, value: Expr) -> Stmt {
        let (id, span) = self.next();
        Stmt::WriteExpr(WriteExpr { value, id, span })
    }

    pub fn write_string(&mut self, text: &str) -> Stmt {
        let (id, span) = self.next();
        Stmt::WriteString(WriteString {
            text: String::from(text),
            id,
            span,
        })
    }

    pub fn left(&mut self, name: &str) -> LeftExpr {
        let ident = self.ident(name);
        let (id, span) = self.next();
        LeftExpr {
            ident,
            index: None,
            id,
            span,
        }
    }

    pub fn left_indexed(&mut self, name: &str, index: Expr) -> LeftExpr {
        let ident = self.ident(name);
        let (id, span) = self.next();
        LeftExpr {
            ident,
            index: Some(Box::new(index)),
            id,
            span,
        }
    }

    pub fn ident(&mut self, name: &str) -> Ident {
        let (id, span) = self.next();
        Ident {
            name: String::from(name),
            id,
            span,
        }
    }

    /// An identifier used as an expression.
    pub fn var(&mut self, name: &str) -> Expr {
        Expr::Ident(self.ident(name))
    }

    pub fn literal(&mut self, literal: Literal) -> Expr {
        let (id, span) = self.next();
        Expr::Value(Value { literal, id, span })
    }

    pub fn int(&mut self, value: i64) -> Expr {
        self.literal(Literal::Int(value))
    }

    pub fn float(&mut self, value: f64) -> Expr {
        self.literal(Literal::Float(value))
    }

    pub fn boolean(&mut self, value: bool) -> Expr {
        self.literal(Literal::Bool(value))
    }

    pub fn character(&mut self, value: char) -> Expr {
        self.literal(Literal::Char(value))
    }

    pub fn arithmetic(&mut self, operator: ArithmeticOp, left: Expr, right: Expr) -> Expr {
        let (id, span) = self.next();
        Expr::Arithmetic(Arithmetic {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            id,
            span,
        })
    }

    pub fn relational(&mut self, operator: RelationalOp, left: Expr, right: Expr) -> Expr {
        let (id, span) = self.next();
        Expr::Relational(Relational {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            id,
            span,
        })
    }

    pub fn logic(&mut self, operator: LogicOp, left: Expr, right: Expr) -> Expr {
        let (id, span) = self.next();
        Expr::Logic(Logic {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            id,
            span,
        })
    }

    pub fn unary(&mut self, operator: UnaryOp, operand: Expr) -> Expr {
        let (id, span) = self.next();
        Expr::Unary(Unary {
            operator,
            operand: Box::new(operand),
            id,
            span,
        })
    }

    pub fn parenthesis(&mut self, inner: Expr) -> Expr {
        let (id, span) = self.next();
        Expr::Parenthesis(Parenthesis {
            inner: Box::new(inner),
            id,
            span,
        })
    }

    pub fn index(&mut self, base: &str, index: Expr) -> Expr {
        let base = self.ident(base);
        let (id, span) = self.next();
        Expr::ArrayAccess(ArrayAccess {
            base,
            index: Box::new(index),
            id,
            span,
        })
    }

    pub fn call(&mut self, callee: &str, arguments: Vec<Expr>) -> Expr {
        Expr::Call(self.function_call(callee, arguments))
    }

    fn function_call(&mut self, callee: &str, arguments: Vec<Expr>) -> FunctionCall {
        let callee = self.ident(callee);
        let arguments = arguments
            .into_iter()
            .map(|value| {
                let (id, span) = self.next();
                ActualParameter { value, id, span }
            })
            .collect();
        let (id, span) = self.next();
        FunctionCall {
            callee,
            arguments,
            id,
            span,
        }
    }
}
