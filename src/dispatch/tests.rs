//! Unit tests for node dispatch.
//!
//! This module contains tests for the borrowed node view and for the
//! handler selection done by `dispatch`.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Function, NodeId, Program},
        builder::TreeBuilder,
        expressions::{ArithmeticOp, Expr},
        statements::{Statements, WriteString},
    },
    errors::errors::InternalError,
};

use super::dispatch::{dispatch, Node, NodeKind, Visitor, VisitResult};

/// Counts the statement kinds it walks through. Only knows about
/// functions, statement lists and string writes.
#[derive(Default)]
struct StatementCounter {
    seen: HashMap<NodeKind, usize>,
}

impl StatementCounter {
    fn count(&mut self, kind: NodeKind) {
        *self.seen.entry(kind).or_insert(0) += 1;
    }
}

impl Visitor for StatementCounter {
    type Output = ();
    const PASS: &'static str = "counting";

    fn visit_program(&mut self, node: &Program) -> VisitResult<()> {
        self.count(NodeKind::Program);
        for function in node.functions.iter() {
            dispatch(self, Node::Function(function))?;
        }
        Ok(())
    }

    fn visit_function(&mut self, node: &Function) -> VisitResult<()> {
        self.count(NodeKind::Function);
        dispatch(self, Node::Statements(&node.body))
    }

    fn visit_statements(&mut self, node: &Statements) -> VisitResult<()> {
        self.count(NodeKind::Statements);
        for stmt in node.iter() {
            dispatch(self, stmt)?;
        }
        Ok(())
    }

    fn visit_write_string(&mut self, _node: &WriteString) -> VisitResult<()> {
        self.count(NodeKind::WriteString);
        Ok(())
    }
}

#[test]
fn test_dispatch_selects_handler_by_kind() {
    let mut b = TreeBuilder::new("test.asl");
    let hello = b.write_string("hello");
    let world = b.write_string("world");
    let main = b.function("main", vec![], None, vec![], vec![hello, world]);
    let program = b.program(vec![main]);

    let mut counter = StatementCounter::default();
    dispatch(&mut counter, Node::Program(&program)).unwrap();

    assert_eq!(counter.seen[&NodeKind::Program], 1);
    assert_eq!(counter.seen[&NodeKind::Function], 1);
    assert_eq!(counter.seen[&NodeKind::Statements], 1);
    assert_eq!(counter.seen[&NodeKind::WriteString], 2);
}

#[test]
fn test_dispatch_missing_handler_is_fatal() {
    let mut b = TreeBuilder::new("test.asl");
    let hello = b.write_string("hello");
    let one = b.int(1);
    let write = b.write_expr(one);
    let after = b.write_string("never reached");
    let main = b.function("main", vec![], None, vec![], vec![hello, write, after]);
    let program = b.program(vec![main]);

    let mut counter = StatementCounter::default();
    let result = dispatch(&mut counter, Node::Program(&program));

    assert_eq!(
        result,
        Err(InternalError::MissingHandler {
            pass: "counting",
            kind: NodeKind::WriteExpr,
        })
    );
    assert_eq!(counter.seen[&NodeKind::WriteString], 1);
}

#[test]
fn test_node_from_expr() {
    let mut b = TreeBuilder::new("test.asl");
    let x = b.var("x");
    let two = b.int(2);
    let sum = b.arithmetic(ArithmeticOp::Mul, x, two);

    let node = Node::from(&sum);
    assert_eq!(node.kind(), NodeKind::Arithmetic);
    assert_eq!(node.id(), sum.id());

    let left = match &sum {
        Expr::Arithmetic(arithmetic) => Node::from(arithmetic.left.as_ref()),
        _ => unreachable!(),
    };
    assert_eq!(left.kind(), NodeKind::ExprIdent);
    assert_eq!(left.id(), NodeId(0));
}

#[test]
fn test_node_span_matches_id() {
    let mut b = TreeBuilder::new("test.asl");
    let hello = b.write_string("hello");
    let node = Node::from(&hello);

    assert_eq!(node.kind(), NodeKind::WriteString);
    assert_eq!(node.span().start.0, node.id().0);
    assert_eq!(node.span().end.0, node.id().0 + 1);
}

#[test]
fn test_node_kind_display() {
    assert_eq!(NodeKind::Paramexp.to_string(), "Paramexp");
    assert_eq!(NodeKind::ExprIdent.to_string(), "ExprIdent");
}

#[test]
fn test_node_parameter_kind() {
    let mut b = TreeBuilder::new("test.asl");
    let int = b.basic("int");
    let parameter = b.parameter("x", int);
    let node = Node::Parameter(&parameter);

    assert_eq!(node.kind(), NodeKind::Parameter);
    assert_eq!(node.id(), parameter.id);
    assert_eq!(
        Node::Ident(&parameter.name).kind(),
        NodeKind::Ident
    );

    let mut counter = StatementCounter::default();
    assert_eq!(
        dispatch(&mut counter, node),
        Err(InternalError::MissingHandler {
            pass: "counting",
            kind: NodeKind::Parameter,
        })
    );
}
