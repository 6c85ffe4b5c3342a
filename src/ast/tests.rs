//! Unit tests for the syntax tree.
//!
//! This module contains tests for tree construction, node ids and the
//! operator lookup tables.

use crate::ast::{
    ast::NodeId,
    builder::TreeBuilder,
    expressions::{ArithmeticOp, Expr, LogicOp, RelationalOp, UnaryOp},
    lookups::BASIC_TYPE_LOOKUP,
    statements::Stmt,
    types::TypeSpec,
};
use crate::type_checker::types::BasicType;

#[test]
fn test_builder_assigns_sequential_ids() {
    let mut b = TreeBuilder::new("test.asl");
    let x = b.var("x");
    let one = b.int(1);
    let sum = b.arithmetic(ArithmeticOp::Add, x, one);

    assert_eq!(sum.id(), NodeId(2));
    match &sum {
        Expr::Arithmetic(arithmetic) => {
            assert_eq!(arithmetic.left.id(), NodeId(0));
            assert_eq!(arithmetic.right.id(), NodeId(1));
        }
        other => panic!("Expected arithmetic, got {:?}", other),
    }
}

#[test]
fn test_builder_spans_carry_file_name() {
    let mut b = TreeBuilder::new("prog.asl");
    let stmt = b.write_string("hi");

    assert_eq!(stmt.span().start.1.as_str(), "prog.asl");
    assert_eq!(stmt.span().start.0, 0);
    assert_eq!(stmt.span().end.0, 1);
}

#[test]
fn test_function_shape() {
    let mut b = TreeBuilder::new("test.asl");
    let int = b.basic("int");
    let x = b.parameter("x", int);
    let var_x = b.var("x");
    let ret = b.return_stmt(Some(var_x));
    let f = b.function("f", vec![x], Some("int"), vec![], vec![ret]);

    assert_eq!(f.name.name, "f");
    assert!(f.returns_value());
    assert_eq!(f.parameters.len(), 1);
    assert_eq!(f.body.len(), 1);
    assert!(matches!(f.body.iter().next(), Some(Stmt::Return(_))));
    assert!(f.name.id < f.id);
}

#[test]
fn test_peel_parentheses() {
    let mut b = TreeBuilder::new("test.asl");
    let x = b.var("x");
    let inner = b.parenthesis(x);
    let outer = b.parenthesis(inner);

    match outer.peel_parentheses() {
        Expr::Ident(ident) => assert_eq!(ident.name, "x"),
        other => panic!("Expected identifier, got {:?}", other),
    }
}

#[test]
fn test_array_type_spec() {
    let mut b = TreeBuilder::new("test.asl");
    let array = b.array("10", "float");

    match &array {
        TypeSpec::Array(array_spec) => {
            assert_eq!(array_spec.size, "10");
            assert_eq!(array_spec.element.name, "float");
            assert_eq!(array.id(), array_spec.id);
        }
        other => panic!("Expected array type, got {:?}", other),
    }
}

#[test]
fn test_operator_symbols() {
    assert_eq!(ArithmeticOp::from_symbol("%"), Some(ArithmeticOp::Mod));
    assert_eq!(RelationalOp::from_symbol("!="), Some(RelationalOp::NotEquals));
    assert_eq!(LogicOp::from_symbol("and"), Some(LogicOp::And));
    assert_eq!(UnaryOp::from_symbol("not"), Some(UnaryOp::Not));
    assert_eq!(ArithmeticOp::from_symbol("**"), None);

    assert_eq!(RelationalOp::GreaterEquals.to_string(), ">=");
    assert_eq!(UnaryOp::Minus.symbol(), "-");
    assert!(RelationalOp::Equals.is_equality());
    assert!(!RelationalOp::Less.is_equality());
}

#[test]
fn test_basic_type_lookup() {
    assert_eq!(BASIC_TYPE_LOOKUP.get("char"), Some(&BasicType::Char));
    assert_eq!(BASIC_TYPE_LOOKUP.get("string"), None);
}
