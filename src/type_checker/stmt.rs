use crate::{
    ast::{
        expressions::Expr,
        statements::{
            AssignStmt, IfStmt, LeftExpr, ProcCall, ReadStmt, ReturnStmt, Statements, WhileStmt,
            WriteExpr,
        },
    },
    dispatch::dispatch::{dispatch, Node, VisitResult},
    errors::errors::DiagnosticKind,
    Position,
};

use super::{type_checker::TypeChecker, types::Type};

pub fn type_check_assign_stmt(
    type_checker: &mut TypeChecker,
    node: &AssignStmt,
) -> VisitResult<Type> {
    let target = dispatch(type_checker, Node::LeftExpr(&node.left))?;
    let value = type_checker.check_value(&node.value)?;

    if !target.is_error() && !type_checker.decorations.is_lvalue(node.left.id) {
        type_checker.report(
            DiagnosticKind::NotReferenceable {
                name: node.left.ident.name.clone(),
            },
            &node.left.span.start,
        );
    } else if !target.accepts(&value) {
        type_checker.report(
            DiagnosticKind::TypeMismatch {
                expected: target.to_string(),
                received: value.to_string(),
            },
            &node.value.span().start,
        );
    }

    Ok(Type::Void)
}

/// Conditions must be bool; an int is not accepted.
fn type_check_condition(type_checker: &mut TypeChecker, condition: &Expr) -> VisitResult<()> {
    let condition_type = type_checker.check_value(condition)?;
    if !condition_type.is_error() && condition_type != Type::BOOL {
        type_checker.report(
            DiagnosticKind::TypeMismatch {
                expected: Type::BOOL.to_string(),
                received: condition_type.to_string(),
            },
            &condition.span().start,
        );
    }
    Ok(())
}

fn type_check_block(type_checker: &mut TypeChecker, block: &Statements) -> VisitResult<()> {
    type_checker.symbols.open_scope();
    dispatch(type_checker, Node::Statements(block))?;
    type_checker.symbols.close_scope();
    Ok(())
}

pub fn type_check_if_stmt(type_checker: &mut TypeChecker, node: &IfStmt) -> VisitResult<Type> {
    type_check_condition(type_checker, &node.condition)?;
    type_check_block(type_checker, &node.then_body)?;
    if let Some(else_body) = &node.else_body {
        type_check_block(type_checker, else_body)?;
    }
    Ok(Type::Void)
}

pub fn type_check_while_stmt(type_checker: &mut TypeChecker, node: &WhileStmt) -> VisitResult<Type> {
    type_check_condition(type_checker, &node.condition)?;
    type_check_block(type_checker, &node.body)?;
    Ok(Type::Void)
}

/// A call used as a statement. Its value, if any, is discarded.
pub fn type_check_proc_call(type_checker: &mut TypeChecker, node: &ProcCall) -> VisitResult<Type> {
    dispatch(type_checker, Node::FunctionCall(&node.call))?;
    Ok(Type::Void)
}

pub fn type_check_return_stmt(
    type_checker: &mut TypeChecker,
    node: &ReturnStmt,
) -> VisitResult<Type> {
    let (function, return_type) = match &type_checker.current_function {
        Some(context) => (context.name.clone(), context.return_type.clone()),
        None => (String::new(), Type::Void),
    };

    match &node.value {
        Some(value) => {
            let value_type = type_checker.check_value(value)?;
            if return_type.is_void() {
                type_checker.report(
                    DiagnosticKind::UnexpectedReturnValue { function },
                    &node.span.start,
                );
            } else if !return_type.accepts(&value_type) {
                type_checker.report(
                    DiagnosticKind::TypeMismatch {
                        expected: return_type.to_string(),
                        received: value_type.to_string(),
                    },
                    &value.span().start,
                );
            }
        }
        None if !return_type.is_void() && !return_type.is_error() => {
            type_checker.report(
                DiagnosticKind::MissingReturn {
                    function,
                    expected: return_type.to_string(),
                },
                &node.span.start,
            );
        }
        None => {}
    }

    Ok(Type::Void)
}

pub fn type_check_read_stmt(type_checker: &mut TypeChecker, node: &ReadStmt) -> VisitResult<Type> {
    let target = dispatch(type_checker, Node::LeftExpr(&node.target))?;

    if target.is_error() {
        return Ok(Type::Void);
    }
    if !type_checker.decorations.is_lvalue(node.target.id) {
        type_checker.report(
            DiagnosticKind::NotReferenceable {
                name: node.target.ident.name.clone(),
            },
            &node.target.span.start,
        );
    } else if !target.is_basic() {
        type_checker.report(
            DiagnosticKind::ReadWriteRequireBasic {
                received: target.to_string(),
            },
            &node.target.span.start,
        );
    }

    Ok(Type::Void)
}

pub fn type_check_write_expr(type_checker: &mut TypeChecker, node: &WriteExpr) -> VisitResult<Type> {
    let value = type_checker.check_value(&node.value)?;
    if !value.is_error() && !value.is_basic() {
        type_checker.report(
            DiagnosticKind::ReadWriteRequireBasic {
                received: value.to_string(),
            },
            &node.value.span().start,
        );
    }
    Ok(Type::Void)
}

/// The target of an assignment or a read: a name, optionally indexed.
pub fn type_check_left_expr(type_checker: &mut TypeChecker, node: &LeftExpr) -> VisitResult<Type> {
    let base = dispatch(type_checker, Node::Ident(&node.ident))?;
    let is_lvalue = type_checker.decorations.is_lvalue(node.ident.id);

    let target = match &node.index {
        None => base,
        Some(index) => {
            let index_type = type_checker.check_value(index)?;
            check_index(type_checker, &index_type, index)?;
            indexed_element(type_checker, &base, &node.ident.name, &node.span.start)
        }
    };

    type_checker.decorations.set_lvalue(node.id, is_lvalue);
    Ok(type_checker.decorate(Node::LeftExpr(node), target))
}

/// Array indices must be int.
pub(super) fn check_index(
    type_checker: &mut TypeChecker,
    index_type: &Type,
    index: &Expr,
) -> VisitResult<()> {
    if !index_type.is_error() && *index_type != Type::INT {
        type_checker.report(
            DiagnosticKind::TypeMismatch {
                expected: Type::INT.to_string(),
                received: index_type.to_string(),
            },
            &index.span().start,
        );
    }
    Ok(())
}

/// Type of `name[...]` given the type of `name`.
pub(super) fn indexed_element(
    type_checker: &mut TypeChecker,
    base: &Type,
    name: &str,
    position: &Position,
) -> Type {
    match base {
        Type::Array { .. } => base.element().unwrap_or(Type::Error),
        Type::Error => Type::Error,
        _ => {
            type_checker.report(
                DiagnosticKind::NotIndexable {
                    name: String::from(name),
                },
                position,
            );
            Type::Error
        }
    }
}
