use crate::{
    ast::expressions::{
        ActualParameter, Arithmetic, ArithmeticOp, ArrayAccess, Expr, FunctionCall, Ident,
        Logic, Parenthesis, Relational, Unary, UnaryOp,
    },
    dispatch::dispatch::{dispatch, Node, VisitResult},
    errors::errors::{DiagnosticKind, InternalError},
    type_checker::symbol_table::ScopeError,
    Position,
};

use super::{
    stmt::{check_index, indexed_element},
    type_checker::TypeChecker,
    types::{arithmetic_result, comparable, equatable, Type},
};

/// Checks an expression whose value is consumed. A procedure call has no
/// value and is reported as [`DiagnosticKind::NotAFunction`].
pub fn type_check_value(type_checker: &mut TypeChecker, expr: &Expr) -> VisitResult<Type> {
    let value_type = dispatch(type_checker, expr)?;
    if !value_type.is_void() {
        return Ok(value_type);
    }

    let name = match expr.peel_parentheses() {
        Expr::Call(call) => call.callee.name.clone(),
        _ => String::from("expression"),
    };
    type_checker.report(DiagnosticKind::NotAFunction { name }, &expr.span().start);
    Ok(Type::Error)
}

fn operand_mismatch(
    type_checker: &mut TypeChecker,
    expected: &str,
    received: String,
    position: &Position,
) -> Type {
    type_checker.report(
        DiagnosticKind::TypeMismatch {
            expected: String::from(expected),
            received,
        },
        position,
    );
    Type::Error
}

fn finish(type_checker: &mut TypeChecker, node: Node<'_>, result: Type) -> VisitResult<Type> {
    type_checker.decorations.set_lvalue(node.id(), false);
    Ok(type_checker.decorate(node, result))
}

/// Resolves a name against the visible scopes.
pub fn type_check_ident(type_checker: &mut TypeChecker, node: &Ident) -> VisitResult<Type> {
    let resolved = type_checker
        .symbols
        .lookup(&node.name)
        .map(|symbol| (symbol.symbol_type.clone(), !symbol.is_function()));

    let (ident_type, is_lvalue) = match resolved {
        Ok(resolved) => resolved,
        Err(ScopeError::UndeclaredIdentifier { name }) => {
            type_checker.report(DiagnosticKind::UndeclaredIdentifier { name }, &node.span.start);
            (Type::Error, true)
        }
        Err(error) => return Err(InternalError::Scope(error)),
    };

    type_checker.decorations.set_lvalue(node.id, is_lvalue);
    Ok(type_checker.decorate(Node::Ident(node), ident_type))
}

/// A name used as an expression. Shares its node with the name itself.
pub fn type_check_expr_ident(type_checker: &mut TypeChecker, node: &Ident) -> VisitResult<Type> {
    dispatch(type_checker, Node::Ident(node))
}

pub fn type_check_arithmetic(type_checker: &mut TypeChecker, node: &Arithmetic) -> VisitResult<Type> {
    let left = type_checker.check_value(&node.left)?;
    let right = type_checker.check_value(&node.right)?;

    let result = if left.is_error() || right.is_error() {
        Type::Error
    } else if node.operator == ArithmeticOp::Mod {
        if left == Type::INT && right == Type::INT {
            Type::INT
        } else {
            operand_mismatch(
                type_checker,
                "int operands for %",
                format!("{} % {}", left, right),
                &node.span.start,
            )
        }
    } else {
        match (left.as_basic(), right.as_basic()) {
            (Some(l), Some(r)) if l.is_numeric() && r.is_numeric() => {
                Type::Basic(arithmetic_result(l, r))
            }
            _ => operand_mismatch(
                type_checker,
                "numeric operands",
                format!("{} {} {}", left, node.operator, right),
                &node.span.start,
            ),
        }
    };

    finish(type_checker, Node::Arithmetic(node), result)
}

pub fn type_check_relational(type_checker: &mut TypeChecker, node: &Relational) -> VisitResult<Type> {
    let left = type_checker.check_value(&node.left)?;
    let right = type_checker.check_value(&node.right)?;

    let valid = if node.operator.is_equality() {
        equatable(&left, &right)
    } else {
        comparable(&left, &right)
    };

    let result = if left.is_error() || right.is_error() {
        Type::Error
    } else if valid {
        Type::BOOL
    } else {
        let expected = if node.operator.is_equality() {
            "operands of the same basic type"
        } else {
            "numeric or char operands"
        };
        operand_mismatch(
            type_checker,
            expected,
            format!("{} {} {}", left, node.operator, right),
            &node.span.start,
        )
    };

    finish(type_checker, Node::Relational(node), result)
}

/// `and` and `or` on two bools.
pub fn type_check_logic(type_checker: &mut TypeChecker, node: &Logic) -> VisitResult<Type> {
    let left = type_checker.check_value(&node.left)?;
    let right = type_checker.check_value(&node.right)?;

    let result = if left.is_error() || right.is_error() {
        Type::Error
    } else if left == Type::BOOL && right == Type::BOOL {
        Type::BOOL
    } else {
        operand_mismatch(
            type_checker,
            "bool operands",
            format!("{} {} {}", left, node.operator, right),
            &node.span.start,
        )
    };

    finish(type_checker, Node::Logic(node), result)
}

pub fn type_check_unary(type_checker: &mut TypeChecker, node: &Unary) -> VisitResult<Type> {
    let operand = type_checker.check_value(&node.operand)?;

    let result = match node.operator {
        _ if operand.is_error() => Type::Error,
        UnaryOp::Not if operand == Type::BOOL => Type::BOOL,
        UnaryOp::Minus | UnaryOp::Plus if operand.is_numeric() => operand,
        UnaryOp::Not => operand_mismatch(
            type_checker,
            "a bool operand",
            format!("{} {}", node.operator, operand),
            &node.span.start,
        ),
        UnaryOp::Minus | UnaryOp::Plus => operand_mismatch(
            type_checker,
            "a numeric operand",
            format!("{}{}", node.operator, operand),
            &node.span.start,
        ),
    };

    finish(type_checker, Node::Unary(node), result)
}

/// `a[i]` read as a value. It denotes storage whenever `a` does.
pub fn type_check_array_access(
    type_checker: &mut TypeChecker,
    node: &ArrayAccess,
) -> VisitResult<Type> {
    let base = dispatch(type_checker, Node::Ident(&node.base))?;
    let index_type = type_checker.check_value(&node.index)?;
    check_index(type_checker, &index_type, &node.index)?;

    let element = indexed_element(type_checker, &base, &node.base.name, &node.span.start);
    let is_lvalue = type_checker.decorations.is_lvalue(node.base.id);
    type_checker.decorations.set_lvalue(node.id, is_lvalue);
    Ok(type_checker.decorate(Node::ArrayAccess(node), element))
}

/// Parentheses keep the type of what they enclose but never denote storage.
pub fn type_check_parenthesis(
    type_checker: &mut TypeChecker,
    node: &Parenthesis,
) -> VisitResult<Type> {
    let inner = dispatch(type_checker, node.inner.as_ref())?;
    finish(type_checker, Node::Parenthesis(node), inner)
}

/// A call in any position. Yields `Void` for a procedure; consumers that
/// need a value report it.
pub fn type_check_function_call(
    type_checker: &mut TypeChecker,
    node: &FunctionCall,
) -> VisitResult<Type> {
    let callee = dispatch(type_checker, Node::Ident(&node.callee))?;

    let mut arguments = vec![];
    for argument in node.arguments.iter() {
        arguments.push(dispatch(type_checker, Node::Paramexp(argument))?);
    }

    let result = match callee.signature() {
        Some((parameters, return_type)) => {
            if parameters.len() != arguments.len() {
                type_checker.report(
                    DiagnosticKind::ArityMismatch {
                        function: node.callee.name.clone(),
                        expected: parameters.len(),
                        received: arguments.len(),
                    },
                    &node.span.start,
                );
                // A procedure called with the wrong arity would otherwise
                // also be reported where its value is used.
                if return_type.is_void() {
                    return finish(type_checker, Node::FunctionCall(node), Type::Error);
                }
            } else {
                for ((parameter, argument_type), argument) in
                    parameters.iter().zip(arguments.iter()).zip(node.arguments.iter())
                {
                    if !parameter.accepts(argument_type) {
                        type_checker.report(
                            DiagnosticKind::TypeMismatch {
                                expected: parameter.to_string(),
                                received: argument_type.to_string(),
                            },
                            &argument.span.start,
                        );
                    } else if parameter.is_array()
                        && !argument_type.is_error()
                        && !matches!(argument.value.peel_parentheses(), Expr::Ident(_))
                    {
                        // Arrays are passed by reference and need storage to refer to.
                        type_checker.report(
                            DiagnosticKind::NotReferenceable {
                                name: node.callee.name.clone(),
                            },
                            &argument.span.start,
                        );
                    }
                }
            }
            return_type.clone()
        }
        None if callee.is_error() => Type::Error,
        None => {
            type_checker.report(
                DiagnosticKind::NotCallable {
                    name: node.callee.name.clone(),
                },
                &node.callee.span.start,
            );
            Type::Error
        }
    };

    finish(type_checker, Node::FunctionCall(node), result)
}

/// One argument of a call; its value is always consumed.
pub fn type_check_paramexp(
    type_checker: &mut TypeChecker,
    node: &ActualParameter,
) -> VisitResult<Type> {
    let argument = type_checker.check_value(&node.value)?;
    finish(type_checker, Node::Paramexp(node), argument)
}
