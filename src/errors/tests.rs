//! Unit tests for error handling.
//!
//! This module contains tests for diagnostics, their severities and tips,
//! and the fatal error types.

use crate::dispatch::dispatch::NodeKind;
use crate::errors::errors::{
    CompileError, Diagnostic, DiagnosticKind, ErrorTip, InternalError, Severity,
};
use crate::type_checker::symbol_table::ScopeError;
use crate::Position;
use std::rc::Rc;

fn position(offset: u32) -> Position {
    Position(offset, Rc::new("test.asl".to_string()))
}

#[test]
fn test_diagnostic_creation() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UndeclaredIdentifier {
            name: "foo".to_string(),
        },
        position(10),
    );

    assert_eq!(diagnostic.get_error_name(), "UndeclaredIdentifier");
    assert_eq!(diagnostic.get_position().0, 10);
    assert!(diagnostic.is_error());
}

#[test]
fn test_shadowing_is_a_warning() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::ShadowedDeclaration {
            name: "f".to_string(),
        },
        position(3),
    );

    assert_eq!(diagnostic.get_severity(), Severity::Warning);
    assert!(!diagnostic.is_error());
    assert!(matches!(diagnostic.get_tip(), ErrorTip::None));
}

#[test]
fn test_type_mismatch_message() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::TypeMismatch {
            expected: "int".to_string(),
            received: "bool".to_string(),
        },
        position(7),
    );

    assert_eq!(diagnostic.get_error_name(), "TypeMismatch");
    assert_eq!(
        diagnostic.to_string(),
        "error[TypeMismatch] at test.asl:7: types do not match: expected int, received bool"
    );
    assert_eq!(
        diagnostic.get_tip().to_string(),
        "Expected type `int`, received `bool`"
    );
}

#[test]
fn test_arity_mismatch_tip() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::ArityMismatch {
            function: "f".to_string(),
            expected: 2,
            received: 1,
        },
        position(0),
    );

    assert_eq!(diagnostic.get_error_name(), "ArityMismatch");
    assert_eq!(
        diagnostic.get_tip().to_string(),
        "`f` expects 2 arguments, received 1"
    );
}

#[test]
fn test_no_entry_point_tip() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::NoEntryPoint {
            name: "main".to_string(),
        },
        position(0),
    );

    assert_eq!(
        diagnostic.get_tip().to_string(),
        "Declare `func main()` with no parameters and no return type"
    );
}

#[test]
fn test_internal_error_messages() {
    let missing = InternalError::MissingHandler {
        pass: "code generation",
        kind: NodeKind::WhileStmt,
    };
    assert_eq!(
        missing.to_string(),
        "the code generation pass has no handler for WhileStmt nodes"
    );

    let scope: InternalError = ScopeError::NoOpenScope.into();
    assert_eq!(scope.to_string(), "symbol table misuse: no scope is open");
}

#[test]
fn test_compile_error_wraps_internal_error() {
    let error: CompileError = InternalError::MissingOperand {
        kind: NodeKind::Value,
    }
    .into();

    assert!(matches!(error, CompileError::Internal(_)));
    assert_eq!(
        error.to_string(),
        "internal compiler error: Value node produced no value"
    );
}

#[test]
fn test_rejected_counts_only_errors() {
    let diagnostics = vec![
        Diagnostic::new(
            DiagnosticKind::ShadowedDeclaration {
                name: "f".to_string(),
            },
            position(1),
        ),
        Diagnostic::new(
            DiagnosticKind::NotCallable {
                name: "x".to_string(),
            },
            position(2),
        ),
    ];
    let error = CompileError::Rejected { diagnostics };

    assert_eq!(error.to_string(), "program rejected with 1 errors");
}

#[test]
fn test_frame_too_large_diagnostic() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::FrameTooLarge {
            name: "buffer".to_string(),
        },
        position(5),
    );

    assert_eq!(diagnostic.get_error_name(), "FrameTooLarge");
    assert!(diagnostic.is_error());
    assert_eq!(
        diagnostic.get_kind().to_string(),
        "\"buffer\" does not fit in the frame"
    );
}
