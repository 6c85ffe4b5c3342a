use std::fmt::Display;

use thiserror::Error;

use crate::{
    dispatch::dispatch::NodeKind,
    type_checker::{symbol_table::ScopeError, types::MAX_FRAME_SIZE},
    Position,
};

/// How serious a diagnostic is. Only errors block code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A problem found in the user's program.
///
/// Diagnostics are collected by the checker, never thrown.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    severity: Severity,
    position: Position,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: Position) -> Self {
        Diagnostic {
            severity: kind.severity(),
            kind,
            position,
        }
    }

    pub fn get_kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            DiagnosticKind::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            DiagnosticKind::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            DiagnosticKind::TypeMismatch { .. } => "TypeMismatch",
            DiagnosticKind::ArityMismatch { .. } => "ArityMismatch",
            DiagnosticKind::NotCallable { .. } => "NotCallable",
            DiagnosticKind::NotIndexable { .. } => "NotIndexable",
            DiagnosticKind::MissingReturn { .. } => "MissingReturn",
            DiagnosticKind::UnexpectedReturnValue { .. } => "UnexpectedReturnValue",
            DiagnosticKind::InvalidArraySize { .. } => "InvalidArraySize",
            DiagnosticKind::FrameTooLarge { .. } => "FrameTooLarge",
            DiagnosticKind::UnknownType { .. } => "UnknownType",
            DiagnosticKind::NotReferenceable { .. } => "NotReferenceable",
            DiagnosticKind::NotAFunction { .. } => "NotAFunction",
            DiagnosticKind::ReadWriteRequireBasic { .. } => "ReadWriteRequireBasic",
            DiagnosticKind::NoEntryPoint { .. } => "NoEntryPoint",
            DiagnosticKind::ShadowedDeclaration { .. } => "ShadowedDeclaration",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.kind {
            DiagnosticKind::DuplicateDeclaration { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            DiagnosticKind::UndeclaredIdentifier { name } => {
                ErrorTip::Suggestion(format!("`{}` must be declared before it is used", name))
            }
            DiagnosticKind::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            DiagnosticKind::ArityMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            DiagnosticKind::NotCallable { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a function", name))
            }
            DiagnosticKind::NotIndexable { name } => {
                ErrorTip::Suggestion(format!("`{}` is not an array", name))
            }
            DiagnosticKind::MissingReturn { function, expected } => ErrorTip::Suggestion(format!(
                "`{}` must return a value of type `{}`",
                function, expected
            )),
            DiagnosticKind::UnexpectedReturnValue { function } => ErrorTip::Suggestion(format!(
                "`{}` has no return type, remove the returned value",
                function
            )),
            DiagnosticKind::InvalidArraySize { .. } => ErrorTip::Suggestion(String::from(
                "Array sizes must be non-negative integer constants and the array must fit in a frame",
            )),
            DiagnosticKind::FrameTooLarge { .. } => ErrorTip::Suggestion(format!(
                "The parameters and variables of a function may use at most {} bytes",
                MAX_FRAME_SIZE
            )),
            DiagnosticKind::UnknownType { .. } => {
                ErrorTip::Suggestion(String::from("Known types are int, float, bool and char"))
            }
            DiagnosticKind::NotReferenceable { .. } => ErrorTip::Suggestion(String::from(
                "Only variables and array elements can be written to or passed by reference",
            )),
            DiagnosticKind::NotAFunction { name } => ErrorTip::Suggestion(format!(
                "`{}` does not return a value and can only be called as a statement",
                name
            )),
            DiagnosticKind::ReadWriteRequireBasic { .. } => ErrorTip::Suggestion(String::from(
                "Only int, float, bool and char values can be read or written",
            )),
            DiagnosticKind::NoEntryPoint { name } => ErrorTip::Suggestion(format!(
                "Declare `func {}()` with no parameters and no return type",
                name
            )),
            DiagnosticKind::ShadowedDeclaration { .. } => ErrorTip::None,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}] at {}: {}",
            self.severity,
            self.get_error_name(),
            self.position,
            self.kind
        )
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("{name:?} already declared")]
    DuplicateDeclaration { name: String },
    #[error("{name:?} not declared")]
    UndeclaredIdentifier { name: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("{function:?} called with {received} arguments, expected {expected}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("{name:?} is not callable")]
    NotCallable { name: String },
    #[error("{name:?} cannot be indexed")]
    NotIndexable { name: String },
    #[error("missing return value of type {expected} in {function:?}")]
    MissingReturn { function: String, expected: String },
    #[error("{function:?} cannot return a value")]
    UnexpectedReturnValue { function: String },
    #[error("invalid array size {size:?}")]
    InvalidArraySize { size: String },
    #[error("{name:?} does not fit in the frame")]
    FrameTooLarge { name: String },
    #[error("unknown type {name:?}")]
    UnknownType { name: String },
    #[error("{name:?} is not referenceable")]
    NotReferenceable { name: String },
    #[error("{name:?} does not return a value")]
    NotAFunction { name: String },
    #[error("read and write require a basic type, received {received}")]
    ReadWriteRequireBasic { received: String },
    #[error("no entry function {name:?} properly declared")]
    NoEntryPoint { name: String },
    #[error("{name:?} shadows a function of the same name")]
    ShadowedDeclaration { name: String },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::ShadowedDeclaration { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A defect in the compiler itself rather than in the user's program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InternalError {
    #[error("the {pass} pass has no handler for {kind} nodes")]
    MissingHandler { pass: &'static str, kind: NodeKind },
    #[error("{kind} node {id} was not decorated by the checker")]
    MissingDecoration { kind: NodeKind, id: u32 },
    #[error("{kind} node produced no value")]
    MissingOperand { kind: NodeKind },
    #[error("{kind} node has no address to pass by reference")]
    NotAddressable { kind: NodeKind },
    #[error("symbol table misuse: {0}")]
    Scope(#[from] ScopeError),
}

/// Reasons a compilation stops without producing code.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error("internal compiler error: {0}")]
    Internal(#[from] InternalError),
    #[error("code generation requested with {count} unresolved errors")]
    UnresolvedErrorsPresent { count: usize },
    #[error("program rejected with {} errors", .diagnostics.iter().filter(|d| d.is_error()).count())]
    Rejected { diagnostics: Vec<Diagnostic> },
}
