#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use crate::{
    ast::ast::Program,
    compiler::{compiler::generate, instructions::Code},
    errors::errors::{CompileError, Diagnostic},
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod dispatch;
pub mod errors;
pub mod macros;
pub mod type_checker;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.1, self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Settings shared by the checker and the generator for one compilation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the function the program starts in. It must take no
    /// parameters and return nothing.
    pub entry_point: String,
    /// Report a warning when a parameter or local hides a function name.
    pub warn_shadowing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            entry_point: String::from("main"),
            warn_shadowing: true,
        }
    }
}

/// A successful compilation: the generated code plus any warnings.
#[derive(Debug)]
pub struct Compilation {
    pub code: Code,
    pub warnings: Vec<Diagnostic>,
}

/// Runs the checker and, when it reports no errors, the generator.
///
/// Diagnostics with error severity are returned as
/// [`CompileError::Rejected`]; generation is never attempted in that case.
pub fn compile(program: &Program, config: &Config) -> Result<Compilation, CompileError> {
    let checked = type_check(program, config)?;

    if checked.has_errors() {
        return Err(CompileError::Rejected {
            diagnostics: checked.diagnostics,
        });
    }

    let code = generate(program, &checked)?;

    Ok(Compilation {
        code,
        warnings: checked.diagnostics,
    })
}
