//! Semantic analysis module.
//!
//! Checks a syntax tree and decorates it for the generator:
//!
//! - Builds the symbol table, one scope per function plus the global one
//! - Records the type and l-value status of every expression
//! - Validates declarations, statements and calls against the type rules
//! - Reports every problem found as a diagnostic and keeps going
//!
//! The tree itself is never modified; see [`decorations`].

pub mod decorations;
pub mod expr;
pub mod stmt;
pub mod symbol_table;
pub mod type_checker;
pub mod types;
