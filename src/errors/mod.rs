//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Diagnostics with source position information, collected by the checker
//! - Specific diagnostic variants for every static error the language has
//! - Fatal errors that abort a compilation (internal defects, misuse of the generator)
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
