//! Code generation module for the compiler.
//!
//! This module lowers a checked tree into abstract instructions. It handles:
//!
//! - The instruction set and its textual form
//! - Lowering of statements and control flow to labels and jumps
//! - Lowering of expressions, array accesses and calls
//! - Frame layout of every subroutine, taken from the symbol table

pub mod compiler;
pub mod expr;
pub mod instructions;
pub mod stmt;

#[cfg(test)]
mod tests;
