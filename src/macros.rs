//! Utility macros for the compiler.
//!
//! This module defines helper macros used throughout the compiler:
//!
//! - `MK_SPAN!` - Creates a Span covering two byte offsets of one file
//! - `MK_INSTRUCTIONS!` - Builds an InstructionList from instructions
//!
//! These macros reduce boilerplate in the tree builder and the generator.

/// Creates a Span instance.
///
/// # Arguments
///
/// * `$start` - Byte offset where the node starts
/// * `$end` - Byte offset where the node ends
/// * `$file` - `Rc<String>` holding the file name
///
/// # Example
///
/// ```ignore
/// let span = MK_SPAN!(4, 9, file);
/// ```
#[macro_export]
macro_rules! MK_SPAN {
    ($start:expr, $end:expr, $file:expr) => {
        $crate::Span {
            start: $crate::Position($start, ::std::rc::Rc::clone(&$file)),
            end: $crate::Position($end, ::std::rc::Rc::clone(&$file)),
        }
    };
}

/// Builds an InstructionList from a comma separated list of instructions.
///
/// # Example
///
/// ```ignore
/// let code = MK_INSTRUCTIONS![Instruction::Label(top), Instruction::Jump(end)];
/// ```
#[macro_export]
macro_rules! MK_INSTRUCTIONS {
    ($($instruction:expr),* $(,)?) => {
        $crate::compiler::instructions::InstructionList::from(vec![$($instruction),*])
    };
}
