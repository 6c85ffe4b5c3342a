/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the syntax tree handed over by the parser
///
/// Submodules:
/// - ast: Node ids, the program root, functions and declarations
/// - expressions: Definitions for the expression forms and operators
/// - statements: Definitions for the statement forms
/// - types: Type annotations as written in source
/// - lookups: Tables from written operator and type names to their variants
/// - builder: Allocates node ids and positions while building a tree
pub mod ast;
pub mod builder;
pub mod expressions;
pub mod lookups;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
