//! Facts the checker attaches to tree nodes.
//!
//! The syntax tree is never modified. Instead every fact the generator
//! needs (types, l-value flags, scopes) is stored here, keyed by
//! [`NodeId`]. A tree together with its decorations is the decorated tree.

use std::collections::HashMap;

use crate::{ast::ast::NodeId, errors::errors::Diagnostic};

use super::{symbol_table::{ScopeId, SymbolTable}, types::Type};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decorations {
    types: HashMap<NodeId, Type>,
    lvalues: HashMap<NodeId, bool>,
    scopes: HashMap<NodeId, ScopeId>,
}

impl Decorations {
    pub fn new() -> Self {
        Decorations::default()
    }

    pub fn set_type(&mut self, id: NodeId, node_type: Type) {
        self.types.insert(id, node_type);
    }

    pub fn get_type(&self, id: NodeId) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn set_lvalue(&mut self, id: NodeId, is_lvalue: bool) {
        self.lvalues.insert(id, is_lvalue);
    }

    /// Whether the node denotes something that can be stored into.
    /// Undecorated nodes are not.
    pub fn is_lvalue(&self, id: NodeId) -> bool {
        self.lvalues.get(&id).copied().unwrap_or(false)
    }

    pub fn set_scope(&mut self, id: NodeId, scope: ScopeId) {
        self.scopes.insert(id, scope);
    }

    pub fn get_scope(&self, id: NodeId) -> Option<ScopeId> {
        self.scopes.get(&id).copied()
    }

    /// Number of nodes with a recorded type.
    pub fn typed_nodes(&self) -> usize {
        self.types.len()
    }
}

/// Everything the checker learned about one program.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedProgram {
    pub decorations: Decorations,
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckedProgram {
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.is_error())
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| !diagnostic.is_error())
    }

    pub fn type_of(&self, id: NodeId) -> Option<&Type> {
        self.decorations.get_type(id)
    }
}
