//! Lexically scoped symbol table.
//!
//! Scopes are stored in an arena and never freed during a compilation.
//! Closing a scope only removes it from the active path, so later lookups
//! no longer see its symbols, while the generator can re-activate the same
//! scope with [`SymbolTable::push_this_scope`] to read frame offsets.

use std::collections::HashMap;

use thiserror::Error;

use super::types::{Type, MAX_FRAME_SIZE, REFERENCE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Parameter,
    Variable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub symbol_type: Type,
    pub kind: SymbolKind,
    /// Nesting depth of the declaring scope, the global scope being 0.
    pub depth: usize,
    /// Byte offset in the frame of the declaring function, for parameters
    /// and variables.
    pub offset: Option<u32>,
}

impl Symbol {
    fn new(name: &str, symbol_type: Type, kind: SymbolKind) -> Self {
        Symbol {
            name: String::from(name),
            symbol_type,
            kind,
            depth: 0,
            offset: None,
        }
    }

    pub fn function(name: &str, symbol_type: Type) -> Self {
        Symbol::new(name, symbol_type, SymbolKind::Function)
    }

    pub fn parameter(name: &str, symbol_type: Type) -> Self {
        Symbol::new(name, symbol_type, SymbolKind::Parameter)
    }

    pub fn variable(name: &str, symbol_type: Type) -> Self {
        Symbol::new(name, symbol_type, SymbolKind::Variable)
    }

    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }

    pub fn is_parameter(&self) -> bool {
        self.kind == SymbolKind::Parameter
    }

    /// Arrays are passed by reference, so an array parameter holds the
    /// address of the caller's array rather than its elements.
    pub fn is_array_reference(&self) -> bool {
        self.is_parameter() && self.symbol_type.is_array()
    }

    /// Bytes this symbol occupies in its frame.
    pub fn storage_size(&self) -> u32 {
        match self.kind {
            SymbolKind::Function => 0,
            _ if self.is_array_reference() => REFERENCE_SIZE,
            _ => self.symbol_type.size(),
        }
    }

    fn storage_align(&self) -> u32 {
        if self.is_array_reference() {
            REFERENCE_SIZE
        } else {
            self.symbol_type.align().max(1)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    #[error("{name:?} already declared in this scope")]
    DuplicateDeclaration { name: String },
    #[error("{name:?} not declared")]
    UndeclaredIdentifier { name: String },
    #[error("no scope is open")]
    NoOpenScope,
    #[error("{name:?} does not fit in the frame")]
    FrameTooLarge { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub id: ScopeId,
    symbols: Vec<Symbol>,
    lookup: HashMap<String, usize>,
    next_offset: u32,
}

impl Scope {
    fn new(id: ScopeId) -> Self {
        Scope {
            id,
            symbols: vec![],
            lookup: HashMap::new(),
            next_offset: 0,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.lookup.get(name).map(|index| &self.symbols[*index])
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|symbol| symbol.kind == SymbolKind::Parameter)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|symbol| symbol.kind == SymbolKind::Variable)
    }

    /// Bytes needed for every parameter and variable of this scope,
    /// rounded up to a whole word.
    pub fn frame_size(&self) -> u32 {
        align_up(self.next_offset, 4)
    }

    /// Fails when the symbol would end past [`MAX_FRAME_SIZE`].
    fn insert(&mut self, mut symbol: Symbol, depth: usize) -> Result<&Symbol, ScopeError> {
        symbol.depth = depth;
        if symbol.kind != SymbolKind::Function {
            let offset = align_up(self.next_offset, symbol.storage_align());
            self.next_offset = offset
                .checked_add(symbol.storage_size())
                .filter(|end| *end <= MAX_FRAME_SIZE)
                .ok_or_else(|| ScopeError::FrameTooLarge {
                    name: symbol.name.clone(),
                })?;
            symbol.offset = Some(offset);
        }

        let index = self.symbols.len();
        self.lookup.insert(symbol.name.clone(), index);
        self.symbols.push(symbol);
        Ok(&self.symbols[index])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    scope_path: Vec<ScopeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Pushes a new, empty scope and returns its id.
    pub fn open_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(id));
        self.scope_path.push(id);
        id
    }

    /// Pops the innermost scope. Its symbols stay in the arena but are no
    /// longer visible to lookups.
    pub fn close_scope(&mut self) -> Option<ScopeId> {
        self.scope_path.pop()
    }

    /// Makes a scope recorded by an earlier pass the innermost one again.
    pub fn push_this_scope(&mut self, id: ScopeId) {
        self.scope_path.push(id);
    }

    pub fn current_scope(&self) -> Option<ScopeId> {
        self.scope_path.last().copied()
    }

    /// Number of active scopes.
    pub fn depth(&self) -> usize {
        self.scope_path.len()
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    /// Declares `name` in the innermost scope.
    ///
    /// Fails when the innermost scope already declares the name, or when
    /// the frame has no room left for it. Names of outer scopes may be
    /// shadowed.
    pub fn declare(&mut self, name: &str, symbol: Symbol) -> Result<&Symbol, ScopeError> {
        let depth = self.scope_path.len().saturating_sub(1);
        let id = self.current_scope().ok_or(ScopeError::NoOpenScope)?;
        let scope = &mut self.scopes[id.0];

        if scope.get(name).is_some() {
            return Err(ScopeError::DuplicateDeclaration {
                name: String::from(name),
            });
        }

        let symbol = Symbol {
            name: String::from(name),
            ..symbol
        };
        scope.insert(symbol, depth)
    }

    /// Finds the innermost visible declaration of `name`.
    pub fn lookup(&self, name: &str) -> Result<&Symbol, ScopeError> {
        self.scope_path
            .iter()
            .rev()
            .find_map(|id| self.scopes[id.0].get(name))
            .ok_or_else(|| ScopeError::UndeclaredIdentifier {
                name: String::from(name),
            })
    }

    /// Finds `name` in the innermost scope only.
    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        self.current_scope()
            .and_then(|id| self.scopes[id.0].get(name))
    }
}

/// Offsets never exceed `MAX_FRAME_SIZE`, so rounding up to a basic type's
/// size stays within `u32`.
fn align_up(offset: u32, align: u32) -> u32 {
    if align <= 1 {
        offset
    } else {
        offset.div_ceil(align).saturating_mul(align)
    }
}
