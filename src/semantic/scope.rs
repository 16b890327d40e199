//! Lexical scopes.
//!
//! Scopes live in an arena and refer to each other by `ScopeId`: a child
//! stores its parent's index for upward lookup, and a parent lists its
//! children for inspection. Nothing holds a reference into the tree, so
//! there are no ownership cycles.

use std::{collections::HashMap, fmt::Display};

use crate::Span;

use super::types::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Unknown,
    Owned,
    Borrowed,
    Reference,
}

impl Ownership {
    /// Classifies a declared type name by the qualifier it contains.
    pub fn from_type_name(type_name: &str) -> Ownership {
        if type_name.contains("owned") {
            Ownership::Owned
        } else if type_name.contains("borrowed") {
            Ownership::Borrowed
        } else if type_name.contains("ref") {
            Ownership::Reference
        } else {
            Ownership::Unknown
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Declared type of a variable, or return type of a function.
    pub ty: TypeRef,
    pub ownership: Ownership,
    pub is_initialized: bool,
    pub has_moved: bool,
    pub is_constant: bool,
    /// Full function type, for functions.
    pub signature: Option<TypeRef>,
    pub span: Span,
}

impl Symbol {
    pub fn variable(name: impl Into<String>, ty: TypeRef, span: Span) -> Self {
        Symbol {
            name: name.into(),
            kind: SymbolKind::Variable,
            ty,
            ownership: Ownership::Unknown,
            is_initialized: false,
            has_moved: false,
            is_constant: false,
            signature: None,
            span,
        }
    }

    pub fn function(name: impl Into<String>, return_type: TypeRef, signature: TypeRef, span: Span) -> Self {
        Symbol {
            name: name.into(),
            kind: SymbolKind::Function,
            ty: return_type,
            ownership: Ownership::Unknown,
            is_initialized: true,
            has_moved: false,
            is_constant: true,
            signature: Some(signature),
            span,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
        };
        write!(f, "{}: {} ({})", self.name, self.ty.name(), kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function(String),
    Block,
    Loop,
}

impl Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeKind::Global => write!(f, "global"),
            ScopeKind::Function(name) => write!(f, "function {}", name),
            ScopeKind::Block => write!(f, "block"),
            ScopeKind::Loop => write!(f, "loop"),
        }
    }
}

#[derive(Debug)]
pub struct SymbolScope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    symbols: HashMap<String, Symbol>,
    /// Declaration order, for stable iteration.
    order: Vec<String>,
}

impl SymbolScope {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.order.iter().filter_map(|name| self.symbols.get(name))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<SymbolScope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// A tree holding only the global scope.
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![SymbolScope {
                id: ScopeId(0),
                kind: ScopeKind::Global,
                parent: None,
                children: vec![],
                symbols: HashMap::new(),
                order: vec![],
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &SymbolScope {
        &self.scopes[id.0]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn create_child(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(SymbolScope {
            id,
            kind,
            parent: Some(parent),
            children: vec![],
            symbols: HashMap::new(),
            order: vec![],
        });
        self.scopes[parent.0].children.push(id);
        id
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.0].parent
    }

    pub fn children(&self, id: ScopeId) -> &[ScopeId] {
        &self.scopes[id.0].children
    }

    /// Adds `symbol` to `scope`. Returns false, leaving the existing
    /// binding untouched, if the name is already declared in that scope.
    pub fn declare(&mut self, scope: ScopeId, symbol: Symbol) -> bool {
        let scope = &mut self.scopes[scope.0];
        if scope.symbols.contains_key(&symbol.name) {
            return false;
        }

        scope.order.push(symbol.name.clone());
        scope.symbols.insert(symbol.name.clone(), symbol);
        true
    }

    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes[scope.0].symbols.get(name)
    }

    /// Resolves `name` from `scope` outwards through its parents.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let id = self.resolve(scope, name)?;
        self.scopes[id.0].symbols.get(name)
    }

    pub fn lookup_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut Symbol> {
        let id = self.resolve(scope, name)?;
        self.scopes[id.0].symbols.get_mut(name)
    }

    /// The innermost scope, starting at `scope`, that declares `name`.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if scope.symbols.contains_key(name) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// Indented listing of every scope and its symbols.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        self.write_scope(&mut out, self.root(), 0);
        out
    }

    fn write_scope(&self, out: &mut String, id: ScopeId, indent: usize) {
        let scope = self.scope(id);
        out.push_str(&format!("{}scope {}\n", "  ".repeat(indent), scope.kind));

        for symbol in scope.symbols() {
            out.push_str(&format!("{}{}\n", "  ".repeat(indent + 1), symbol));
        }

        for child in scope.children() {
            self.write_scope(out, *child, indent + 1);
        }
    }
}
