use crate::Span;

use super::statements::Stmt;

/// Root of a parsed source text.
///
/// Functions and top-level statements are kept in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new(items: Vec<Item>) -> Self {
        Program { items }
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(function) => Some(function),
            Item::Statement(_) => None,
        })
    }

    pub fn statements(&self) -> impl Iterator<Item = &Stmt> {
        self.items.iter().filter_map(|item| match item {
            Item::Statement(stmt) => Some(stmt),
            Item::Function(_) => None,
        })
    }

    pub fn find_function(&self, name: &str) -> Option<&Function> {
        self.functions().find(|function| function.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(Function),
    Statement(Stmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    /// A Block, or a single statement.
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
    pub span: Span,
}
