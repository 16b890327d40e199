use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::statements::Stmt,
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
};

use super::{parser::Parser, stmt::*};

/// Precedence levels, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Equality,
    Comparison,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Primary,
}

impl BindingPower {
    /// The next tighter-binding level.
    pub fn next(self) -> BindingPower {
        match self {
            BindingPower::Default => BindingPower::Assignment,
            BindingPower::Assignment => BindingPower::LogicalOr,
            BindingPower::LogicalOr => BindingPower::LogicalAnd,
            BindingPower::LogicalAnd => BindingPower::Equality,
            BindingPower::Equality => BindingPower::Comparison,
            BindingPower::Comparison => BindingPower::Additive,
            BindingPower::Additive => BindingPower::Multiplicative,
            BindingPower::Multiplicative => BindingPower::Unary,
            BindingPower::Unary => BindingPower::Call,
            BindingPower::Call | BindingPower::Primary => BindingPower::Primary,
        }
    }
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;

pub const UNARY_OPERATORS: [&str; 3] = ["!", "-", "+"];

/// Operators that may follow a type keyword: pointer, reference, optional.
pub const TYPE_DECORATIONS: [&str; 3] = ["*", "&", "?"];

lazy_static! {
    pub static ref BINARY_OPERATORS: HashMap<&'static str, BindingPower> = {
        let mut map = HashMap::new();
        map.insert("||", BindingPower::LogicalOr);
        map.insert("&&", BindingPower::LogicalAnd);

        map.insert("==", BindingPower::Equality);
        map.insert("!=", BindingPower::Equality);

        map.insert("<", BindingPower::Comparison);
        map.insert("<=", BindingPower::Comparison);
        map.insert(">", BindingPower::Comparison);
        map.insert(">=", BindingPower::Comparison);

        map.insert("+", BindingPower::Additive);
        map.insert("-", BindingPower::Additive);
        map.insert("*", BindingPower::Multiplicative);
        map.insert("/", BindingPower::Multiplicative);
        map.insert("%", BindingPower::Multiplicative);
        map
    };

    /// Statements introduced by a fixed keyword or punctuator.
    pub static ref STMT_LOOKUP: HashMap<&'static str, StmtHandler> = {
        let mut map: HashMap<&'static str, StmtHandler> = HashMap::new();
        map.insert("{", parse_block_stmt);
        map.insert("if", parse_if_stmt);
        map.insert("while", parse_while_stmt);
        map.insert("for", parse_for_stmt);
        map.insert("return", parse_return_stmt);
        map.insert("let", parse_var_decl_stmt);
        map.insert("const", parse_var_decl_stmt);
        map.insert("final", parse_var_decl_stmt);
        map
    };
}

pub fn binary_binding_power(token: &Token) -> Option<BindingPower> {
    if token.kind == TokenKind::Operator {
        BINARY_OPERATORS.get(token.value.as_str()).copied()
    } else {
        None
    }
}

pub fn stmt_handler(token: &Token) -> Option<StmtHandler> {
    match token.kind {
        TokenKind::Keyword | TokenKind::Punctuator => STMT_LOOKUP.get(token.value.as_str()).copied(),
        _ => None,
    }
}

pub fn is_unary_operator(token: &Token) -> bool {
    token.kind == TokenKind::Operator && UNARY_OPERATORS.contains(&token.value.as_str())
}

pub fn is_type_decoration(token: &Token) -> bool {
    token.kind == TokenKind::Operator && TYPE_DECORATIONS.contains(&token.value.as_str())
}
