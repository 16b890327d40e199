use lazy_static::lazy_static;
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        for keyword in ["if", "else", "while", "for", "return", "let", "const", "final"] {
            map.insert(keyword, TokenKind::Keyword);
        }
        for keyword in TYPE_KEYWORDS.iter() {
            map.insert(*keyword, TokenKind::Keyword);
        }
        map.insert("true", TokenKind::BooleanLiteral);
        map.insert("false", TokenKind::BooleanLiteral);
        map.insert("null", TokenKind::NullLiteral);
        map
    };

    /// Keywords that may start a declaration, a parameter or a function.
    pub static ref TYPE_KEYWORDS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        for keyword in [
            "int", "float", "double", "char", "bool", "void", "long", "short", "auto",
            "string", "byte", "bytes", "number", "list", "dict", "any", "Result",
            "owned", "borrowed", "ref",
        ] {
            set.insert(keyword);
        }
        set
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    Operator,
    Punctuator,
    Comment,
    DocComment,
    EndOfFile,
    Unknown,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token. String literals keep their quotes.
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}) at {}", self.kind, self.value, self.span)
    }
}

impl Token {
    pub fn is(&self, kind: TokenKind, value: &str) -> bool {
        self.kind == kind && self.value == value
    }

    pub fn is_keyword(&self, value: &str) -> bool {
        self.is(TokenKind::Keyword, value)
    }

    pub fn is_punctuator(&self, value: &str) -> bool {
        self.is(TokenKind::Punctuator, value)
    }

    pub fn is_operator(&self, value: &str) -> bool {
        self.is(TokenKind::Operator, value)
    }

    pub fn is_type_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(self.value.as_str())
    }

    /// Comments never reach the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Comment | TokenKind::DocComment)
    }
}
