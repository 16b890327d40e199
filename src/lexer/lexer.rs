use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    /// Tried in order; the first pattern matching at the cursor wins.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^///[^\n]*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DocComment) },
        RegexPattern { regex: Regex::new(r"^//[^\n]*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comment) },
        RegexPattern { regex: Regex::new(r"^/\*(?s:.*?)\*/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comment) },
        RegexPattern { regex: Regex::new(r"^[0-9]+\.[0-9]+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::FloatLiteral) },
        RegexPattern { regex: Regex::new(r"^[0-9]+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::IntegerLiteral) },
        RegexPattern { regex: Regex::new(r#"^"(?:[^"\\\n]|\\.)*""#).unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StringLiteral) },
        RegexPattern { regex: Regex::new(r"^'(?:[^'\\\n]|\\.)*'").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StringLiteral) },
        RegexPattern { regex: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^(?:==|!=|<=|>=|&&|\|\||[-+*/%=<>!&|?^~])").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Operator) },
        RegexPattern { regex: Regex::new(r"^[(){}\[\];,.:]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Punctuator) },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            tokens: vec![],
            source: source.to_string(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Moves the cursor over `text`, keeping line and column in step.
    pub fn advance_over(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }

    pub fn push_token(&mut self, kind: TokenKind, value: String) {
        let start = self.position();
        self.advance_over(&value);
        let span = Span::new(start, self.position());
        self.tokens.push(MK_TOKEN!(kind, value, span));
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    if let Some(matched) = regex.find(lexer.remainder()) {
        let skipped = matched.as_str().to_string();
        lexer.advance_over(&skipped);
    }
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let Some(matched) = regex.find(lexer.remainder()) else {
        return;
    };
    let value = matched.as_str().to_string();

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push_token(kind, value);
}

/// Splits `source` into tokens, ending with an `EndOfFile` token.
///
/// Lexing never fails: characters no pattern accepts become `Unknown`
/// tokens and are left for the parser to reject.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                let Some(ch) = lex.remainder().chars().next() else {
                    break;
                };
                trace!(character = %ch, line = lex.line, column = lex.column, "unrecognised character");
                lex.push_token(TokenKind::Unknown, ch.to_string());
            }
        }
    }

    let end = Span::at(lex.position());
    lex.tokens
        .push(MK_TOKEN!(TokenKind::EndOfFile, String::from("EOF"), end));
    lex.tokens
}
