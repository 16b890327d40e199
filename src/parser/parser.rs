//! Parser state, token cursor and error recovery.
//!
//! Statements and expressions are parsed by the free functions in `stmt`
//! and `expr`, which take the parser by `&mut` and propagate syntax errors
//! with `?`. The statement loops (program level and block level) catch
//! those errors, record them and call [`Parser::synchronize`] so a single
//! pass reports every independent problem.

use tracing::debug;

use crate::{
    ast::ast::{Item, Program},
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    Position, Span, MK_TOKEN,
};

use super::stmt::{looks_like_function, parse_function, parse_stmt};

pub struct Parser {
    /// Filtered tokens, always ending with a single `EndOfFile` sentinel
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Set once any syntax error has been recorded
    had_error: bool,
    /// Every recorded syntax error, in source order
    diagnostics: Diagnostics,
}

impl Parser {
    /// Creates a parser over `tokens`.
    ///
    /// Comment, doc-comment and end-of-file tokens are dropped; the parser
    /// appends its own end-of-file sentinel after the last real token.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Tokens as produced by the lexer, trivia included
    ///
    /// # Returns
    ///
    /// A new Parser positioned at the first significant token.
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .iter()
            .rev()
            .find(|token| token.kind == TokenKind::EndOfFile)
            .or_else(|| tokens.last())
            .map(|token| Span::at(token.span.end))
            .unwrap_or_else(|| Span::at(Position::new(1, 1)));

        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|token| !token.is_trivia() && token.kind != TokenKind::EndOfFile)
            .collect();
        tokens.push(MK_TOKEN!(TokenKind::EndOfFile, String::from("EOF"), end));

        Parser {
            tokens,
            pos: 0,
            had_error: false,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Looks `offset` tokens ahead, clamping to the end-of-file sentinel.
    pub fn peek(&self, offset: usize) -> &Token {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Consumes the current token and returns it. The cursor never moves
    /// past the end-of-file sentinel.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.has_tokens() {
            self.pos += 1;
        }
        token
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token().kind != TokenKind::EndOfFile
    }

    pub fn check_punctuator(&self, value: &str) -> bool {
        self.current_token().is_punctuator(value)
    }

    pub fn check_operator(&self, value: &str) -> bool {
        self.current_token().is_operator(value)
    }

    pub fn check_keyword(&self, value: &str) -> bool {
        self.current_token().is_keyword(value)
    }

    /// Consumes the current token if it is the punctuator `value`.
    pub fn match_punctuator(&mut self, value: &str) -> bool {
        if self.check_punctuator(value) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn match_operator(&mut self, value: &str) -> bool {
        if self.check_operator(value) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a token of the given kind and text.
    ///
    /// # Returns
    ///
    /// The consumed token, or an `ExpectedToken` error located at the
    /// current token, which is left in place.
    pub fn expect(&mut self, kind: TokenKind, value: &str) -> Result<Token, Error> {
        let token = self.current_token();
        if token.is(kind, value) {
            Ok(self.advance())
        } else {
            Err(Error::new(
                ErrorImpl::ExpectedToken {
                    expected: value.to_string(),
                    found: token.value.clone(),
                },
                token.span,
            ))
        }
    }

    /// Expects an identifier.
    ///
    /// # Arguments
    ///
    /// * `context` - Completes the message "expected identifier ...", e.g. "for function name"
    ///
    /// # Returns
    ///
    /// The identifier token, or an `UnexpectedTokenDetailed` error at the current token.
    pub fn expect_identifier(&mut self, context: &str) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind == TokenKind::Identifier {
            Ok(self.advance())
        } else {
            Err(self.error_here(ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: format!("expected identifier {}", context),
            }))
        }
    }

    /// Builds an error located at the current token.
    ///
    /// A generic `UnexpectedToken` is narrowed to `UnexpectedEndOfInput` at
    /// the sentinel and to `UnrecognisedToken` at an `Unknown` token.
    pub fn error_here(&self, error: ErrorImpl) -> Error {
        let token = self.current_token();
        let error = match (error, token.kind) {
            (ErrorImpl::UnexpectedToken { .. }, TokenKind::EndOfFile) => {
                ErrorImpl::UnexpectedEndOfInput
            }
            (ErrorImpl::UnexpectedToken { token }, TokenKind::Unknown) => {
                ErrorImpl::UnrecognisedToken { token }
            }
            (error, _) => error,
        };
        Error::new(error, token.span)
    }

    /// Records a syntax error and sets the error flag.
    pub fn report(&mut self, error: Error) {
        debug!(error = %error, "syntax error");
        self.had_error = true;
        self.diagnostics.push(error.into_diagnostic());
    }

    /// Discards tokens until a `;` or `}` has been consumed, or the input
    /// runs out.
    pub fn synchronize(&mut self) {
        let mut skipped = 0usize;
        while self.has_tokens() {
            let token = self.advance();
            skipped += 1;
            if token.is_punctuator(";") || token.is_punctuator("}") {
                break;
            }
        }
        debug!(skipped, "synchronized after syntax error");
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Parses functions and top-level statements until the input runs out.
    pub fn parse_program(&mut self) -> Program {
        let mut items = vec![];

        while self.has_tokens() {
            let item = if looks_like_function(self) {
                parse_function(self).map(Item::Function)
            } else {
                parse_stmt(self).map(Item::Statement)
            };

            match item {
                Ok(item) => items.push(item),
                Err(error) => {
                    self.report(error);
                    self.synchronize();
                }
            }
        }

        Program::new(items)
    }
}

/// Parses a stream of tokens into a Program.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser, whose `had_error()` and `diagnostics()` describe any
///   syntax errors that were recovered from
/// - The Program, possibly missing the constructs that failed to parse
pub fn parse(tokens: Vec<Token>) -> (Parser, Program) {
    let mut parser = Parser::new(tokens);
    debug!(tokens = parser.tokens.len(), "parsing");

    let program = parser.parse_program();
    debug!(
        items = program.items.len(),
        had_error = parser.had_error,
        "parsed program"
    );

    (parser, program)
}

/// Tokenizes `source` and parses it.
pub fn parse_source(source: &str) -> (Parser, Program) {
    parse(tokenize(source))
}
