//! Lexical analysis.
//!
//! Converts source text into a lossless stream of tokens: keywords,
//! identifiers, literals, operators, punctuators and comments, each with
//! a 1-based line/column span. The parser filters out comments itself.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
