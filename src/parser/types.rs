//! Type annotations: a type keyword followed by any run of `*`, `&` and
//! `?` decorations. The parsed form is the decorated text, e.g. `int*?`.

use crate::errors::errors::{Error, ErrorImpl};

use super::{lookups::is_type_decoration, parser::Parser};

/// Parses a type keyword and its decorations.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser, positioned at the type keyword
///
/// # Returns
///
/// The decorated type name, or an error if the current token is not a type keyword.
pub fn parse_type(parser: &mut Parser) -> Result<String, Error> {
    if !parser.current_token().is_type_keyword() {
        let token = parser.current_token().value.clone();
        return Err(parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
            token,
            message: String::from("expected a type"),
        }));
    }

    let base = parser.advance().value;
    Ok(parse_type_decorations(parser, base))
}

/// Appends any decorations following an already-consumed base type name.
pub fn parse_type_decorations(parser: &mut Parser, base: String) -> String {
    let mut name = base;
    while is_type_decoration(parser.current_token()) {
        name.push_str(&parser.advance().value);
    }
    name
}
