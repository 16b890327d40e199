use crate::{
    ast::{
        ast::{Function, Parameter},
        expressions::AssignmentExpr,
        statements::{
            Binding, BlockStmt, ExpressionStmt, ForStmt, IfStmt, ReturnStmt, Stmt, VarDeclStmt,
            WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::parse_expr,
    lookups::{is_type_decoration, stmt_handler},
    parser::Parser,
    types::{parse_type, parse_type_decorations},
};

/// Parses a single statement.
///
/// Keyword-led statements and blocks dispatch through the statement lookup.
/// Anything else is tried as a typed declaration, then `name = value;`,
/// then an expression statement.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser, positioned at the first token
///
/// # Returns
///
/// The parsed statement, or the first syntax error met inside it.
pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = stmt_handler(parser.current_token()) {
        return handler(parser);
    }

    if starts_typed_declaration(parser) {
        return parse_typed_decl_stmt(parser);
    }

    if parser.current_token().kind == TokenKind::Identifier && parser.peek(1).is_operator("=") {
        return parse_assignment_stmt(parser);
    }

    parse_expression_stmt(parser)
}

/// A type keyword, optionally decorated, followed by a name and `(`.
pub fn looks_like_function(parser: &Parser) -> bool {
    if !parser.current_token().is_type_keyword() {
        return false;
    }

    let mut offset = 1;
    while is_type_decoration(parser.peek(offset)) {
        offset += 1;
    }

    parser.peek(offset).kind == TokenKind::Identifier && parser.peek(offset + 1).is_punctuator("(")
}

fn starts_typed_declaration(parser: &Parser) -> bool {
    let next = parser.peek(1);
    parser.current_token().is_type_keyword()
        && (next.kind == TokenKind::Identifier || is_type_decoration(next))
}

fn starts_inferred_declaration(parser: &Parser) -> bool {
    let token = parser.current_token();
    token.is_keyword("let") || token.is_keyword("const") || token.is_keyword("final")
}

/// Parses `type name(type a, type b) body`.
///
/// The body is usually a block but any statement is accepted.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser, positioned at the return type
///
/// # Returns
///
/// The Function, or an error if the header is malformed or the body fails to parse.
pub fn parse_function(parser: &mut Parser) -> Result<Function, Error> {
    let start = parser.current_token().span;
    let return_type = parse_type(parser)?;
    let name = parser.expect_identifier("for function name")?;

    parser.expect(TokenKind::Punctuator, "(")?;
    let mut parameters = vec![];

    if !parser.check_punctuator(")") {
        loop {
            let parameter_start = parser.current_token().span;
            let type_name = parse_type(parser)?;
            let parameter_name = parser.expect_identifier("for parameter name")?;

            parameters.push(Parameter {
                type_name,
                name: parameter_name.value,
                span: parameter_start.to(&parameter_name.span),
            });

            if !parser.match_punctuator(",") {
                break;
            }
        }
    }

    parser.expect(TokenKind::Punctuator, ")")?;

    let body = parse_stmt(parser)?;
    let span = start.to(body.span());

    Ok(Function {
        name: name.value,
        return_type,
        parameters,
        body: Box::new(body),
        span,
    })
}

/// Parses `{ ... }`, recovering from errors in individual statements.
///
/// # Returns
///
/// The block, or an error only when the closing `}` is missing.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let open = parser.expect(TokenKind::Punctuator, "{")?;
    let mut body = vec![];

    while parser.has_tokens() && !parser.check_punctuator("}") {
        match parse_stmt(parser) {
            Ok(stmt) => body.push(stmt),
            Err(error) => {
                parser.report(error);
                // Leave a `}` that closes this block for the loop below.
                if !parser.check_punctuator("}") {
                    parser.synchronize();
                }
            }
        }
    }

    let close = parser.expect(TokenKind::Punctuator, "}")?;

    Ok(Stmt::Block(BlockStmt {
        body,
        span: open.span.to(&close.span),
    }))
}

/// `if (condition) stmt [else stmt]`
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    parser.expect(TokenKind::Punctuator, "(")?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::Punctuator, ")")?;

    let then_branch = parse_stmt(parser)?;
    let else_branch = if parser.check_keyword("else") {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    let end = else_branch
        .as_ref()
        .map(|stmt| *stmt.span())
        .unwrap_or(*then_branch.span());

    Ok(Stmt::If(IfStmt {
        condition,
        then_branch: Box::new(then_branch),
        else_branch,
        span: start.to(&end),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    parser.expect(TokenKind::Punctuator, "(")?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::Punctuator, ")")?;

    let body = parse_stmt(parser)?;
    let span = start.to(body.span());

    Ok(Stmt::While(WhileStmt {
        condition,
        body: Box::new(body),
        span,
    }))
}

/// Parses `for (init; condition; increment) body`. Each clause may be empty.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser, positioned at `for`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;
    parser.expect(TokenKind::Punctuator, "(")?;

    let init = if parser.match_punctuator(";") {
        None
    } else if starts_inferred_declaration(parser) {
        Some(Box::new(parse_var_decl_stmt(parser)?))
    } else if starts_typed_declaration(parser) {
        Some(Box::new(parse_typed_decl_stmt(parser)?))
    } else {
        Some(Box::new(parse_expression_stmt(parser)?))
    };

    let condition = if parser.check_punctuator(";") {
        None
    } else {
        Some(parse_expr(parser)?)
    };
    parser.expect(TokenKind::Punctuator, ";")?;

    let increment = if parser.check_punctuator(")") {
        None
    } else {
        Some(parse_expr(parser)?)
    };
    parser.expect(TokenKind::Punctuator, ")")?;

    let body = parse_stmt(parser)?;
    let span = start.to(body.span());

    Ok(Stmt::For(ForStmt {
        init,
        condition,
        increment,
        body: Box::new(body),
        span,
    }))
}

/// `return;` or `return value;`
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    let value = if parser.check_punctuator(";") {
        None
    } else {
        Some(parse_expr(parser)?)
    };

    let semicolon = parser.expect(TokenKind::Punctuator, ";")?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: start.to(&semicolon.span),
    }))
}

/// `let`/`const`/`final` declarations.
///
/// The token after the keyword is taken as the name unless it is followed
/// by something other than `=` or `;`, in which case it was the type and
/// the name comes next: `let x = 1;` versus `let int x = 1;`.
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance();
    let binding = match start_token.value.as_str() {
        "const" => Binding::Const,
        "final" => Binding::Final,
        _ => Binding::Let,
    };

    let first = parser.current_token().clone();
    if first.kind != TokenKind::Identifier && !first.is_type_keyword() {
        return Err(parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
            token: first.value,
            message: String::from("expected identifier during variable declaration"),
        }));
    }
    parser.advance();

    let (declared_type, name) = if parser.check_operator("=") || parser.check_punctuator(";") {
        if first.kind != TokenKind::Identifier {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: first.value,
                    message: String::from("a type keyword cannot be used as a variable name"),
                },
                first.span,
            ));
        }
        (None, first.value)
    } else {
        let declared_type = parse_type_decorations(parser, first.value);
        let name = parser.expect_identifier("during variable declaration")?;
        (Some(declared_type), name.value)
    };

    finish_declaration(parser, binding, declared_type, name, start_token.span)
}

/// Declarations introduced by a type keyword, e.g. `int x = 5;`.
pub fn parse_typed_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span;
    let declared_type = parse_type(parser)?;
    let name = parser.expect_identifier("during variable declaration")?;

    finish_declaration(parser, Binding::Typed, Some(declared_type), name.value, start)
}

fn finish_declaration(
    parser: &mut Parser,
    binding: Binding,
    declared_type: Option<String>,
    name: String,
    start: Span,
) -> Result<Stmt, Error> {
    let initializer = if parser.match_operator("=") {
        Some(parse_expr(parser)?)
    } else {
        None
    };

    let semicolon = parser.expect(TokenKind::Punctuator, ";")?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        binding,
        declared_type,
        name,
        initializer,
        span: start.to(&semicolon.span),
    }))
}

/// `name = value;` at statement level.
pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let target = parser.expect_identifier("as assignment target")?;
    parser.expect(TokenKind::Operator, "=")?;

    let value = parse_expr(parser)?;
    let semicolon = parser.expect(TokenKind::Punctuator, ";")?;

    Ok(Stmt::Assignment(AssignmentExpr {
        target: target.value,
        target_span: target.span,
        value: Box::new(value),
        span: target.span.to(&semicolon.span),
    }))
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expression = parse_expr(parser)?;
    let semicolon = parser.expect(TokenKind::Punctuator, ";")?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.span().to(&semicolon.span),
        expression,
    }))
}
