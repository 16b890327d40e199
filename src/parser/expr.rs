use crate::{
    ast::expressions::{
        AssignmentExpr, BinaryExpr, CallExpr, Expr, IdentifierExpr, LiteralExpr, LiteralKind,
        UnaryExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    lookups::{binary_binding_power, is_unary_operator, BindingPower},
    parser::Parser,
};

/// Parses a full expression, starting at the assignment level.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser
///
/// # Returns
///
/// The expression tree, or an error at the first token that cannot continue it.
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parse_assignment_expr(parser)
}

/// Right-associative; the target must be a bare identifier.
pub fn parse_assignment_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let left = parse_binary_expr(parser, BindingPower::LogicalOr)?;

    if !parser.check_operator("=") {
        return Ok(left);
    }

    match left {
        Expr::Identifier(identifier) => {
            parser.advance();
            let value = parse_assignment_expr(parser)?;
            let span = identifier.span.to(value.span());

            Ok(Expr::Assignment(AssignmentExpr {
                target: identifier.name,
                target_span: identifier.span,
                value: Box::new(value),
                span,
            }))
        }
        other => {
            let equals = parser.current_token().span;
            Err(Error::new(
                ErrorImpl::InvalidAssignmentTarget,
                other.span().to(&equals),
            ))
        }
    }
}

/// Parses one binary precedence level: an operand from the next tighter
/// level, then a loop folding `op operand` pairs into the left side.
pub fn parse_binary_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    let mut left = parse_operand(parser, bp.next())?;

    while binary_binding_power(parser.current_token()) == Some(bp) {
        let operator = parser.advance();
        let right = parse_operand(parser, bp.next())?;
        let span = left.span().to(right.span());

        left = Expr::Binary(BinaryExpr {
            operator: operator.value,
            left: Box::new(left),
            right: Box::new(right),
            span,
        });
    }

    Ok(left)
}

fn parse_operand(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    if bp >= BindingPower::Unary {
        parse_unary_expr(parser)
    } else {
        parse_binary_expr(parser, bp)
    }
}

/// Prefix operators, applied right to left: `!-x` is `!(-x)`.
pub fn parse_unary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if !is_unary_operator(parser.current_token()) {
        return parse_call_expr(parser);
    }

    let operator = parser.advance();
    let operand = parse_unary_expr(parser)?;
    let span = operator.span.to(operand.span());

    Ok(Expr::Unary(UnaryExpr {
        operator: operator.value,
        operand: Box::new(operand),
        span,
    }))
}

/// A primary expression followed by any number of `(args)` suffixes.
pub fn parse_call_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut expr = parse_primary_expr(parser)?;

    while parser.check_punctuator("(") {
        parser.advance();
        let mut arguments = vec![];

        if !parser.check_punctuator(")") {
            loop {
                arguments.push(parse_expr(parser)?);
                if !parser.match_punctuator(",") {
                    break;
                }
            }
        }

        let close = parser.expect(TokenKind::Punctuator, ")")?;
        let span = expr.span().to(&close.span);

        expr = Expr::Call(CallExpr {
            callee: Box::new(expr),
            arguments,
            span,
        });
    }

    Ok(expr)
}

/// Parses a literal, an identifier or a parenthesized expression.
///
/// # Returns
///
/// The primary expression. An unknown character yields `UnrecognisedToken`
/// and end of input yields `UnexpectedEndOfInput`.
pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let literal_kind = match token.kind {
        TokenKind::IntegerLiteral => Some(LiteralKind::Integer),
        TokenKind::FloatLiteral => Some(LiteralKind::Float),
        TokenKind::StringLiteral => Some(LiteralKind::String),
        TokenKind::BooleanLiteral => Some(LiteralKind::Boolean),
        TokenKind::NullLiteral => Some(LiteralKind::Null),
        _ => None,
    };

    if let Some(kind) = literal_kind {
        parser.advance();
        return Ok(Expr::Literal(LiteralExpr {
            kind,
            value: token.value,
            span: token.span,
        }));
    }

    match token.kind {
        TokenKind::Identifier => {
            parser.advance();
            Ok(Expr::Identifier(IdentifierExpr {
                name: token.value,
                span: token.span,
            }))
        }
        TokenKind::Punctuator if token.value == "(" => {
            parser.advance();
            let inner = parse_expr(parser)?;
            parser.expect(TokenKind::Punctuator, ")")?;
            Ok(inner)
        }
        _ => Err(parser.error_here(ErrorImpl::UnexpectedToken { token: token.value })),
    }
}
