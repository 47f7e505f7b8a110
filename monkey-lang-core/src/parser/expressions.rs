use super::error::ParseError;
use super::statements::parse_block_statement;
use crate::ast::{Expression, InfixOperationKind, PrefixOperationKind};
use crate::lexer::TokenKind;
use crate::parser::Parser;

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

pub fn precedence_of(token: TokenKind) -> Precedence {
    match token {
        TokenKind::Equal => Precedence::Equals,
        TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan => Precedence::LessGreater,
        TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

pub type PrefixParseFn = fn(&mut Parser) -> Result<Expression, ParseError>;
pub type InfixParseFn = fn(&mut Parser, Expression) -> Result<Expression, ParseError>;

/// Precedence climbing: the prefix handler of the current token produces the
/// left operand, then infix handlers keep extending it for as long as the
/// lookahead binds tighter than `precedence`.
pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<crate::ast::Expression, ParseError> {
    let Some(prefix_parse) = prefix_parse_function(parser.current.kind) else {
        return Err(ParseError::NoPrefixFunction(parser.current.clone()));
    };
    let mut left_expression = prefix_parse(parser)?;

    while !parser.peek_token_is(TokenKind::SemiColon) && precedence < precedence_of(parser.peek.kind)
    {
        let Some(infix_parse) = infix_parse_function(parser.peek.kind) else {
            break;
        };
        parser.next_token();
        left_expression = infix_parse(parser, left_expression)?;
    }

    Ok(left_expression)
}

fn parse_identifier(parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::Identifier(parser.current_identifier()?))
}

fn parse_integer_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser
        .current
        .literal
        .parse()
        .map(Expression::IntegerLiteral)
        .map_err(|_| ParseError::InvalidInteger(parser.current.clone()))
}

fn parse_boolean_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::BooleanLiteral(
        parser.current_token_is(TokenKind::True),
    ))
}

fn parse_prefix_operation(parser: &mut Parser) -> Result<Expression, ParseError> {
    let kind = match parser.current.kind {
        TokenKind::Bang => PrefixOperationKind::Bang,
        _ => PrefixOperationKind::Minus,
    };
    parser.next_token();

    Ok(Expression::PrefixOperation(
        kind,
        Box::new(parse_expression(parser, Precedence::Prefix)?),
    ))
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.next_token();
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_peek(TokenKind::RParen)?;

    Ok(expression)
}

/// Parses `a, b, c)` where the opening token is current. Leaves `terminator`
/// as the current token.
fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    if parser.peek_token_is(terminator) {
        parser.next_token();
        return Ok(elements);
    }

    parser.next_token();
    elements.push(parse_element(parser)?);

    while parser.peek_token_is(TokenKind::Comma) {
        parser.next_token();
        parser.next_token();
        elements.push(parse_element(parser)?);
    }
    parser.expect_peek(terminator)?;

    Ok(elements)
}

fn parse_if_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_peek(TokenKind::LParen)?;
    parser.next_token();
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);
    parser.expect_peek(TokenKind::RParen)?;

    parser.expect_peek(TokenKind::LBrace)?;
    let consequence = parse_block_statement(parser)?;

    let alternative = if parser.peek_token_is(TokenKind::Else) {
        parser.next_token();
        parser.expect_peek(TokenKind::LBrace)?;
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        condition,
        consequence,
        alternative,
    })
}

fn parse_function_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_peek(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.current_identifier(),
        TokenKind::RParen,
    )?;

    parser.expect_peek(TokenKind::LBrace)?;
    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral { parameters, body })
}

pub fn prefix_parse_function(token: TokenKind) -> Option<PrefixParseFn> {
    match token {
        TokenKind::Ident => Some(parse_identifier),
        TokenKind::Int => Some(parse_integer_literal),
        TokenKind::True | TokenKind::False => Some(parse_boolean_literal),
        TokenKind::Bang | TokenKind::Minus => Some(parse_prefix_operation),
        TokenKind::LParen => Some(parse_grouped_expression),
        TokenKind::If => Some(parse_if_expression),
        TokenKind::Function => Some(parse_function_literal),
        _ => None,
    }
}

fn infix_operation_kind(token: TokenKind) -> Option<InfixOperationKind> {
    use crate::ast::InfixOperationKind as InfixKind;

    match token {
        TokenKind::Plus => Some(InfixKind::Plus),
        TokenKind::Minus => Some(InfixKind::Minus),
        TokenKind::LessThan => Some(InfixKind::LessThan),
        TokenKind::GreaterThan => Some(InfixKind::GreaterThan),
        TokenKind::Equal => Some(InfixKind::Equal),
        TokenKind::NotEqual => Some(InfixKind::NotEqual),
        TokenKind::Asterisk => Some(InfixKind::Multiply),
        TokenKind::Slash => Some(InfixKind::Divide),
        _ => None,
    }
}

fn parse_infix_operation(parser: &mut Parser, left: Expression) -> Result<Expression, ParseError> {
    let operator = parser.current.kind;
    let Some(kind) = infix_operation_kind(operator) else {
        return Err(ParseError::NoPrefixFunction(parser.current.clone()));
    };
    parser.next_token();

    Ok(Expression::InfixOperation(
        kind,
        Box::new(left),
        Box::new(parse_expression(parser, precedence_of(operator))?),
    ))
}

fn parse_call_expression(parser: &mut Parser, left: Expression) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        function: Box::new(left),
        arguments,
    })
}

pub fn infix_parse_function(token: TokenKind) -> Option<InfixParseFn> {
    match token {
        TokenKind::LParen => Some(parse_call_expression),
        token if infix_operation_kind(token).is_some() => Some(parse_infix_operation),
        _ => None,
    }
}
