use crate::ast::{BlockStatement, Statement};
use crate::lexer::TokenKind;
use crate::parser::expressions::{parse_expression, Precedence};
use crate::parser::{ParseError, Parser};

pub fn parse_statement(parser: &mut Parser) -> Result<crate::ast::Statement, ParseError> {
    match parser.current.kind {
        TokenKind::Let => Ok(Statement::Let(parse_let_statement(parser)?)),
        TokenKind::Return => Ok(Statement::Return(parse_return_statement(parser)?)),
        _ => Ok(Statement::Expression(parse_expression_statement(parser)?)),
    }
}

fn parse_let_statement(parser: &mut Parser) -> Result<crate::ast::LetStatement, ParseError> {
    parser.expect_peek(TokenKind::Ident)?;
    let identifier = parser.current_identifier()?;
    parser.expect_peek(TokenKind::Assign)?;
    parser.next_token();
    let value = parse_expression(parser, Precedence::Lowest)?;
    skip_semicolon(parser);

    Ok(crate::ast::LetStatement { identifier, value })
}

fn parse_return_statement(parser: &mut Parser) -> Result<crate::ast::ReturnStatement, ParseError> {
    parser.next_token();
    let value = parse_expression(parser, Precedence::Lowest)?;
    skip_semicolon(parser);

    Ok(crate::ast::ReturnStatement { value })
}

fn parse_expression_statement(parser: &mut Parser) -> Result<crate::ast::Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    skip_semicolon(parser);

    Ok(expression)
}

fn skip_semicolon(parser: &mut Parser) {
    if parser.peek_token_is(TokenKind::SemiColon) {
        parser.next_token();
    }
}

/// Parses `{ ... }` starting with `{` as the current token and leaves the
/// closing `}` as the current token. Failed statements inside the block are
/// recorded and skipped like at the top level.
pub fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let mut statements = Vec::new();
    parser.next_token();

    while !parser.current_token_is(TokenKind::RBrace) {
        if parser.current_token_is(TokenKind::Eof) {
            return Err(ParseError::unexpected_token(
                TokenKind::RBrace,
                &parser.current,
            ));
        }
        match parse_statement(parser) {
            Ok(statement) => statements.push(statement),
            Err(err) => parser.record(err),
        }
        parser.next_token();
    }

    Ok(BlockStatement { statements })
}
