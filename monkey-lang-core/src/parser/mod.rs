pub mod error;
pub mod expressions;
pub mod statements;

use tracing::debug;

use crate::ast::{Identifier, Program};
use crate::lexer::{Token, TokenKind, Tokenizer};
pub use error::ParseError;
use statements::parse_statement;

/// Pratt parser over a two-token window (`current` + `peek`).
///
/// Parsing never aborts: a statement that fails to parse is dropped, its
/// error is recorded, and parsing resumes on the following token.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    pub current: Token,
    pub peek: Token,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokenizer: Tokenizer<'a>) -> Self {
        let current = tokenizer.next_token();
        let peek = tokenizer.next_token();
        Self {
            tokenizer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub(crate) fn next_token(&mut self) {
        let next = self.tokenizer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    pub(crate) fn current_token_is(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    pub(crate) fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    /// Advances if the lookahead is `kind`, otherwise fails without moving.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.peek_token_is(kind) {
            self.next_token();
            Ok(())
        } else {
            Err(ParseError::unexpected_token(kind, &self.peek))
        }
    }

    pub(crate) fn current_identifier(&self) -> Result<Identifier, ParseError> {
        if self.current_token_is(TokenKind::Ident) {
            Ok(Identifier {
                name: self.current.literal.clone(),
            })
        } else {
            Err(ParseError::unexpected_token(TokenKind::Ident, &self.current))
        }
    }

    pub(crate) fn record(&mut self, error: ParseError) {
        debug!(%error, start = error.token().start, "parse error");
        self.errors.push(error);
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_token_is(TokenKind::Eof) {
            match parse_statement(self) {
                Ok(statement) => statements.push(statement),
                Err(err) => self.record(err),
            }
            self.next_token();
        }

        Program { statements }
    }
}

/// Parses `input`, returning every recorded error if there was at least one.
pub fn parse(input: &str) -> Result<Program, Vec<ParseError>> {
    let mut parser = Parser::new(Tokenizer::new(input));
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}
