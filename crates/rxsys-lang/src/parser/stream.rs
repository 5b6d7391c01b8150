//! Token stream wrapper for the hand-written parsers.

use std::rc::Rc;

use crate::error::{ParseError, Result};
use crate::lexer::Token;

/// Token stream with lookahead and position tracking.
pub struct TokenStream<'src> {
    tokens: &'src [Token],
    pos: usize,
}

impl<'src> TokenStream<'src> {
    pub fn new(tokens: &'src [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Advance to the next token and return the current one.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token matches the expected token's variant.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Expect a specific token variant and advance past it.
    pub fn expect(&mut self, expected: Token) -> Result<()> {
        if self.check(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected `{}`", expected)))
        }
    }

    /// Expect an identifier and return its symbol.
    pub fn expect_ident(&mut self) -> Result<Rc<str>> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("expected an identifier")),
        }
    }

    /// Expect an integer literal and return its value.
    pub fn expect_integer(&mut self) -> Result<u32> {
        match self.peek() {
            Some(Token::Integer(n)) => {
                let n = *n;
                self.advance();
                Ok(n)
            }
            _ => Err(self.unexpected("expected an integer")),
        }
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Expect the end of the stream.
    pub fn expect_end(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("expected end of input"))
        }
    }

    fn unexpected(&self, context: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::syntax(format!("{}, found `{}`", context, token)),
            None => ParseError::syntax(format!("{}, found end of input", context)),
        }
    }
}
