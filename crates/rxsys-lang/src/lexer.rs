//! Lexical analysis for the input grammar.
//!
//! One token set covers all three input strings: the reaction triples
//! (`([a,b],[c],[d])`), the environment assignments (`x = {a}.x`) and the
//! context expressions (`{a,b}.nil + <3,x>`).

use logos::Logos;
use std::fmt;
use std::rc::Rc;

/// Input token.
///
/// Identifier payloads use `Rc<str>` for cheap cloning throughout the
/// parser pipeline.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// Keyword `nil` (process terminator)
    #[token("nil")]
    Nil,

    /// Operator `+` (nondeterministic choice)
    #[token("+")]
    Plus,
    /// Operator `.` (sequencing)
    #[token(".")]
    Dot,
    /// Operator `,`
    #[token(",")]
    Comma,
    /// Operator `=` (environment assignment)
    #[token("=")]
    Eq,

    /// Delimiter `{`
    #[token("{")]
    LBrace,
    /// Delimiter `}`
    #[token("}")]
    RBrace,
    /// Delimiter `<` (repetition opener)
    #[token("<")]
    Lt,
    /// Delimiter `>` (repetition closer)
    #[token(">")]
    Gt,
    /// Delimiter `(`
    #[token("(")]
    LParen,
    /// Delimiter `)`
    #[token(")")]
    RParen,
    /// Delimiter `[`
    #[token("[")]
    LBracket,
    /// Delimiter `]`
    #[token("]")]
    RBracket,

    /// Repetition count (e.g. the 3 in `<3,x>`)
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Integer(u32),

    /// Entity symbol or binding name
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Nil => write!(f, "nil"),
            Token::Plus => write!(f, "+"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
            Token::Eq => write!(f, "="),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Integer(n) => write!(f, "{}", n),
            Token::Ident(id) => write!(f, "{}", id),
        }
    }
}

/// Tokenize a whole input, failing on the first unrecognizable character.
pub fn tokenize(source: &str) -> Result<Vec<Token>, crate::ParseError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(crate::ParseError::syntax(format!(
                    "unexpected character `{}`",
                    &source[span]
                )))
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: lex source, panicking on lex errors.
    fn lex(source: &str) -> Vec<Token> {
        tokenize(source).unwrap()
    }

    /// Test helper: create an identifier token.
    fn ident(s: &str) -> Token {
        Token::Ident(Rc::from(s))
    }

    #[test]
    fn test_context_expression() {
        let tokens = lex("{a,b}.{c}.nil");
        assert_eq!(
            tokens,
            vec![
                Token::LBrace,
                ident("a"),
                Token::Comma,
                ident("b"),
                Token::RBrace,
                Token::Dot,
                Token::LBrace,
                ident("c"),
                Token::RBrace,
                Token::Dot,
                Token::Nil,
            ]
        );
    }

    #[test]
    fn test_repetition() {
        let tokens = lex("<3,x>");
        assert_eq!(
            tokens,
            vec![
                Token::Lt,
                Token::Integer(3),
                Token::Comma,
                ident("x"),
                Token::Gt,
            ]
        );
    }

    #[test]
    fn test_reaction_triple() {
        let tokens = lex("([a],[b],[c])");
        assert_eq!(
            tokens,
            vec![
                Token::LParen,
                Token::LBracket,
                ident("a"),
                Token::RBracket,
                Token::Comma,
                Token::LBracket,
                ident("b"),
                Token::RBracket,
                Token::Comma,
                Token::LBracket,
                ident("c"),
                Token::RBracket,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_nil_is_a_keyword_not_an_ident() {
        assert_eq!(lex("nil"), vec![Token::Nil]);
        assert_eq!(lex("nils"), vec![ident("nils")]);
    }

    #[test]
    fn test_assignment() {
        let tokens = lex("x = y");
        assert_eq!(tokens, vec![ident("x"), Token::Eq, ident("y")]);
    }

    #[test]
    fn test_whitespace_handling() {
        assert_eq!(lex("  {\ta\n}  "), vec![Token::LBrace, ident("a"), Token::RBrace]);
    }

    #[test]
    fn test_invalid_character() {
        assert!(tokenize("{a}@{b}").is_err());
    }
}
