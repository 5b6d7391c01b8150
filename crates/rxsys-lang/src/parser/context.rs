//! Parsing of context expressions.
//!
//! Grammar (informal):
//!
//! ```text
//! parallel := branch (',' branch)*      -- top level only; suppressed when the
//!                                          string contains nil, '+', '{' or '<'
//! branch   := alt ('+' alt)*
//! alt      := unit ('.' unit)*
//! unit     := 'nil' | '{' (word (',' word)*)? '}' | '<' int ',' word '>' | word
//! ```
//!
//! One layer of parentheses around a unit is stripped before classification;
//! the stripped sub-expression is re-parsed and spliced into the sequence.

use rxsys_core::Entity;

use crate::context::{Context, ContextComponent};
use crate::error::{ParseError, Result};
use crate::lexer::{tokenize, Token};

use super::stream::TokenStream;

/// Parse the top-level context input into one `Context` per parallel branch.
///
/// A string containing `nil`, `+`, `{` or `<` cannot be a parallel
/// composition of bare binding references, so it is parsed as a single
/// branch; otherwise it splits on top-level commas.
pub fn parse_parallel_contexts(input: &str) -> Result<Vec<Context>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::syntax("empty context"));
    }

    if trimmed.contains("nil")
        || trimmed.contains('+')
        || trimmed.contains('{')
        || trimmed.contains('<')
    {
        return Ok(vec![parse_context(trimmed)?]);
    }

    let tokens = tokenize(trimmed)?;
    let mut branches = Vec::new();
    for part in split_top_level(&tokens, &Token::Comma) {
        branches.push(parse_context_tokens(part)?);
    }
    Ok(branches)
}

/// Parse a single context expression.
pub fn parse_context(input: &str) -> Result<Context> {
    let tokens = tokenize(input.trim())?;
    parse_context_tokens(&tokens)
}

fn parse_context_tokens(tokens: &[Token]) -> Result<Context> {
    if tokens.is_empty() {
        return Err(ParseError::syntax("found empty string instead of a context"));
    }

    let alternatives = split_top_level(tokens, &Token::Plus);
    if alternatives.len() > 1 {
        let mut choices = Vec::with_capacity(alternatives.len());
        for alt in alternatives {
            choices.push(parse_sequence_tokens(alt)?);
        }
        return Ok(Context::new(vec![ContextComponent::Choice(choices)]));
    }

    parse_sequence_tokens(tokens)
}

fn parse_sequence_tokens(tokens: &[Token]) -> Result<Context> {
    let mut components = Vec::new();
    for unit in split_top_level(tokens, &Token::Dot) {
        for component in parse_unit_tokens(unit)? {
            let terminated = matches!(component, ContextComponent::Terminator);
            components.push(component);
            // Anything after nil in the same alternative is unreachable.
            if terminated {
                return Ok(Context::new(components));
            }
        }
    }
    Ok(Context::new(components))
}

fn parse_unit_tokens(tokens: &[Token]) -> Result<Vec<ContextComponent>> {
    match tokens {
        [] => Err(ParseError::syntax("empty context component")),
        [Token::Nil] => Ok(vec![ContextComponent::Terminator]),
        [Token::Ident(name)] => Ok(vec![ContextComponent::Reference(name.clone())]),
        [Token::LBrace, inner @ .., Token::RBrace] => {
            Ok(vec![ContextComponent::Entities(parse_entity_list(inner)?)])
        }
        [Token::Lt, inner @ .., Token::Gt] => Ok(vec![parse_repetition(inner)?]),
        [Token::LParen, inner @ .., Token::RParen] if parens_match(inner) => {
            // One wrapping layer stripped; the sub-expression's components
            // are spliced into the surrounding sequence.
            Ok(parse_context_tokens(inner)?.components().to_vec())
        }
        _ => Err(ParseError::syntax(format!(
            "unrecognized context component `{}`",
            render(tokens)
        ))),
    }
}

fn parse_entity_list(tokens: &[Token]) -> Result<Vec<Entity>> {
    let mut stream = TokenStream::new(tokens);
    let mut entities = Vec::new();
    if !stream.at_end() {
        entities.push(Entity::new(&*stream.expect_ident()?));
        while stream.check(&Token::Comma) {
            stream.advance();
            entities.push(Entity::new(&*stream.expect_ident()?));
        }
    }
    stream.expect_end()?;
    Ok(entities)
}

fn parse_repetition(tokens: &[Token]) -> Result<ContextComponent> {
    let mut stream = TokenStream::new(tokens);
    let count = stream.expect_integer()?;
    stream.expect(Token::Comma)?;
    let name = stream.expect_ident()?;
    stream.expect_end()?;

    if count == 0 {
        return Err(ParseError::syntax("repetition count must be at least 1"));
    }

    Ok(ContextComponent::Repetition(
        count,
        Box::new(ContextComponent::Reference(name)),
    ))
}

/// Split a token slice on a separator appearing at nesting depth 0.
fn split_top_level<'a>(tokens: &'a [Token], separator: &Token) -> Vec<&'a [Token]> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen | Token::LBrace | Token::LBracket | Token::Lt => depth += 1,
            Token::RParen | Token::RBrace | Token::RBracket | Token::Gt => {
                depth = depth.saturating_sub(1)
            }
            t if depth == 0 && t == separator => {
                pieces.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&tokens[start..]);
    pieces
}

/// Whether a stripped-parenthesis interior is balanced, i.e. the outer pair
/// actually wrapped the whole unit.
fn parens_match(inner: &[Token]) -> bool {
    let mut depth = 0isize;
    for token in inner {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("")
}
