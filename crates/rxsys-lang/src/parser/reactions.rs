//! Parsing of the reaction input string.
//!
//! The input is a comma-separated sequence of bracket triples:
//! `([r1,r2],[i1],[p1,p2]), ([..],[..],[..])`. Conformance is validated
//! against this grammar before anything is extracted, so a malformed triple
//! is reported verbatim rather than producing a half-built system.

use logos::Logos;
use std::collections::BTreeSet;

use rxsys_core::{Entity, EntitySet, Reaction};

use crate::error::{ParseError, Result};
use crate::lexer::{tokenize, Token};

use super::stream::TokenStream;

/// Validate that every triple in the reaction string respects the form
/// `([a,b],[c,d],[e,f])`. Must run before [`extract_universe`] and
/// [`parse_reactions`].
pub fn check_reactions_conformity(reactions: &str) -> Result<()> {
    for triple in split_triples(reactions) {
        parse_triple(triple).map_err(|_| ParseError::MalformedReaction {
            triple: triple.to_string(),
        })?;
    }
    Ok(())
}

/// Infer the entity universe: every word token appearing anywhere in the
/// reaction string becomes a distinct entity.
pub fn extract_universe(reactions: &str) -> EntitySet {
    Token::lexer(reactions)
        .filter_map(|result| match result {
            Ok(Token::Ident(name)) => Some(Entity::new(&*name)),
            _ => None,
        })
        .collect()
}

/// Parse the reaction string into a reaction set.
///
/// Assumes conformity has been checked; failures are still reported as
/// [`ParseError::MalformedReaction`] rather than panicking.
pub fn parse_reactions(reactions: &str) -> Result<BTreeSet<Reaction>> {
    let mut out = BTreeSet::new();
    for triple in split_triples(reactions) {
        let (reactants, inhibitors, products) =
            parse_triple(triple).map_err(|_| ParseError::MalformedReaction {
                triple: triple.to_string(),
            })?;
        out.insert(Reaction::new(reactants, inhibitors, products)?);
    }
    Ok(out)
}

/// Split the raw string into triples on commas at parenthesis depth 0.
fn split_triples(reactions: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in reactions.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(reactions[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(reactions[start..].trim());
    pieces
}

/// Parse one `([..],[..],[..])` triple into its three entity sets.
fn parse_triple(triple: &str) -> Result<(EntitySet, EntitySet, EntitySet)> {
    let tokens = tokenize(triple)?;
    let mut stream = TokenStream::new(&tokens);

    stream.expect(Token::LParen)?;
    let reactants = parse_bracket_group(&mut stream)?;
    stream.expect(Token::Comma)?;
    let inhibitors = parse_bracket_group(&mut stream)?;
    stream.expect(Token::Comma)?;
    let products = parse_bracket_group(&mut stream)?;
    stream.expect(Token::RParen)?;
    stream.expect_end()?;

    Ok((reactants, inhibitors, products))
}

/// Parse a `[a,b,...]` group; the list may be empty.
fn parse_bracket_group(stream: &mut TokenStream) -> Result<EntitySet> {
    stream.expect(Token::LBracket)?;

    let mut entities = EntitySet::new();
    if !stream.check(&Token::RBracket) {
        entities.insert(Entity::new(&*stream.expect_ident()?));
        while stream.check(&Token::Comma) {
            stream.advance();
            entities.insert(Entity::new(&*stream.expect_ident()?));
        }
    }

    stream.expect(Token::RBracket)?;
    Ok(entities)
}
