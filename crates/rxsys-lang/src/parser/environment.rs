//! Parsing of the environment input string.
//!
//! The input is a comma-separated sequence of `name = expr` assignments.
//! Commas also occur inside entity literals, so assignments are split only
//! on commas that precede a new `name =` pattern.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::warn;

use crate::context::Context;
use crate::environment::Environment;
use crate::error::{ParseError, Result};

use super::context::parse_context;

/// Parse the environment string into a binding table.
///
/// An empty (or blank) input denotes the empty environment. A right-hand
/// side that textually contains its own name is recorded as recursive and
/// reported with a warning; recursion is legal and is cut off at run time by
/// the visited-state cache.
pub fn parse_environment(input: &str) -> Result<Environment> {
    let mut bindings: IndexMap<Rc<str>, Context> = IndexMap::new();
    let mut recursive = Vec::new();

    for assignment in split_assignments(input) {
        let assignment = assignment.trim();
        if assignment.is_empty() {
            continue;
        }

        let Some((name, rhs)) = split_assignment(assignment) else {
            return Err(ParseError::syntax(format!(
                "environment assignment `{}` does not match `name = expression`",
                assignment
            )));
        };

        if rhs.contains(name) {
            warn!(
                binding = name,
                "the definition appears to be recursive; termination relies on the visited-state cache"
            );
            recursive.push(Rc::from(name));
        }

        // One enclosing parenthesis layer on the right-hand side is dropped.
        let expr = rhs
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(rhs);
        let context = parse_context(expr)?;

        if bindings.insert(Rc::from(name), context).is_some() {
            return Err(ParseError::DuplicateBinding {
                name: name.to_string(),
            });
        }
    }

    Ok(Environment::from_parts(bindings, recursive))
}

/// Split on commas that are followed by `name =`.
fn split_assignments(input: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0usize;
    for (i, c) in input.char_indices() {
        if c == ',' && starts_new_assignment(&input[i + 1..]) {
            pieces.push(&input[start..i]);
            start = i + 1;
        }
    }
    pieces.push(&input[start..]);
    pieces
}

/// Whether the remainder begins with `ident =` (modulo whitespace).
fn starts_new_assignment(rest: &str) -> bool {
    let rest = rest.trim_start();
    let ident_len = rest
        .char_indices()
        .take_while(|(i, c)| {
            if *i == 0 {
                c.is_ascii_alphabetic() || *c == '_'
            } else {
                c.is_ascii_alphanumeric() || *c == '_'
            }
        })
        .count();
    ident_len > 0 && rest[ident_len..].trim_start().starts_with('=')
}

/// Split one assignment into its (validated) name and right-hand side.
fn split_assignment(assignment: &str) -> Option<(&str, &str)> {
    let (name, rhs) = assignment.split_once('=')?;
    let name = name.trim();
    let rhs = rhs.trim();

    let valid_name = !name.is_empty()
        && name
            .chars()
            .enumerate()
            .all(|(i, c)| (i > 0 && c.is_ascii_alphanumeric()) || c.is_ascii_alphabetic() || c == '_');
    if !valid_name || rhs.is_empty() {
        return None;
    }
    Some((name, rhs))
}
