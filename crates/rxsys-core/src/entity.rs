//! Interned entity symbols.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// An atomic named species/signal.
///
/// Wraps a non-empty symbol string. Equality, ordering and hashing all
/// delegate to the symbol, so an entity created from the same name anywhere
/// in the pipeline compares equal.
///
/// Uses `Rc<str>` for cheap cloning throughout the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(Rc<str>);

impl Entity {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(Rc::from(symbol.as_ref()))
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Entity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A set of entities, ordered by symbol for deterministic display.
pub type EntitySet = BTreeSet<Entity>;

/// Render an entity collection as a comma-joined string, e.g. `a,b,c`.
pub fn stringify_entities<'a, I>(entities: I) -> String
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut out = String::new();
    for (i, e) in entities.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(e.symbol());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_symbol() {
        assert_eq!(Entity::new("a"), Entity::from("a"));
        assert_ne!(Entity::new("a"), Entity::new("b"));
    }

    #[test]
    fn sets_are_sorted_for_display() {
        let set: EntitySet = ["c", "a", "b"].into_iter().map(Entity::new).collect();
        assert_eq!(stringify_entities(&set), "a,b,c");
    }

    #[test]
    fn empty_set_renders_empty() {
        let set = EntitySet::new();
        assert_eq!(stringify_entities(&set), "");
    }
}
