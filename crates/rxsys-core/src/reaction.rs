//! Gated reactions.

use std::fmt;

use crate::entity::{stringify_entities, EntitySet};
use crate::error::{ModelError, Result};

/// A reactant/inhibitor/product triple.
///
/// All three sets must be non-empty. A reaction is enabled against a working
/// set `W` when every reactant is in `W` and no inhibitor is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reaction {
    reactants: EntitySet,
    inhibitors: EntitySet,
    products: EntitySet,
}

impl Reaction {
    pub fn new(reactants: EntitySet, inhibitors: EntitySet, products: EntitySet) -> Result<Self> {
        if reactants.is_empty() || inhibitors.is_empty() || products.is_empty() {
            return Err(ModelError::InvalidReaction);
        }
        Ok(Self {
            reactants,
            inhibitors,
            products,
        })
    }

    /// Whether the reaction fires against the working set.
    pub fn is_enabled(&self, w: &EntitySet) -> bool {
        self.reactants.is_subset(w) && self.inhibitors.is_disjoint(w)
    }

    /// The reaction's contribution to one step: its products if enabled,
    /// the empty set otherwise.
    pub fn fire(&self, w: &EntitySet) -> EntitySet {
        if self.is_enabled(w) {
            self.products.clone()
        } else {
            EntitySet::new()
        }
    }

    pub fn reactants(&self) -> &EntitySet {
        &self.reactants
    }

    pub fn inhibitors(&self) -> &EntitySet {
        &self.inhibitors
    }

    pub fn products(&self) -> &EntitySet {
        &self.products
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "([{}],[{}],[{}])",
            stringify_entities(&self.reactants),
            stringify_entities(&self.inhibitors),
            stringify_entities(&self.products),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    fn set(symbols: &[&str]) -> EntitySet {
        symbols.iter().map(|s| Entity::new(s)).collect()
    }

    #[test]
    fn fires_when_reactants_present_and_inhibitors_absent() {
        let r = Reaction::new(set(&["a", "b"]), set(&["c"]), set(&["d"])).unwrap();
        assert_eq!(r.fire(&set(&["a", "b"])), set(&["d"]));
    }

    #[test]
    fn inhibited_reaction_yields_nothing() {
        let r = Reaction::new(set(&["a", "b"]), set(&["c"]), set(&["d"])).unwrap();
        assert_eq!(r.fire(&set(&["a", "b", "c"])), EntitySet::new());
    }

    #[test]
    fn missing_reactant_yields_nothing() {
        let r = Reaction::new(set(&["a", "b"]), set(&["c"]), set(&["d"])).unwrap();
        assert_eq!(r.fire(&set(&["a"])), EntitySet::new());
    }

    #[test]
    fn empty_component_sets_are_rejected() {
        assert_eq!(
            Reaction::new(set(&[]), set(&["c"]), set(&["d"])),
            Err(ModelError::InvalidReaction)
        );
        assert_eq!(
            Reaction::new(set(&["a"]), set(&["c"]), set(&[])),
            Err(ModelError::InvalidReaction)
        );
    }

    #[test]
    fn displays_in_triple_form() {
        let r = Reaction::new(set(&["b", "a"]), set(&["c"]), set(&["d"])).unwrap();
        assert_eq!(r.to_string(), "([a,b],[c],[d])");
    }
}
