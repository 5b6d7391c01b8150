//! The reaction system: universe + reactions, closed under one step.

use std::collections::BTreeSet;

use crate::entity::{Entity, EntitySet};
use crate::error::{ModelError, Result};
use crate::reaction::Reaction;

/// An entity universe `S` and a reaction set `A`.
///
/// Every entity referenced by a reaction must belong to the universe; this is
/// checked once at construction and the system is immutable afterwards.
#[derive(Debug, Clone)]
pub struct ReactionSystem {
    universe: EntitySet,
    reactions: BTreeSet<Reaction>,
}

impl ReactionSystem {
    pub fn new(universe: EntitySet, reactions: BTreeSet<Reaction>) -> Result<Self> {
        for reaction in &reactions {
            check_membership(&universe, reaction.reactants())?;
            check_membership(&universe, reaction.inhibitors())?;
            check_membership(&universe, reaction.products())?;
        }
        Ok(Self {
            universe,
            reactions,
        })
    }

    /// One step of the system: the union of every fired reaction's products.
    ///
    /// Set union is commutative, so the iteration order of the reaction set
    /// cannot affect the result.
    pub fn step(&self, w: &EntitySet) -> EntitySet {
        let mut out = EntitySet::new();
        for reaction in &self.reactions {
            if reaction.is_enabled(w) {
                out.extend(reaction.products().iter().cloned());
            }
        }
        out
    }

    pub fn universe(&self) -> &EntitySet {
        &self.universe
    }

    pub fn contains(&self, entity: &Entity) -> bool {
        self.universe.contains(entity)
    }

    pub fn reactions(&self) -> &BTreeSet<Reaction> {
        &self.reactions
    }
}

fn check_membership(universe: &EntitySet, entities: &EntitySet) -> Result<()> {
    for entity in entities {
        if !universe.contains(entity) {
            return Err(ModelError::UnknownEntity(entity.symbol().to_string()));
        }
    }
    Ok(())
}
