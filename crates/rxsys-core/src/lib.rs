// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Reaction-system model.
//!
//! A reaction system is a finite entity universe plus a set of reactions.
//! Each reaction fires against a working set when all of its reactants are
//! present and none of its inhibitors are; one `step` of the system is the
//! union of the products of every fired reaction.

pub mod entity;
pub mod error;
pub mod reaction;
pub mod system;

pub use entity::{stringify_entities, Entity, EntitySet};
pub use error::{ModelError, Result};
pub use reaction::Reaction;
pub use system::ReactionSystem;
