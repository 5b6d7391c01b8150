//! Model errors

use thiserror::Error;

/// Model result type
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while building the reaction-system model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid reaction: reactants, inhibitors and products must all be non-empty")]
    InvalidReaction,

    #[error("unknown entity `{0}`: it does not belong to the reaction system's universe")]
    UnknownEntity(String),
}
