//! Engine errors

use thiserror::Error;

use rxsys_core::ModelError;
use rxsys_lang::ParseError;

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("unbound reference: no environment binding named `{0}`")]
    UnboundReference(String),

    #[error("no reaction system has been registered with the coordinator")]
    UninitializedEngine,

    #[error("invalid fork request: {0}")]
    InvalidFork(String),
}
