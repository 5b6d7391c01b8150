//! Parse errors for the three input strings.

use thiserror::Error;

use rxsys_core::ModelError;

/// Parse result type
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised while parsing the reaction, environment and context inputs.
///
/// All of these are detected eagerly, before any simulation round runs, and
/// are non-recoverable for that run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("the reaction `{triple}` does not respect the form ([a,b],[c,d],[e,f])")]
    MalformedReaction { triple: String },

    #[error("context syntax error: {0}")]
    ContextSyntax(String),

    #[error("the environment variable `{name}` has been defined multiple times")]
    DuplicateBinding { name: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ParseError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::ContextSyntax(message.into())
    }
}
