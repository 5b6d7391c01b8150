// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Input grammar for reaction-system simulations.
//!
//! Three free-form strings describe a run: the reactions (which also imply
//! the entity universe), the environment (named context bindings), and the
//! context driving the processes. This crate holds the shared lexer, the
//! typed context model, and the recursive-descent parsers for all three.

pub mod context;
pub mod environment;
pub mod error;
pub mod lexer;
pub mod parser;

pub use context::{Context, ContextComponent};
pub use environment::Environment;
pub use error::{ParseError, Result};
pub use lexer::Token;
