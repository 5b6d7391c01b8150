//! Hand-written recursive-descent parsers for the three input strings.

mod context;
mod environment;
mod reactions;
mod stream;

pub use context::{parse_context, parse_parallel_contexts};
pub use environment::parse_environment;
pub use reactions::{check_reactions_conformity, extract_universe, parse_reactions};
pub use stream::TokenStream;
