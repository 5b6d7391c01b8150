// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Execution engine for reaction-system simulations.
//!
//! The engine takes a parsed system plus context processes and explores
//! every nondeterministic branch: interactive processes walk their contexts,
//! managers drive process groups in lockstep rounds, and the coordinator
//! owns the managers, the fork queue and the visited-transition cache. The
//! output of a run is a deduplicated state-transition graph.

pub mod coordinator;
pub mod error;
pub mod graph;
pub mod manager;
pub mod process;

pub use coordinator::ManagersCoordinator;
pub use error::{Error, Result};
pub use graph::{NodePair, StateGraph};
pub use manager::{ManagerId, ManagerStatus, ProcessManager, StallReason};
pub use process::InteractiveProcess;

use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::info;

use rxsys_core::ReactionSystem;
use rxsys_lang::parser::{
    check_reactions_conformity, extract_universe, parse_environment, parse_parallel_contexts,
    parse_reactions,
};

/// The result of a whole run.
#[derive(Debug)]
pub struct Outcome {
    pub graph: StateGraph,
    pub elapsed: Duration,
}

/// Parse the three input strings, run the simulation to completion and
/// assemble the transition graph.
pub fn compute(reactions: &str, environment: &str, context: &str) -> Result<Outcome> {
    let start = Instant::now();

    check_reactions_conformity(reactions)?;
    let universe = extract_universe(reactions);
    let reaction_set = parse_reactions(reactions)?;
    let system = ReactionSystem::new(universe, reaction_set)?;
    info!(
        entities = system.universe().len(),
        reactions = system.reactions().len(),
        "reaction system built"
    );

    let env = Rc::new(parse_environment(environment)?);
    let contexts = parse_parallel_contexts(context)?;

    let mut coordinator = ManagersCoordinator::new();
    coordinator.register_system(system);
    coordinator.spawn(env, contexts)?;
    coordinator.run_all()?;

    let graph = coordinator.assemble_graph();
    let elapsed = start.elapsed();
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        ?elapsed,
        "graph assembled"
    );
    Ok(Outcome { graph, elapsed })
}
