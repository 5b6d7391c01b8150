//! Lockstep process managers.
//!
//! A manager owns a group of parallel processes and drives them round by
//! round: every process contributes its entity set, the reaction system
//! takes one step on the union, and the cumulative result is pushed back to
//! every process. Each completed round records one graph edge.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use rxsys_core::{Entity, EntitySet, ModelError, ReactionSystem};
use rxsys_lang::{Context, Environment};

use crate::coordinator::SharedState;
use crate::error::{Error, Result};
use crate::graph::NodePair;
use crate::process::InteractiveProcess;

/// Identifier of a manager within one coordinator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManagerId(pub(crate) u32);

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a manager stopped producing rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallReason {
    /// Every process has consumed its terminator.
    AllEnded,
    /// The reaction step produced no entities.
    EmptyResult,
    /// The round reproduced a transition already in the visited cache.
    Revisited,
}

impl fmt::Display for StallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StallReason::AllEnded => write!(f, "all processes have ended"),
            StallReason::EmptyResult => write!(f, "the cumulative result is empty"),
            StallReason::Revisited => write!(f, "transition already visited"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerStatus {
    Running,
    Stalled(StallReason),
    Done,
}

/// Drives one group of processes in lockstep against a shared system.
#[derive(Debug, Clone)]
pub struct ProcessManager {
    id: ManagerId,
    system: Rc<ReactionSystem>,
    processes: Vec<InteractiveProcess>,
    edges: Vec<NodePair>,
    status: ManagerStatus,
    stall_reason: Option<StallReason>,
}

impl ProcessManager {
    /// Build a validated manager from parallel contexts.
    ///
    /// Every entity literally mentioned by an environment binding or by the
    /// contexts must belong to the system's universe, and every name the
    /// contexts reference must be bound in the environment.
    pub fn new(
        id: ManagerId,
        system: Rc<ReactionSystem>,
        env: Rc<Environment>,
        contexts: Vec<Context>,
    ) -> Result<Self> {
        if contexts.is_empty() {
            return Err(Error::InvalidFork(
                "manager needs at least one process".to_string(),
            ));
        }
        // Every declared binding is checked, referenced or not.
        for (_, bound) in env.bindings() {
            let mut entities = EntitySet::new();
            for component in bound.components() {
                component.collect_entities(&mut entities);
            }
            check_universe(&system, &entities)?;
        }
        for context in &contexts {
            validate_context(&system, &env, context)?;
        }
        let processes = InteractiveProcess::create_parallel(env, contexts);
        Ok(Self::assemble(id, system, processes))
    }

    /// Build a manager from already-running processes. Fork groups are
    /// copies of validated state, so no re-validation happens here.
    pub(crate) fn forked(
        id: ManagerId,
        system: Rc<ReactionSystem>,
        processes: Vec<InteractiveProcess>,
    ) -> Self {
        Self::assemble(id, system, processes)
    }

    fn assemble(
        id: ManagerId,
        system: Rc<ReactionSystem>,
        mut processes: Vec<InteractiveProcess>,
    ) -> Self {
        for process in &mut processes {
            process.bind_owner(id);
        }
        Self {
            id,
            system,
            processes,
            edges: Vec::new(),
            status: ManagerStatus::Running,
            stall_reason: None,
        }
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn status(&self) -> ManagerStatus {
        self.status
    }

    /// Why the last run stopped, once it has.
    pub fn stall_reason(&self) -> Option<StallReason> {
        self.stall_reason
    }

    pub fn edges(&self) -> &[NodePair] {
        &self.edges
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Run rounds until this manager stalls.
    ///
    /// The visited cache bounds the number of rounds: entity sets are drawn
    /// from the finite universe, so eventually every round either revisits a
    /// recorded transition or stalls on its own.
    pub(crate) fn run(&mut self, shared: &mut SharedState) -> Result<()> {
        while self.status == ManagerStatus::Running {
            self.round(shared)?;
        }
        if let ManagerStatus::Stalled(reason) = self.status {
            debug!(manager = %self.id, rounds = self.edges.len(), %reason, "manager stalled");
        }
        self.status = ManagerStatus::Done;
        Ok(())
    }

    /// One lockstep round across all processes.
    pub(crate) fn round(&mut self, shared: &mut SharedState) -> Result<()> {
        let first_round = self.processes[0].result_len() == 1;
        let mut from_label = group_label(
            self.processes
                .iter()
                .map(|p| p.remaining_context_string()),
        );

        // Advance every process; choice alternatives fork whole new manager
        // groups built from rolled-back copies of the other processes.
        let mut merged = EntitySet::new();
        let mut ended = 0usize;
        for j in 0..self.processes.len() {
            let mut forks = Vec::new();
            let stepped = self.processes[j].advance(&mut forks)?;
            for sibling in forks {
                let mut group: Vec<InteractiveProcess> = self
                    .processes
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != j)
                    .map(|(_, p)| p.fork_copy())
                    .collect();
                group.insert(j, sibling);
                shared.enqueue_fork(Rc::clone(&self.system), group);
            }
            if self.processes[j].has_ended() {
                ended += 1;
            } else if let Some(w) = stepped {
                merged.extend(w);
            }
        }

        if ended == self.processes.len() {
            self.stall(StallReason::AllEnded);
            return Ok(());
        }

        let cumulative = self.system.step(&merged);

        let mut from = EntitySet::new();
        let mut arc = EntitySet::new();
        for process in &self.processes {
            from.extend(process.current_result().iter().cloned());
            arc.extend(process.last_literal_entities());
        }
        arc.extend(from.iter().cloned());
        if first_round {
            // Marker for the synthetic start node; deliberately added after
            // the arc union so it never appears on an arc.
            from.insert(Entity::new("-"));
        }

        for process in &mut self.processes {
            process.push(cumulative.clone());
        }
        let to_label = group_label(
            self.processes
                .iter()
                .map(|p| p.remaining_context_string()),
        );

        // Label overrides: the start node shows the initial contexts, and a
        // round that stepped straight out of a substituted binding shows the
        // binding names. Both are judged on the post-advance state.
        if first_round {
            from_label = group_label(
                self.processes
                    .iter()
                    .map(|p| p.initial_context_string()),
            );
        } else if self.processes[0].cursor() == 1 && self.processes[0].stems_from().is_some() {
            from_label = group_label(
                self.processes
                    .iter()
                    .map(|p| p.stems_from().unwrap_or_default().to_string()),
            );
        }

        let edge = NodePair::new(from, from_label, cumulative.clone(), to_label, arc);

        if cumulative.is_empty() {
            self.stall(StallReason::EmptyResult);
            return Ok(());
        }
        if shared.is_revisited(&edge) {
            self.stall(StallReason::Revisited);
            return Ok(());
        }
        shared.record(edge.clone());
        self.edges.push(edge);
        Ok(())
    }

    fn stall(&mut self, reason: StallReason) {
        self.status = ManagerStatus::Stalled(reason);
        self.stall_reason = Some(reason);
    }
}

fn group_label<I>(parts: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = String::new();
    for part in parts {
        out.push_str(" | ");
        out.push_str(&part);
    }
    out
}

/// Check a context (and everything reachable from it through the
/// environment) against the system universe and the binding table.
fn validate_context(
    system: &ReactionSystem,
    env: &Environment,
    context: &Context,
) -> Result<()> {
    let mut entities = EntitySet::new();
    let mut references = BTreeSet::new();
    for component in context.components() {
        component.collect_entities(&mut entities);
        component.collect_references(&mut references);
    }

    let mut queue: Vec<Rc<str>> = references.iter().cloned().collect();
    let mut visited = references;
    while let Some(name) = queue.pop() {
        let bound = env
            .get(&name)
            .ok_or_else(|| Error::UnboundReference(name.to_string()))?;
        let mut nested = BTreeSet::new();
        for component in bound.components() {
            component.collect_entities(&mut entities);
            component.collect_references(&mut nested);
        }
        for reference in nested {
            if visited.insert(reference.clone()) {
                queue.push(reference);
            }
        }
    }

    check_universe(system, &entities)
}

fn check_universe(system: &ReactionSystem, entities: &EntitySet) -> Result<()> {
    for entity in entities {
        if !system.contains(entity) {
            return Err(ModelError::UnknownEntity(entity.symbol().to_string()).into());
        }
    }
    Ok(())
}
