//! Run orchestration across forked managers.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, info};

use rxsys_core::ReactionSystem;
use rxsys_lang::{Context, Environment};

use crate::error::{Error, Result};
use crate::graph::{NodePair, StateGraph};
use crate::manager::{ManagerId, ProcessManager};
use crate::process::InteractiveProcess;

/// State shared by every manager of one run: the id counter, the visited
/// transition cache and the queue of forked managers awaiting execution.
#[derive(Debug, Default)]
pub(crate) struct SharedState {
    pub(crate) next_id: u32,
    pub(crate) seen: HashSet<NodePair>,
    pub(crate) pending: Vec<ProcessManager>,
}

impl SharedState {
    fn mint_id(&mut self) -> ManagerId {
        let id = ManagerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Queue a forked process group as a new manager. Ids are minted at
    /// enqueue time, so creation order and id order coincide.
    pub(crate) fn enqueue_fork(
        &mut self,
        system: Rc<ReactionSystem>,
        processes: Vec<InteractiveProcess>,
    ) {
        let id = self.mint_id();
        self.pending.push(ProcessManager::forked(id, system, processes));
    }

    pub(crate) fn is_revisited(&self, edge: &NodePair) -> bool {
        self.seen.contains(edge)
    }

    pub(crate) fn record(&mut self, edge: NodePair) {
        self.seen.insert(edge);
    }
}

/// Owns every manager of a run and drives them to completion.
///
/// Managers forked during a round are queued and picked up after the forking
/// manager stalls, so execution order follows creation order. All managers
/// share one visited-transition cache, which is what makes recursive
/// environments terminate.
#[derive(Debug, Default)]
pub struct ManagersCoordinator {
    system: Option<Rc<ReactionSystem>>,
    managers: Vec<ProcessManager>,
    shared: SharedState,
}

impl ManagersCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the reaction system every manager will step against. Must be
    /// called before [`spawn`](Self::spawn).
    pub fn register_system(&mut self, system: ReactionSystem) {
        self.system = Some(Rc::new(system));
    }

    pub fn system(&self) -> Option<&Rc<ReactionSystem>> {
        self.system.as_ref()
    }

    /// Create the root manager for a group of parallel contexts.
    pub fn spawn(&mut self, env: Rc<Environment>, contexts: Vec<Context>) -> Result<ManagerId> {
        let system = self
            .system
            .clone()
            .ok_or(Error::UninitializedEngine)?;
        let id = self.shared.mint_id();
        let manager = ProcessManager::new(id, system, env, contexts)?;
        debug!(manager = %id, processes = manager.process_count(), "manager spawned");
        self.managers.push(manager);
        Ok(id)
    }

    /// Run every manager to a stall, including managers forked along the
    /// way. The loop re-reads the length because each completed manager may
    /// have appended forks.
    pub fn run_all(&mut self) -> Result<()> {
        let mut i = 0;
        while i < self.managers.len() {
            self.managers[i].run(&mut self.shared)?;
            let forked = std::mem::take(&mut self.shared.pending);
            if !forked.is_empty() {
                debug!(
                    forked_by = %self.managers[i].id(),
                    count = forked.len(),
                    "adopting forked managers"
                );
            }
            self.managers.extend(forked);
            i += 1;
        }
        info!(
            managers = self.managers.len(),
            transitions = self.shared.seen.len(),
            "run complete"
        );
        Ok(())
    }

    /// Union the edges recorded by every manager into one graph.
    pub fn assemble_graph(&self) -> StateGraph {
        StateGraph::from_edges(self.managers.iter().flat_map(|m| m.edges()))
    }

    pub fn manager_count(&self) -> usize {
        self.managers.len()
    }

    pub fn managers(&self) -> impl Iterator<Item = &ProcessManager> {
        self.managers.iter()
    }

    /// Drop all managers and the visited cache, keeping the registered
    /// system so another run can start from scratch.
    pub fn reset(&mut self) {
        self.managers.clear();
        self.shared = SharedState::default();
    }
}
