//! Interactive processes.
//!
//! An interactive process is one branch of context evolution: it walks its
//! context sequence one component at a time, producing a per-round entity
//! set and consuming the cumulative response its manager pushes back.

use std::rc::Rc;

use rxsys_core::EntitySet;
use rxsys_lang::{Context, ContextComponent, Environment};

use crate::error::{Error, Result};
use crate::manager::ManagerId;

/// One logical thread advancing through a context sequence.
#[derive(Debug, Clone)]
pub struct InteractiveProcess {
    env: Rc<Environment>,
    context: Context,
    cursor: usize,
    /// Result sequence `D`; index 0 is the empty set.
    results: Vec<EntitySet>,
    result_cursor: usize,
    ended: bool,
    /// Set when this process has taken a genuine step in the current round
    /// and cleared when the round's result is pushed. A dirty process that
    /// gets fork-copied must re-execute that step in the copy.
    dirty: bool,
    owner: Option<ManagerId>,
    /// Provenance for graph labels only: the starting context and the
    /// binding most recently substituted in.
    initial_context: Rc<Context>,
    stems_from: Option<Rc<str>>,
}

impl InteractiveProcess {
    pub fn new(env: Rc<Environment>, context: Context) -> Self {
        let initial_context = Rc::new(context.clone());
        Self {
            env,
            context,
            cursor: 0,
            results: vec![EntitySet::new()],
            result_cursor: 0,
            ended: false,
            dirty: false,
            owner: None,
            initial_context,
            stems_from: None,
        }
    }

    /// One process per parallel branch, all sharing the same environment.
    pub fn create_parallel(env: Rc<Environment>, contexts: Vec<Context>) -> Vec<Self> {
        contexts
            .into_iter()
            .map(|ctx| Self::new(Rc::clone(&env), ctx))
            .collect()
    }

    /// Resolve the component at the cursor down to a genuine step.
    ///
    /// Non-terminal components are resolved without consuming a round:
    /// references and repetitions substitute in place and the cursor
    /// restarts at 0; a choice keeps its first alternative here and pushes
    /// one sibling process per remaining alternative onto `forks` (the
    /// manager turns each sibling into a new manager). Returns `None` when
    /// the cursor is past the end of the sequence.
    pub fn advance(&mut self, forks: &mut Vec<InteractiveProcess>) -> Result<Option<EntitySet>> {
        loop {
            let Some(component) = self.context.components().get(self.cursor).cloned() else {
                return Ok(None);
            };

            match component {
                ContextComponent::Choice(alternatives) => {
                    let mut alternatives = alternatives.into_iter();
                    let Some(first) = alternatives.next() else {
                        return Err(Error::InvalidFork(
                            "choice component with no alternatives".to_string(),
                        ));
                    };
                    for alternative in alternatives {
                        forks.push(self.sibling(alternative));
                    }
                    self.context = first;
                    self.cursor = 0;
                }
                ContextComponent::Reference(name) => {
                    let bound = self
                        .env
                        .get(&name)
                        .ok_or_else(|| Error::UnboundReference(name.to_string()))?
                        .clone();
                    self.context = self.context.substituted(self.cursor, &bound);
                    self.cursor = 0;
                    self.stems_from = Some(name);
                }
                ContextComponent::Repetition(count, inner) => {
                    let expanded = Context::repeat_of(*inner, count);
                    self.context = self.context.substituted(self.cursor, &expanded);
                    self.cursor = 0;
                }
                ContextComponent::Entities(entities) => {
                    let mut w: EntitySet = entities.into_iter().collect();
                    w.extend(self.current_result().iter().cloned());
                    self.cursor += 1;
                    self.dirty = true;
                    return Ok(Some(w));
                }
                ContextComponent::Terminator => {
                    let w = self.current_result().clone();
                    self.cursor += 1;
                    self.dirty = true;
                    self.ended = true;
                    return Ok(Some(w));
                }
            }
        }
    }

    /// Append the round's cumulative result as the next `D_{i+1}`.
    pub fn push(&mut self, result: EntitySet) {
        self.results.push(result);
        self.result_cursor += 1;
        self.dirty = false;
    }

    /// Copy this process for a forked manager.
    ///
    /// The result history is always copied, never shared. If the process
    /// has already stepped this round the copied cursor is rewound by one so
    /// the copy re-executes that step (and re-derives its ended flag)
    /// instead of silently skipping it. The environment and the initial
    /// context are shared by reference.
    pub fn fork_copy(&self) -> Self {
        let cursor = if self.dirty { self.cursor - 1 } else { self.cursor };
        Self {
            env: Rc::clone(&self.env),
            context: self.context.clone(),
            cursor,
            results: self.results.clone(),
            result_cursor: self.result_cursor,
            ended: self.ended && !self.dirty,
            dirty: false,
            owner: None,
            initial_context: Rc::clone(&self.initial_context),
            stems_from: self.stems_from.clone(),
        }
    }

    /// A new process starting at `context`, inheriting this process's
    /// result history and provenance. Used for choice alternatives.
    fn sibling(&self, context: Context) -> Self {
        Self {
            env: Rc::clone(&self.env),
            context,
            cursor: 0,
            results: self.results.clone(),
            result_cursor: self.result_cursor,
            ended: false,
            dirty: false,
            owner: None,
            initial_context: Rc::clone(&self.initial_context),
            stems_from: self.stems_from.clone(),
        }
    }

    /// The most recent pushed result `D_i`.
    pub fn current_result(&self) -> &EntitySet {
        &self.results[self.result_cursor]
    }

    pub fn result_len(&self) -> usize {
        self.results.len()
    }

    /// The literal entities of the component consumed by the last step, or
    /// the empty set if that component carried none.
    pub fn last_literal_entities(&self) -> EntitySet {
        let idx = self.cursor.saturating_sub(1);
        match self.context.components().get(idx) {
            Some(ContextComponent::Entities(entities)) => entities.iter().cloned().collect(),
            _ => EntitySet::new(),
        }
    }

    /// The not-yet-consumed part of the context, for graph labels.
    pub fn remaining_context_string(&self) -> String {
        self.context.tail_string(self.cursor)
    }

    pub fn initial_context_string(&self) -> String {
        self.initial_context.to_string()
    }

    pub fn stems_from(&self) -> Option<&str> {
        self.stems_from.as_deref()
    }

    pub fn environment(&self) -> &Rc<Environment> {
        &self.env
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn owner(&self) -> Option<ManagerId> {
        self.owner
    }

    pub(crate) fn bind_owner(&mut self, owner: ManagerId) {
        self.owner = Some(owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxsys_core::Entity;
    use rxsys_lang::parser::{parse_context, parse_environment};

    fn set(symbols: &[&str]) -> EntitySet {
        symbols.iter().map(|s| Entity::new(s)).collect()
    }

    fn process(env: &str, context: &str) -> InteractiveProcess {
        let env = Rc::new(parse_environment(env).unwrap());
        InteractiveProcess::new(env, parse_context(context).unwrap())
    }

    #[test]
    fn entity_literal_steps_union_the_previous_result() {
        let mut p = process("", "{a,b}.{c}.nil");
        let mut forks = Vec::new();

        assert_eq!(p.advance(&mut forks).unwrap(), Some(set(&["a", "b"])));
        p.push(set(&["x"]));

        // Second round: literal {c} united with the pushed result.
        assert_eq!(p.advance(&mut forks).unwrap(), Some(set(&["c", "x"])));
        assert!(forks.is_empty());
    }

    #[test]
    fn terminator_returns_the_last_result_and_ends() {
        let mut p = process("", "{a}.nil");
        let mut forks = Vec::new();

        p.advance(&mut forks).unwrap();
        p.push(set(&["r"]));

        assert_eq!(p.advance(&mut forks).unwrap(), Some(set(&["r"])));
        assert!(p.has_ended());

        // Past the end: idle.
        assert_eq!(p.advance(&mut forks).unwrap(), None);
    }

    #[test]
    fn reference_substitutes_and_records_provenance() {
        let mut p = process("x = {a}.nil", "x");
        let mut forks = Vec::new();

        assert_eq!(p.advance(&mut forks).unwrap(), Some(set(&["a"])));
        assert_eq!(p.stems_from(), Some("x"));
        assert_eq!(p.context(), &parse_context("{a}.nil").unwrap());
    }

    #[test]
    fn unbound_reference_fails() {
        let mut p = process("", "ghost");
        let mut forks = Vec::new();
        assert_eq!(
            p.advance(&mut forks).unwrap_err(),
            Error::UnboundReference("ghost".to_string())
        );
    }

    #[test]
    fn repetition_expands_at_the_cursor() {
        let mut p = process("x = {a}", "<3,x>.{b}.nil");
        let mut forks = Vec::new();

        // Each of the three expanded copies resolves to {a}.
        for _ in 0..3 {
            assert_eq!(p.advance(&mut forks).unwrap(), Some(set(&["a"])));
            p.push(EntitySet::new());
        }
        assert_eq!(p.advance(&mut forks).unwrap(), Some(set(&["b"])));
    }

    #[test]
    fn choice_forks_siblings_and_keeps_the_first_alternative() {
        let mut p = process("", "{a}.nil + {b}.nil + {c}.nil");
        let mut forks = Vec::new();

        assert_eq!(p.advance(&mut forks).unwrap(), Some(set(&["a"])));
        assert_eq!(forks.len(), 2);
        assert_eq!(forks[0].context(), &parse_context("{b}.nil").unwrap());
        assert_eq!(forks[1].context(), &parse_context("{c}.nil").unwrap());
        assert_eq!(forks[0].cursor(), 0);
    }

    #[test]
    fn fork_copy_rewinds_a_dirty_cursor() {
        let mut p = process("", "{a}.{b}.nil");
        let mut forks = Vec::new();

        p.advance(&mut forks).unwrap();
        assert!(p.is_dirty());
        assert_eq!(p.cursor(), 1);

        let copy = p.fork_copy();
        assert_eq!(copy.cursor(), 0);
        assert!(!copy.is_dirty());

        // The copy re-executes the step the original already took.
        let mut copy = copy;
        assert_eq!(copy.advance(&mut forks).unwrap(), Some(set(&["a"])));
    }

    #[test]
    fn fork_copy_of_a_clean_process_keeps_its_state() {
        let mut p = process("", "{a}.nil");
        let mut forks = Vec::new();
        p.advance(&mut forks).unwrap();
        p.push(set(&["r"]));
        p.advance(&mut forks).unwrap(); // consumes nil
        p.push(set(&[]));
        assert!(p.has_ended());
        assert!(!p.is_dirty());

        let copy = p.fork_copy();
        assert!(copy.has_ended());
        assert_eq!(copy.cursor(), p.cursor());
    }

    #[test]
    fn fork_copy_result_history_is_independent() {
        let mut p = process("", "{a}.{b}.nil");
        let mut forks = Vec::new();
        p.advance(&mut forks).unwrap();

        let mut copy = p.fork_copy();
        copy.push(set(&["only-in-copy"]));

        assert_eq!(p.result_len(), 1);
        assert_eq!(copy.result_len(), 2);
    }

    #[test]
    fn dirty_terminator_rollback_clears_ended() {
        let mut p = process("", "nil");
        let mut forks = Vec::new();
        p.advance(&mut forks).unwrap();
        assert!(p.has_ended() && p.is_dirty());

        let copy = p.fork_copy();
        assert!(!copy.has_ended());
        assert_eq!(copy.cursor(), 0);
    }
}
