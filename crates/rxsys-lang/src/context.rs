//! Typed context model.
//!
//! A `Context` is an ordered sequence of components describing how a process
//! feeds entities into the reaction system over time. Contexts are immutable
//! values with structural equality; substitution returns a new `Context`
//! rather than mutating in place.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use rxsys_core::{stringify_entities, Entity, EntitySet};

/// One element of a context sequence.
///
/// The variant set is closed by the grammar: entity-set literals, the `nil`
/// terminator, named references into the environment, counted repetitions
/// and nondeterministic choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextComponent {
    /// `{a,b,...}` — the order is preserved for display only; the semantic
    /// content is the set.
    Entities(Vec<Entity>),
    /// `nil` — marks process completion.
    Terminator,
    /// A name resolved against the environment at execution time.
    Reference(Rc<str>),
    /// `<n,c>` — `n` sequential copies of `c`, `n >= 1`.
    Repetition(u32, Box<ContextComponent>),
    /// Alternatives explored exhaustively by forking.
    Choice(Vec<Context>),
}

impl ContextComponent {
    /// Collect every entity literally mentioned by this component, recursing
    /// through repetitions and choices. References contribute nothing: a
    /// binding name is not an entity.
    pub fn collect_entities(&self, out: &mut EntitySet) {
        match self {
            ContextComponent::Entities(entities) => out.extend(entities.iter().cloned()),
            ContextComponent::Terminator | ContextComponent::Reference(_) => {}
            ContextComponent::Repetition(_, inner) => inner.collect_entities(out),
            ContextComponent::Choice(alternatives) => {
                for alt in alternatives {
                    for comp in alt.components() {
                        comp.collect_entities(out);
                    }
                }
            }
        }
    }

    /// Collect every binding name this component refers to, recursing through
    /// repetitions and choices.
    pub fn collect_references(&self, out: &mut BTreeSet<Rc<str>>) {
        match self {
            ContextComponent::Entities(_) | ContextComponent::Terminator => {}
            ContextComponent::Reference(name) => {
                out.insert(name.clone());
            }
            ContextComponent::Repetition(_, inner) => inner.collect_references(out),
            ContextComponent::Choice(alternatives) => {
                for alt in alternatives {
                    for comp in alt.components() {
                        comp.collect_references(out);
                    }
                }
            }
        }
    }
}

impl fmt::Display for ContextComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextComponent::Entities(entities) => {
                write!(f, "{{{}}}", stringify_entities(entities.iter()))
            }
            ContextComponent::Terminator => write!(f, "nil"),
            ContextComponent::Reference(name) => write!(f, "{}", name),
            ContextComponent::Repetition(count, inner) => write!(f, "<{},{}>", count, inner),
            ContextComponent::Choice(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                Ok(())
            }
        }
    }
}

/// An ordered sequence of context components.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context(Vec<ContextComponent>);

impl Context {
    pub fn new(components: Vec<ContextComponent>) -> Self {
        Self(components)
    }

    /// A sequence of `count` copies of `component`, used to expand a
    /// repetition in place.
    pub fn repeat_of(component: ContextComponent, count: u32) -> Self {
        Self(vec![component; count as usize])
    }

    pub fn components(&self) -> &[ContextComponent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace the component at `position` with the components of
    /// `replacement`, re-appending the original tail.
    ///
    /// The prefix before `position` has already been consumed by the process
    /// cursor, so it is dropped; the caller restarts its cursor at 0.
    pub fn substituted(&self, position: usize, replacement: &Context) -> Context {
        let mut components =
            Vec::with_capacity(replacement.0.len() + self.0.len().saturating_sub(position + 1));
        components.extend(replacement.0.iter().cloned());
        components.extend(self.0.iter().skip(position + 1).cloned());
        Context(components)
    }

    /// The sequence from `position` onwards, rendered as `c1.c2.c3`.
    pub fn tail_string(&self, position: usize) -> String {
        let mut out = String::new();
        for (i, comp) in self.0.iter().enumerate().skip(position) {
            if i > position {
                out.push('.');
            }
            out.push_str(&comp.to_string());
        }
        out
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tail_string(0))
    }
}
