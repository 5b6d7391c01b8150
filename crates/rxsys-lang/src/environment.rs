//! Name -> Context binding table.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::context::Context;

/// The environment: one context binding per name.
///
/// Bindings keep their insertion order for display. Self-referential
/// definitions (e.g. `x = {a}.x`) are legal — recursion is cut off at run
/// time by the visited-state cache — but they are recorded here and reported
/// with a warning at parse time.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: IndexMap<Rc<str>, Context>,
    recursive: Vec<Rc<str>>,
}

impl Environment {
    pub(crate) fn from_parts(bindings: IndexMap<Rc<str>, Context>, recursive: Vec<Rc<str>>) -> Self {
        Self {
            bindings,
            recursive,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&Rc<str>, &Context)> {
        self.bindings.iter()
    }

    /// Names whose right-hand side textually mentions themselves.
    pub fn recursive_bindings(&self) -> &[Rc<str>] {
        &self.recursive
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, ctx) in &self.bindings {
            writeln!(f, "{}: {}", name, ctx)?;
        }
        Ok(())
    }
}
