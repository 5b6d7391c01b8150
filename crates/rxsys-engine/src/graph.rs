//! Result-graph edges and final graph assembly.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use rxsys_core::{stringify_entities, EntitySet};

/// One recorded transition of a manager round.
///
/// Semantic identity — used for caching and revisit detection — is the
/// `(from, to, arc)` entity triple. The two labels are display-only and are
/// excluded from equality and hashing; including them would make revisited
/// states look fresh and break termination detection.
#[derive(Debug, Clone)]
pub struct NodePair {
    from: EntitySet,
    from_label: String,
    to: EntitySet,
    to_label: String,
    arc: EntitySet,
}

impl NodePair {
    pub fn new(
        from: EntitySet,
        from_label: String,
        to: EntitySet,
        to_label: String,
        arc: EntitySet,
    ) -> Self {
        Self {
            from,
            from_label,
            to,
            to_label,
            arc,
        }
    }

    pub fn from_entities(&self) -> &EntitySet {
        &self.from
    }

    pub fn to_entities(&self) -> &EntitySet {
        &self.to
    }

    pub fn arc_entities(&self) -> &EntitySet {
        &self.arc
    }

    pub fn from_label(&self) -> &str {
        &self.from_label
    }

    pub fn to_label(&self) -> &str {
        &self.to_label
    }
}

impl PartialEq for NodePair {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.arc == other.arc
    }
}

impl Eq for NodePair {}

impl Hash for NodePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.arc.hash(state);
    }
}

impl fmt::Display for NodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}} --{{{}}}--> {{{}}}",
            stringify_entities(&self.from),
            stringify_entities(&self.arc),
            stringify_entities(&self.to),
        )
    }
}

/// The deduplicated state-transition graph of a whole run.
///
/// Nodes are `entities + context label` strings; edges carry the arc's
/// entity string as their label. `BTreeSet` storage makes rendering
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct StateGraph {
    nodes: BTreeSet<String>,
    edges: BTreeSet<(String, String, String)>,
}

#[derive(Serialize)]
struct GraphDoc<'a> {
    nodes: Vec<&'a str>,
    edges: Vec<EdgeDoc<'a>>,
}

#[derive(Serialize)]
struct EdgeDoc<'a> {
    from: &'a str,
    to: &'a str,
    label: &'a str,
}

impl StateGraph {
    /// Union the edges recorded by every manager into one node/edge set.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a NodePair>,
    {
        let mut graph = StateGraph::default();
        for pair in edges {
            let from = format!("{}{}", stringify_entities(&pair.from), pair.from_label);
            let to = format!("{}{}", stringify_entities(&pair.to), pair.to_label);
            let label = stringify_entities(&pair.arc);
            graph.nodes.insert(from.clone());
            graph.nodes.insert(to.clone());
            graph.edges.insert((from, to, label));
        }
        graph
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.edges
            .iter()
            .map(|(f, t, l)| (f.as_str(), t.as_str(), l.as_str()))
    }

    /// Render in DOT format.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph G { node [shape=box] edge [arrowhead=vee] ");
        for node in &self.nodes {
            out.push('"');
            out.push_str(node);
            out.push_str("\";\t");
        }
        for (from, to, label) in &self.edges {
            out.push('"');
            out.push_str(from);
            out.push_str("\" -> \"");
            out.push_str(to);
            out.push_str("\" [label = \"");
            out.push_str(label);
            out.push_str("\"];\t");
        }
        out.push('}');
        out
    }

    /// Render as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let doc = GraphDoc {
            nodes: self.nodes.iter().map(String::as_str).collect(),
            edges: self
                .edges
                .iter()
                .map(|(from, to, label)| EdgeDoc { from, to, label })
                .collect(),
        };
        serde_json::to_string_pretty(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxsys_core::Entity;

    fn set(symbols: &[&str]) -> EntitySet {
        symbols.iter().map(|s| Entity::new(s)).collect()
    }

    fn pair(from: &[&str], to: &[&str], arc: &[&str], labels: (&str, &str)) -> NodePair {
        NodePair::new(
            set(from),
            labels.0.to_string(),
            set(to),
            labels.1.to_string(),
            set(arc),
        )
    }

    #[test]
    fn identity_ignores_labels() {
        let a = pair(&["a"], &["b"], &["a"], (" | x", " | y"));
        let b = pair(&["a"], &["b"], &["a"], (" | other", " | labels"));
        assert_eq!(a, b);

        let mut seen = std::collections::HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b));
    }

    #[test]
    fn identity_distinguishes_arcs() {
        let a = pair(&["a"], &["b"], &["a"], ("", ""));
        let b = pair(&["a"], &["b"], &["a", "c"], ("", ""));
        assert_ne!(a, b);
    }

    #[test]
    fn graph_deduplicates_nodes_and_edges() {
        let edges = [
            pair(&["a"], &["b"], &["a"], ("", "")),
            pair(&["a"], &["b"], &["a"], ("", "")),
            pair(&["b"], &["a"], &["b"], ("", "")),
        ];
        let graph = StateGraph::from_edges(edges.iter());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn dot_output_has_the_expected_frame() {
        let edges = [pair(&["a"], &["b"], &["a"], ("", ""))];
        let dot = StateGraph::from_edges(edges.iter()).to_dot();
        assert!(dot.starts_with("digraph G { node [shape=box] edge [arrowhead=vee] "));
        assert!(dot.ends_with('}'));
        assert!(dot.contains("\"a\" -> \"b\" [label = \"a\"];"));
    }

    #[test]
    fn json_output_lists_nodes_and_edges() {
        let edges = [pair(&["a"], &["b"], &["a"], ("", ""))];
        let json = StateGraph::from_edges(edges.iter()).to_json().unwrap();
        assert!(json.contains("\"nodes\""));
        assert!(json.contains("\"from\": \"a\""));
    }
}
