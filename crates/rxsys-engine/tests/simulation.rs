//! End-to-end runs through the string inputs, mirroring how the binary
//! drives the engine.

use rxsys_engine::{compute, Error};

#[test]
fn single_literal_context_runs_one_round_and_halts() {
    let outcome = compute("([a],[c],[b])", "", "{a}.nil").unwrap();
    let graph = outcome.graph;

    assert_eq!(graph.edge_count(), 1);
    let (from, to, arc) = graph.edges().next().unwrap();
    assert_eq!(from, "- | {a}.nil");
    assert_eq!(to, "b | nil");
    assert_eq!(arc, "a");
}

#[test]
fn dot_output_contains_the_transition() {
    let outcome = compute("([a],[c],[b])", "", "{a}.nil").unwrap();
    let dot = outcome.graph.to_dot();

    assert!(dot.starts_with("digraph G { node [shape=box] edge [arrowhead=vee] "));
    assert!(dot.contains("\"- | {a}.nil\" -> \"b | nil\" [label = \"a\"];"));
}

#[test]
fn inhibited_reaction_produces_an_empty_graph() {
    // c inhibits the only reaction, so the first round yields nothing.
    let outcome = compute("([a],[c],[b])", "", "{a,c}.{a}.nil").unwrap();
    assert!(outcome.graph.is_empty());
}

#[test]
fn recursive_environment_reaches_a_steady_state() {
    let outcome = compute("([a],[b],[a])", "x = {a}.x", "x").unwrap();
    let graph = outcome.graph;

    // One edge out of the start marker, one steady-state self loop.
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.edges().any(|(from, to, _)| from == to));
}

#[test]
fn choice_explores_both_alternatives() {
    let outcome = compute(
        "([a],[x],[a]), ([b],[x],[b])",
        "",
        "{a}.nil + {b}.nil",
    )
    .unwrap();
    let graph = outcome.graph;

    assert_eq!(graph.edge_count(), 2);
    assert!(graph.nodes().any(|n| n.starts_with('a')));
    assert!(graph.nodes().any(|n| n.starts_with('b')));
}

#[test]
fn branching_run_produces_the_fired_products_and_halts() {
    let outcome = compute(
        "([a,b],[c],[b])",
        "",
        "{a,b}.{a}.{a,c}.nil + {a,b}.{a}.{a}.nil",
    )
    .unwrap();
    let graph = outcome.graph;

    assert!(!graph.is_empty());
    // Both alternatives start with {a,b}, which fires the reaction; the
    // second round only adds the already-cached steady transition.
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.edges().all(|(_, to, _)| to.starts_with('b')));
}

#[test]
fn repetition_runs_the_bound_context_n_times() {
    let outcome = compute("([a],[x],[a])", "y = {a}", "<2,y>.nil").unwrap();
    let graph = outcome.graph;

    // Two rounds of {a}, then the terminator stalls the group.
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn parallel_branches_feed_one_merged_round() {
    let outcome = compute(
        "([a,b],[x],[c])",
        "u = {a}.nil , v = {b}.nil",
        "u, v",
    )
    .unwrap();
    let graph = outcome.graph;

    // Neither branch alone enables the reaction; their union does.
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.nodes().any(|n| n.starts_with('c')));
}

#[test]
fn lactose_operon_model_runs_to_completion() {
    let reactions = "([lac],[void],[lac]), \
                     ([lacI],[void],[lacI]), \
                     ([lacI],[void],[i]), \
                     ([i],[lactose],[iOP]), \
                     ([cya],[void],[cya]), \
                     ([cya],[void],[cAMP]), \
                     ([crp],[void],[crp]), \
                     ([crp],[void],[cAP]), \
                     ([cAMP,cAP],[glucose],[cAMPCAP]), \
                     ([lac,cAMPCAP],[iOP],[z,y,a])";
    let environment =
        "x = {lac,lacI,i,cya,cAMP,crp,cAP}.x , y = ({lactose}.y + {glucose}.y)";

    let outcome = compute(reactions, environment, "x, y").unwrap();
    let graph = outcome.graph;

    assert!(!graph.is_empty());
    // Two parallel processes: every node label carries both branches.
    assert!(graph.nodes().all(|n| n.contains(" | ")));
    assert!(graph.nodes().any(|n| n.contains("lac")));
    // The lactose branch keeps the operon expressed somewhere in the graph.
    assert!(graph.edges().any(|(_, to, _)| to.contains('z')));
}

#[test]
fn malformed_reaction_string_is_reported_verbatim() {
    let err = compute("([a],[b)", "", "{a}.nil").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(err.to_string().contains("([a],[b)"));
}

#[test]
fn context_entity_outside_the_universe_is_rejected() {
    let err = compute("([a],[b],[a])", "", "{ghost}.nil").unwrap_err();
    assert!(matches!(err, Error::Model(_)));
}

#[test]
fn unused_binding_entity_outside_the_universe_is_rejected() {
    let err = compute("([a],[b],[a])", "unused = {ghost}.nil", "{a}.nil").unwrap_err();
    assert!(matches!(err, Error::Model(_)));
}

#[test]
fn unbound_context_reference_is_rejected() {
    let err = compute("([a],[b],[a])", "", "{a}.missing").unwrap_err();
    assert_eq!(err, Error::UnboundReference("missing".to_string()));
}
