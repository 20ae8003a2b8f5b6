//! Node-superiority transformation tests
//!
//! Builds dependence graphs by hand, runs the transformation, and checks the
//! scheduler-facing guarantees: the graph stays acyclic, reachability
//! bit-vectors stay exactly consistent with the edge set, superiority edges
//! are latency-0 artificial edges, and multi-pass never finds less than
//! single-pass.

use std::collections::HashSet;

use presched_engine::{
    DepKind, DependenceGraph, GraphTransform, InstId, IssueType, StaticNodeSupTrans,
};

/// Breadth-first reachability over the direct successor lists, ignoring the
/// incrementally maintained bit-vectors entirely.
fn reachable_from(graph: &DependenceGraph, start: InstId) -> HashSet<InstId> {
    let mut seen = HashSet::new();
    let mut work = vec![start];
    while let Some(node) = work.pop() {
        for &succ in graph.inst(node).succs() {
            if seen.insert(succ) {
                work.push(succ);
            }
        }
    }
    seen
}

/// The core invariant: bit-vectors equal the true transitive closure in both
/// directions, and no instruction reaches itself (acyclicity).
fn assert_closure_exact(graph: &DependenceGraph) {
    let n = graph.inst_count();
    for i in 0..n {
        let a = InstId(i as u32);
        let reachable = reachable_from(graph, a);
        assert!(!reachable.contains(&a), "cycle through {}", a);
        for j in 0..n {
            let b = InstId(j as u32);
            assert_eq!(
                graph.inst(a).reaches(b),
                reachable.contains(&b),
                "forward closure wrong for {} -> {}",
                a,
                b
            );
            assert_eq!(
                graph.inst(b).reached_by(a),
                reachable.contains(&b),
                "backward closure wrong for {} -> {}",
                a,
                b
            );
        }
    }
}

fn edge_set(graph: &DependenceGraph) -> HashSet<(InstId, InstId)> {
    graph.edges().iter().map(|e| (e.src, e.dst)).collect()
}

fn apply_superiority(graph: &mut DependenceGraph, multi_pass: bool) -> usize {
    let mut trans = StaticNodeSupTrans::new(multi_pass);
    trans.apply(graph).expect("transformation always succeeds");
    trans.edges_added()
}

/// Two same-issue instructions sharing one use, where only B defines a
/// register: A is superior and gets the forcing edge.
fn scenario_shared_use() -> (DependenceGraph, InstId, InstId) {
    let mut g = DependenceGraph::new(2);
    let a = g.add_instruction(IssueType(0));
    let b = g.add_instruction(IssueType(0));
    let shared = g.add_register(0);
    g.add_use(a, shared);
    g.add_use(b, shared);
    let d = g.add_register(1);
    g.add_def(b, d);
    (g, a, b)
}

/// Three same-issue instructions where superiority of a over b only becomes
/// provable after the first pass forces p before b:
/// - edge p -> a exists from the start
/// - b defines one register, a and p define none
/// The first pass rejects (a, b) (a's predecessor set is not yet a subset of
/// b's), then proves p superior to b and adds p -> b. A later sweep sees
/// preds(a) = preds(b) = {p} and adds a -> b.
fn scenario_unlocked_by_first_pass() -> (DependenceGraph, InstId, InstId, InstId) {
    let mut g = DependenceGraph::new(1);
    let a = g.add_instruction(IssueType(0));
    let b = g.add_instruction(IssueType(0));
    let p = g.add_instruction(IssueType(0));
    let d = g.add_register(0);
    g.add_def(b, d);
    g.add_edge(p, a, 1, DepKind::Data).unwrap();
    (g, a, b, p)
}

/// A mixed region for the property checks: two issue types, two register
/// classes, a few chains and some pressure.
fn scenario_mixed_region() -> DependenceGraph {
    let mut g = DependenceGraph::new(2);
    let ids: Vec<InstId> = [0u16, 0, 0, 1, 1, 0, 0, 0]
        .iter()
        .map(|&t| g.add_instruction(IssueType(t)))
        .collect();

    let regs: Vec<_> = [0u16, 0, 1, 0, 1].iter().map(|&t| g.add_register(t)).collect();
    g.add_def(ids[0], regs[0]);
    g.add_use(ids[1], regs[0]);
    g.add_use(ids[2], regs[0]);
    g.add_def(ids[1], regs[1]);
    g.add_use(ids[5], regs[1]);
    g.add_def(ids[3], regs[2]);
    g.add_use(ids[4], regs[2]);
    g.add_def(ids[5], regs[3]);
    g.add_use(ids[6], regs[3]);
    g.add_use(ids[7], regs[4]);

    g.add_edge(ids[0], ids[1], 2, DepKind::Data).unwrap();
    g.add_edge(ids[0], ids[2], 2, DepKind::Data).unwrap();
    g.add_edge(ids[1], ids[5], 1, DepKind::Data).unwrap();
    g.add_edge(ids[3], ids[4], 3, DepKind::Data).unwrap();
    g.add_edge(ids[5], ids[6], 1, DepKind::Data).unwrap();
    g
}

// =============================================================================
// SUPERIORITY DECISIONS
// =============================================================================

mod decisions {
    use super::*;

    #[test]
    fn shared_use_makes_the_cheaper_definer_superior() {
        let (mut g, a, b) = scenario_shared_use();
        assert!(g.nodes_independent(a, b));

        let added = apply_superiority(&mut g, false);
        assert_eq!(added, 1);

        let edge = g.edges().last().copied().unwrap();
        assert_eq!((edge.src, edge.dst), (a, b));
        assert_eq!(edge.latency, 0);
        assert_eq!(edge.kind, DepKind::Artificial);
        assert!(g.inst(a).reaches(b));
        assert!(!g.nodes_independent(a, b));
    }

    #[test]
    fn differing_issue_types_add_nothing() {
        let mut g = DependenceGraph::new(1);
        g.add_instruction(IssueType(0));
        g.add_instruction(IssueType(1));
        assert_eq!(apply_superiority(&mut g, true), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn unshared_predecessors_add_nothing() {
        // a and b have distinct predecessors, so neither predecessor set is
        // a subset of the other; the predecessors themselves differ in issue
        // type from everything else.
        let mut g = DependenceGraph::new(1);
        let a = g.add_instruction(IssueType(0));
        let b = g.add_instruction(IssueType(0));
        let p1 = g.add_instruction(IssueType(1));
        let p2 = g.add_instruction(IssueType(2));
        g.add_edge(p1, a, 1, DepKind::Data).unwrap();
        g.add_edge(p2, b, 1, DepKind::Data).unwrap();

        assert_eq!(apply_superiority(&mut g, true), 0);
        assert!(g.nodes_independent(a, b));
    }

    #[test]
    fn fully_ordered_chain_adds_nothing() {
        let mut g = DependenceGraph::new(1);
        let ids: Vec<InstId> = (0..5).map(|_| g.add_instruction(IssueType(0))).collect();
        for w in ids.windows(2) {
            g.add_edge(w[0], w[1], 1, DepKind::Data).unwrap();
        }
        let before = g.edge_count();
        assert_eq!(apply_superiority(&mut g, true), 0);
        assert_eq!(g.edge_count(), before);
    }
}

// =============================================================================
// MULTI-PASS
// =============================================================================

mod multi_pass {
    use super::*;

    #[test]
    fn second_sweep_catches_pairs_unlocked_by_the_first() {
        let (mut single, a, b, p) = scenario_unlocked_by_first_pass();
        let mut multi = single.clone();

        let single_added = apply_superiority(&mut single, false);
        let multi_added = apply_superiority(&mut multi, true);

        // Single pass scans (a, b) before it proves p superior to b.
        assert_eq!(single_added, 1);
        assert!(edge_set(&single).contains(&(p, b)));
        assert!(!edge_set(&single).contains(&(a, b)));

        // Multi-pass revisits the remembered pair once preds match.
        assert_eq!(multi_added, 2);
        assert!(edge_set(&multi).contains(&(p, b)));
        assert!(edge_set(&multi).contains(&(a, b)));
    }

    #[test]
    fn multi_pass_edges_are_a_superset_of_single_pass() {
        let graphs = vec![
            scenario_mixed_region(),
            scenario_shared_use().0,
            scenario_unlocked_by_first_pass().0,
        ];
        for g in graphs {
            let mut single = g.clone();
            let mut multi = g;
            apply_superiority(&mut single, false);
            apply_superiority(&mut multi, true);
            assert!(edge_set(&single).is_subset(&edge_set(&multi)));
        }
    }
}

// =============================================================================
// GRAPH INVARIANTS
// =============================================================================

mod invariants {
    use super::*;

    #[test]
    fn closure_stays_exact_and_acyclic_after_the_pass() {
        for multi in [false, true] {
            let mut g = scenario_mixed_region();
            apply_superiority(&mut g, multi);
            assert_closure_exact(&g);
        }
    }

    #[test]
    fn every_added_edge_is_a_latency_zero_artificial_edge() {
        let mut g = scenario_mixed_region();
        let before = g.edge_count();
        apply_superiority(&mut g, true);
        for edge in &g.edges()[before..] {
            assert_eq!(edge.latency, 0);
            assert_eq!(edge.kind, DepKind::Artificial);
        }
    }

    #[test]
    fn superior_nodes_were_never_preceded_by_their_inferiors() {
        // Soundness: a forcing edge src -> dst is only added when the pair
        // was independent, so dst can never have reached src beforehand.
        // After the pass this shows up as an acyclic graph whose artificial
        // edges all respect the closure.
        let mut g = scenario_mixed_region();
        apply_superiority(&mut g, true);
        for edge in g.edges() {
            assert!(!g.inst(edge.dst).reaches(edge.src));
        }
    }

    #[test]
    fn settled_graph_is_idempotent_under_another_pass() {
        // After a shared-use run nothing is left to find.
        let (mut g, _, _) = scenario_shared_use();
        apply_superiority(&mut g, false);
        let edges = g.edge_count();
        assert_eq!(apply_superiority(&mut g, false), 0);
        assert_eq!(g.edge_count(), edges);

        // A multi-pass fixpoint is idempotent under any later pass.
        let mut g = scenario_mixed_region();
        apply_superiority(&mut g, true);
        let edges = g.edge_count();
        assert_eq!(apply_superiority(&mut g, false), 0);
        assert_eq!(apply_superiority(&mut g, true), 0);
        assert_eq!(g.edge_count(), edges);
    }

    #[test]
    fn transform_reports_its_name() {
        assert_eq!(StaticNodeSupTrans::new(false).name(), "static-node-superiority");
    }
}
