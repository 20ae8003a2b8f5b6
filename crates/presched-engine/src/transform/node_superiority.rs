//! Static node-superiority transformation
//!
//! For every pair of instructions unrelated by any dependence path, decides
//! whether one is provably superior: scheduling it first can never produce a
//! worse schedule, over every legal completion, than scheduling it second.
//! Each proven pair gets a latency-0 artificial edge, pruning the search
//! space the list scheduler has to explore.
//!
//! Superiority of A over B requires all of:
//! 1. same issue type
//! 2. recursive predecessors of A are a subset of B's
//! 3. recursive successors of B are a subset of A's
//! 4. per register class, at least as many live ranges are shortened by
//!    scheduling A first as are lengthened by scheduling B second
//! 5. per register class, A defines no more registers than B
//!
//! The test is sound but best-effort: it does not find every superior pair.

use smallvec::SmallVec;

use crate::error::GraphError;
use crate::graph::{DepKind, DependenceGraph, InstId, RegId};
use crate::transform::GraphTransform;

/// Node-superiority edge insertion
///
/// Construct with [`new`](Self::new), run once via
/// [`GraphTransform::apply`]. With `multi_pass` set, pairs that stayed
/// independent after the first sweep are revisited until a sweep adds no
/// edge: each accepted edge strictly shrinks the independent-pair set, so
/// the loop terminates.
#[derive(Debug)]
pub struct StaticNodeSupTrans {
    multi_pass: bool,
    edges_added: usize,
}

impl StaticNodeSupTrans {
    /// Create the transformation; `multi_pass` enables re-sweeping pairs
    /// left independent by the first pass
    pub fn new(multi_pass: bool) -> Self {
        StaticNodeSupTrans {
            multi_pass,
            edges_added: 0,
        }
    }

    /// Number of artificial edges added so far (diagnostic)
    pub fn edges_added(&self) -> usize {
        self.edges_added
    }

    /// Test both orientations of an independent pair, inserting an edge for
    /// the first orientation that proves superior. Returns whether an edge
    /// was added.
    fn try_superior_edge(
        &mut self,
        graph: &mut DependenceGraph,
        a: InstId,
        b: InstId,
    ) -> Result<bool, GraphError> {
        // Stable structural tie-break so the pass is deterministic.
        let (a, b) = if a <= b { (a, b) } else { (b, a) };

        if node_is_superior(graph, a, b) {
            self.add_superior_edge(graph, a, b)?;
            Ok(true)
        } else if node_is_superior(graph, b, a) {
            self.add_superior_edge(graph, b, a)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn add_superior_edge(
        &mut self,
        graph: &mut DependenceGraph,
        src: InstId,
        dst: InstId,
    ) -> Result<(), GraphError> {
        #[cfg(debug_assertions)]
        eprintln!("node-superiority: {} is superior to {}", src, dst);
        graph.add_edge(src, dst, 0, DepKind::Artificial)?;
        self.edges_added += 1;
        Ok(())
    }

    /// Revisit pairs the first pass left independent, sweeping until a full
    /// sweep adds no edge or no pair survives. Each sweep filters the
    /// surviving pairs into a fresh list; pairs that became dependent
    /// through earlier insertions are dropped.
    fn sweep_remaining_pairs(
        &mut self,
        graph: &mut DependenceGraph,
        mut pairs: Vec<(InstId, InstId)>,
    ) -> Result<(), GraphError> {
        let mut added = true;
        while added && !pairs.is_empty() {
            added = false;
            let mut survivors = Vec::with_capacity(pairs.len());
            for (a, b) in pairs {
                if !graph.nodes_independent(a, b) {
                    continue;
                }
                if self.try_superior_edge(graph, a, b)? {
                    added = true;
                } else {
                    survivors.push((a, b));
                }
            }
            pairs = survivors;
        }
        Ok(())
    }
}

impl GraphTransform for StaticNodeSupTrans {
    fn name(&self) -> &str {
        "static-node-superiority"
    }

    fn apply(&mut self, graph: &mut DependenceGraph) -> Result<(), GraphError> {
        let num_nodes = graph.inst_count();
        // Independent pairs that produced no edge, kept for later passes.
        let mut indep_pairs: Vec<(InstId, InstId)> = Vec::new();

        for i in 0..num_nodes {
            let a = InstId(i as u32);
            for j in (i + 1)..num_nodes {
                let b = InstId(j as u32);
                if graph.nodes_independent(a, b) && !self.try_superior_edge(graph, a, b)? {
                    indep_pairs.push((a, b));
                }
            }
        }

        if self.multi_pass {
            self.sweep_remaining_pairs(graph, indep_pairs)?;
        }

        Ok(())
    }
}

/// Registers whose live range may be lengthened by scheduling `node` after
/// `other`, compared to the opposite order
///
/// A register qualifies if `node` uses it, `other` does not, and no other
/// consumer of the register is a recursive successor of `other` (such a
/// consumer would keep the register live past both instructions regardless
/// of their order).
fn possibly_lengthened_if_after(
    graph: &DependenceGraph,
    node: InstId,
    other: InstId,
) -> SmallVec<[RegId; 8]> {
    let other_uses = graph.inst(other).uses();
    let mut result = SmallVec::new();

    for &reg in graph.inst(node).uses() {
        if other_uses.contains(&reg) {
            continue;
        }
        // In the hypothetical schedule [... node ... other ...], the register
        // stays live past `other` exactly when some consumer besides `node`
        // is a recursive successor of `other`.
        let kept_live = graph
            .reg(reg)
            .users()
            .iter()
            .any(|&user| user != node && graph.inst(other).reaches(user));
        if !kept_live {
            result.push(reg);
        }
    }

    result
}

/// Per-register-class tally of a register list
fn count_by_type(graph: &DependenceGraph, regs: &[RegId]) -> SmallVec<[u32; 8]> {
    let mut counts = SmallVec::from_elem(0u32, graph.reg_type_count() as usize);
    for &reg in regs {
        counts[graph.reg(reg).reg_type() as usize] += 1;
    }
    counts
}

/// The five-condition superiority test: is scheduling `a` before `b` never
/// worse than the reverse, over every legal completion?
fn node_is_superior(graph: &DependenceGraph, a: InstId, b: InstId) -> bool {
    let inst_a = graph.inst(a);
    let inst_b = graph.inst(b);

    if inst_a.issue_type() != inst_b.issue_type() {
        return false;
    }

    // Any predecessor constraint on A must already constrain B, and any
    // successor constraint on B must already constrain A; otherwise forcing
    // A first could violate an ordering the pair does not share.
    if !inst_a.rec_preds.is_subset(&inst_b.rec_preds) {
        return false;
    }
    if !inst_b.rec_succs.is_subset(&inst_a.rec_succs) {
        return false;
    }

    // Live-range balance: per register class, scheduling A first must
    // shorten at least as many live ranges as scheduling B second lengthens.
    let lengthened_by_b = count_by_type(graph, &possibly_lengthened_if_after(graph, b, a));
    let shortened_by_a = count_by_type(graph, &possibly_lengthened_if_after(graph, a, b));
    if shortened_by_a
        .iter()
        .zip(&lengthened_by_b)
        .any(|(&shortened, &lengthened)| shortened < lengthened)
    {
        return false;
    }

    // Definition pressure: per register class, A must not define more
    // registers than B does.
    let defs_a = count_by_type(graph, inst_a.defs());
    let defs_b = count_by_type(graph, inst_b.defs());
    defs_a.iter().zip(&defs_b).all(|(&da, &db)| da <= db)
}
