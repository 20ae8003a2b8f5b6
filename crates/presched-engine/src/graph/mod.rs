//! Dependence-graph model for a scheduling region
//!
//! A [`DependenceGraph`] owns the instructions, registers, and edges of one
//! scheduling region. Reachability is maintained as per-instruction
//! bit-vectors over recursive predecessors/successors, updated incrementally
//! on every edge insertion so queries never see stale closure.
//!
//! Invariants:
//! - the graph is acyclic: [`DependenceGraph::add_edge`] rejects any edge
//!   whose target already reaches its source
//! - after every successful mutation the reachability bit-vectors equal the
//!   transitive closure of the edge set, in both directions
//!
//! The graph is single-writer: a transformation pass takes `&mut` for its
//! whole run, so no reader can observe a half-propagated closure.

mod instruction;
mod register;

pub use instruction::{InstId, Instruction, IssueType};
pub use register::{RegId, Register};

use rustc_hash::FxHashSet;

use crate::error::GraphError;

/// Dependence-edge classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepKind {
    /// True (read-after-write) dependence
    Data,
    /// Anti (write-after-read) dependence
    Anti,
    /// Output (write-after-write) dependence
    Output,
    /// Artificial ordering edge added by a graph transformation
    Artificial,
}

/// A directed dependence edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Instruction that must issue first
    pub src: InstId,
    /// Instruction that must wait
    pub dst: InstId,
    /// Cycles `dst` must wait after `src` issues
    pub latency: u16,
    /// Why the ordering is required
    pub kind: DepKind,
}

/// Dependence graph of one scheduling region
///
/// Owns instructions, registers, and edges. Construction is builder-style:
/// add instructions and registers, wire uses/defs, then add edges.
/// Instruction identity is fixed once added; edge and reachability state
/// mutate as edges are inserted.
#[derive(Debug, Clone, Default)]
pub struct DependenceGraph {
    insts: Vec<Instruction>,
    regs: Vec<Register>,
    edges: Vec<Edge>,
    /// Direct-edge set for duplicate detection
    direct: FxHashSet<(InstId, InstId)>,
    reg_type_count: u16,
}

impl DependenceGraph {
    /// Create an empty graph whose registers use `reg_type_count` classes
    pub fn new(reg_type_count: u16) -> Self {
        DependenceGraph {
            insts: Vec::new(),
            regs: Vec::new(),
            edges: Vec::new(),
            direct: FxHashSet::default(),
            reg_type_count,
        }
    }

    /// Number of instructions in the graph
    #[inline]
    pub fn inst_count(&self) -> usize {
        self.insts.len()
    }

    /// Number of register classes in the machine model
    #[inline]
    pub fn reg_type_count(&self) -> u16 {
        self.reg_type_count
    }

    /// Indexed instruction lookup
    ///
    /// Panics if `id` is out of range; ids handed out by
    /// [`add_instruction`](Self::add_instruction) are always valid.
    #[inline]
    pub fn inst(&self, id: InstId) -> &Instruction {
        &self.insts[id.index()]
    }

    /// Indexed register lookup
    #[inline]
    pub fn reg(&self, id: RegId) -> &Register {
        &self.regs[id.index()]
    }

    /// All edges, in insertion order
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges in the graph
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Append an instruction and return its dense id
    pub fn add_instruction(&mut self, issue_type: IssueType) -> InstId {
        let id = InstId(self.insts.len() as u32);
        self.insts.push(Instruction::new(id, issue_type));
        id
    }

    /// Append a register of the given class and return its id
    pub fn add_register(&mut self, reg_type: u16) -> RegId {
        assert!(
            reg_type < self.reg_type_count,
            "register class {} out of range ({} classes)",
            reg_type,
            self.reg_type_count
        );
        let id = RegId(self.regs.len() as u32);
        self.regs.push(Register::new(id, reg_type));
        id
    }

    /// Record that `inst` reads `reg`
    ///
    /// Appends to the instruction's use list and to the register's consumer
    /// list. Repeated identical calls are no-ops.
    pub fn add_use(&mut self, inst: InstId, reg: RegId) {
        if self.insts[inst.index()].uses.contains(&reg) {
            return;
        }
        self.insts[inst.index()].uses.push(reg);
        self.regs[reg.index()].users.push(inst);
    }

    /// Record that `inst` writes `reg`
    pub fn add_def(&mut self, inst: InstId, reg: RegId) {
        if self.insts[inst.index()].defs.contains(&reg) {
            return;
        }
        self.insts[inst.index()].defs.push(reg);
    }

    /// True iff no dependence path relates `a` and `b` in either direction
    ///
    /// An instruction is never independent of itself. No mutation.
    pub fn nodes_independent(&self, a: InstId, b: InstId) -> bool {
        a != b && !self.inst(a).reaches(b) && !self.inst(b).reaches(a)
    }

    /// Insert the edge `src -> dst` and propagate transitive closure
    ///
    /// Fails if either id is out of range or if the edge would create a
    /// cycle (`dst` already reaches `src`, or `src == dst`). A duplicate of
    /// an existing direct edge is accepted and ignored. On success the
    /// reachability bit-vectors of every affected instruction are updated
    /// before returning, so subsequent queries see exact closure.
    pub fn add_edge(
        &mut self,
        src: InstId,
        dst: InstId,
        latency: u16,
        kind: DepKind,
    ) -> Result<(), GraphError> {
        let n = self.insts.len();
        if src.index() >= n {
            return Err(GraphError::InstOutOfRange(src));
        }
        if dst.index() >= n {
            return Err(GraphError::InstOutOfRange(dst));
        }
        if src == dst || self.inst(dst).reaches(src) {
            return Err(GraphError::WouldCycle { src, dst });
        }
        if !self.direct.insert((src, dst)) {
            return Ok(());
        }

        self.edges.push(Edge {
            src,
            dst,
            latency,
            kind,
        });
        self.insts[src.index()].succs.push(dst);
        self.insts[dst.index()].preds.push(src);

        // Everything at or before src now reaches everything at or after dst.
        let mut above: Vec<usize> = self.insts[src.index()].rec_preds.ones().collect();
        above.push(src.index());
        let mut below: Vec<usize> = self.insts[dst.index()].rec_succs.ones().collect();
        below.push(dst.index());

        for &x in &above {
            for &y in &below {
                if !self.insts[x].rec_succs.contains(y) {
                    self.insts[x].rec_succs.grow(n);
                    self.insts[x].rec_succs.insert(y);
                    self.insts[y].rec_preds.grow(n);
                    self.insts[y].rec_preds.insert(x);
                }
            }
        }

        Ok(())
    }
}
