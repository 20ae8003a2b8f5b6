//! Instruction nodes of the dependence graph
//!
//! Each instruction carries its issue type, ordered use/def register lists,
//! direct neighbor lists, and recursive (transitive) predecessor/successor
//! bit-vectors. The bit-vectors give O(1) bidirectional reachability
//! membership and are kept exactly consistent with the edge set by
//! [`DependenceGraph::add_edge`](crate::graph::DependenceGraph::add_edge).

use fixedbitset::FixedBitSet;
use smallvec::SmallVec;

use crate::graph::register::RegId;

/// Unique identifier for an instruction in a dependence graph
///
/// Ids are dense: a graph with N instructions uses 0..N-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstId(pub u32);

impl InstId {
    /// Index into the graph's instruction table
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for InstId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i{}", self.0)
    }
}

/// Issue-type tag: classification by required execution resource
///
/// Assigned by the machine model; two instructions compete for the same
/// issue slot iff their tags are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueType(pub u16);

/// An instruction node in the dependence graph
#[derive(Debug, Clone)]
pub struct Instruction {
    pub(crate) id: InstId,
    pub(crate) issue_type: IssueType,
    /// Registers read, in operand order
    pub(crate) uses: SmallVec<[RegId; 8]>,
    /// Registers written, in operand order
    pub(crate) defs: SmallVec<[RegId; 4]>,
    /// Direct predecessors (one entry per incoming edge)
    pub(crate) preds: Vec<InstId>,
    /// Direct successors (one entry per outgoing edge)
    pub(crate) succs: Vec<InstId>,
    /// Transitive closure of `preds`
    pub(crate) rec_preds: FixedBitSet,
    /// Transitive closure of `succs`
    pub(crate) rec_succs: FixedBitSet,
}

impl Instruction {
    pub(crate) fn new(id: InstId, issue_type: IssueType) -> Self {
        Instruction {
            id,
            issue_type,
            uses: SmallVec::new(),
            defs: SmallVec::new(),
            preds: Vec::new(),
            succs: Vec::new(),
            rec_preds: FixedBitSet::new(),
            rec_succs: FixedBitSet::new(),
        }
    }

    /// This instruction's id
    #[inline]
    pub fn id(&self) -> InstId {
        self.id
    }

    /// Issue-type tag from the machine model
    #[inline]
    pub fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    /// Registers this instruction reads, in operand order
    #[inline]
    pub fn uses(&self) -> &[RegId] {
        &self.uses
    }

    /// Registers this instruction writes, in operand order
    #[inline]
    pub fn defs(&self) -> &[RegId] {
        &self.defs
    }

    /// Direct dependence predecessors
    #[inline]
    pub fn preds(&self) -> &[InstId] {
        &self.preds
    }

    /// Direct dependence successors
    #[inline]
    pub fn succs(&self) -> &[InstId] {
        &self.succs
    }

    /// True iff `other` is a recursive successor of this instruction,
    /// i.e. some dependence path leads from here to `other`
    #[inline]
    pub fn reaches(&self, other: InstId) -> bool {
        self.rec_succs.contains(other.index())
    }

    /// True iff `other` is a recursive predecessor of this instruction
    #[inline]
    pub fn reached_by(&self, other: InstId) -> bool {
        self.rec_preds.contains(other.index())
    }

    /// Recursive predecessors, in id order
    pub fn recursive_preds(&self) -> impl Iterator<Item = InstId> + '_ {
        self.rec_preds.ones().map(|i| InstId(i as u32))
    }

    /// Recursive successors, in id order
    pub fn recursive_succs(&self) -> impl Iterator<Item = InstId> + '_ {
        self.rec_succs.ones().map(|i| InstId(i as u32))
    }
}
