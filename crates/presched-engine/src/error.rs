//! Error types for dependence-graph mutation
//!
//! Graph construction is driven by an external scheduler; these errors cover
//! the mutations it can legitimately get wrong. Precondition violations that
//! no correct caller can hit (ready-list removal out of range) are asserts,
//! not errors.

use crate::graph::InstId;
use thiserror::Error;

/// Errors that can occur when mutating a dependence graph
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// Instruction id does not name a node in the graph
    #[error("instruction {0} is out of range")]
    InstOutOfRange(InstId),

    /// Adding the edge would make the graph cyclic
    #[error("edge {src} -> {dst} would create a cycle")]
    WouldCycle {
        /// Source of the rejected edge
        src: InstId,
        /// Target of the rejected edge
        dst: InstId,
    },
}
