//! Pressure-aware instruction scheduling core
//!
//! Algorithmic support for a list scheduler that orders machine instructions
//! within a basic block, trading parallelism against register pressure:
//! - **Graph**: dependence-graph model with incrementally maintained
//!   transitive reachability (`graph` module)
//! - **Transform**: pre-search graph transformations that prune the
//!   legal-schedule search space (`transform` module)
//! - **ACO**: support structures for the ant-colony scheduling heuristic
//!   (`aco` module)
//!
//! The scheduler driver, heuristic scoring formulas, and machine-model
//! construction live outside this crate; it consumes a built dependence
//! graph and mutates it in place.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Dependence-graph model: instructions, registers, edges, reachability
pub mod graph;

/// Graph transformations applied before the schedule search
pub mod transform;

/// Ant-colony scheduling support structures
pub mod aco;

/// Error types for graph mutation
pub mod error;

pub use aco::{AcoReadyList, ReadyListEntry};
pub use error::GraphError;
pub use graph::{DepKind, DependenceGraph, Edge, InstId, Instruction, IssueType, RegId, Register};
pub use transform::{GraphTransform, StaticNodeSupTrans};
