//! Graph transformations applied before the schedule search
//!
//! Each transformation implements the [`GraphTransform`] trait and mutates a
//! dependence graph in place, adding redundant ordering edges that shrink the
//! legal-schedule search space without excluding any optimal schedule. The
//! scheduler runs transformations once, pre-search, while it holds exclusive
//! ownership of the graph.

mod node_superiority;

pub use node_superiority::StaticNodeSupTrans;

use crate::error::GraphError;
use crate::graph::DependenceGraph;

/// A graph transformation pass
pub trait GraphTransform {
    /// Name of this transformation (for diagnostics)
    fn name(&self) -> &str;

    /// Run the transformation, mutating the graph in place
    ///
    /// Finding nothing to change is a normal outcome, not an error.
    fn apply(&mut self, graph: &mut DependenceGraph) -> Result<(), GraphError>;
}
