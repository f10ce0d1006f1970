pub use crate::heap::DegreeHeap;
pub use crate::segtree::SegTree;

pub use crate::heuristics::{degeneracy, extend, sqrt_degeneracy};
pub use crate::reduce::{fast_weak_reduce, forced_inclusion, weak_reduce};

pub use crate::pipeline::Pipeline;
pub use crate::reduced::ReducedGraph;
pub use crate::subgraph::InducedSubgraph;

pub use crate::{SolverConfig, VertexSet};

pub use plex_builder::prelude::*;
