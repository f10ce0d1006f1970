pub use crate::bitset::AdjacencyMatrix;
pub use crate::bitset::BitSet;

pub use crate::graph::CsrGraph;

pub use crate::input::load_graph;
pub use crate::input::EdgeList;

pub use crate::Error;
