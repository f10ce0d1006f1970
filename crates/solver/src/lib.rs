//! Reduction engine and heuristic lower bounds for the maximum k-plex
//! problem.
//!
//! A *k-plex* is a vertex set `S` in which every member has at least
//! `|S| - k` neighbors inside `S`. Finding a maximum k-plex is NP-hard; this
//! crate implements the preprocessing side of an exact solver: aggressive
//! graph reduction, heuristics that establish a strong lower bound `lb`, and
//! the bookkeeping an exact branch-and-bound search needs while it excludes
//! candidate seeds one by one.
//!
//! The entry point is [`pipeline::Pipeline`]:
//!
//! ```
//! use plex::prelude::*;
//!
//! // K4: the whole graph is a 1-plex
//! let graph = CsrGraph::from_edges(4, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
//! let mut pipeline = Pipeline::new(graph, SolverConfig::new(1));
//! pipeline.preprocess();
//!
//! assert_eq!(pipeline.lb(), 4);
//! assert_eq!(pipeline.best().iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
//!
//! let (reduced, lb, best) = pipeline.into_reduced();
//! assert_eq!(reduced.node_count(), 0); // nothing left for the exact search
//! assert_eq!(lb, 4);
//! assert_eq!(best.len(), 4);
//! ```
//!
//! After preprocessing, the surviving graph is handed to the search as a
//! [`reduced::ReducedGraph`]. The search repeatedly takes the minimum-degree
//! vertex as a seed, asks for the dense subgraph induced by the seed's 2-hop
//! neighborhood, and reports back either an improved bound or the exclusion
//! of the seed; both trigger the cascading triangle/degree reduction
//! ([`reduced::ReducedGraph::ctcp`]).

pub mod heap;
pub mod heuristics;
pub mod pipeline;
pub mod prelude;
pub mod reduce;
pub mod reduced;
pub mod segtree;
pub mod subgraph;

use std::collections::BTreeSet;

/// A set of vertices in input-space labels.
pub type VertexSet = BTreeSet<u32>;

/// Run-scoped solver parameters.
///
/// `k` is the plex tolerance; the remaining fields tune the heuristics and
/// the storage choice and keep their defaults unless measurement says
/// otherwise.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Plex tolerance, at least 1.
    pub k: u32,
    /// How many high-degree vertices seed the subgraph heuristic.
    pub seed_count: usize,
    /// Children admitted per expansion in the subgraph BFS.
    pub bfs_child_cap: usize,
    /// Largest node count for which the reduced graph uses the dense
    /// adjacency-matrix backend.
    pub matrix_max_nodes: u32,
}

impl SolverConfig {
    pub fn new(k: u32) -> Self {
        assert!(k >= 1, "plex tolerance k must be at least 1");
        Self {
            k,
            seed_count: 5,
            bfs_child_cap: 3,
            matrix_max_nodes: 4096,
        }
    }
}
