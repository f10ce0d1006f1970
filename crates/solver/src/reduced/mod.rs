//! The reduced graph handed to the exact search, with cascading
//! triangle/degree reduction.
//!
//! Two storage backends share one contract: an adjacency-list variant for
//! sparse graphs and an adjacency-matrix variant for small dense ones. The
//! backend is chosen once at construction and never mixed within a run.
//!
//! Both maintain, per live edge `(u, v)`, the triangle count
//! `t(u, v) = |N(u) ∩ N(v)|` over the surviving graph. Whenever the search
//! reports a better bound or excludes a seed, [`ReducedGraph::ctcp`] cascades
//! removals: a vertex dies when `d(u) + k <= lb`, an edge dies when
//! `t(u, v) + 2k <= lb`, and either event can push further candidates over
//! their threshold. At quiescence every survivor satisfies both bounds and
//! all triangle counts are exact.

mod list;
mod matrix;

pub use list::ListReduced;
pub use matrix::MatrixReduced;

use log::info;
use num_format::{Locale, ToFormattedString};

use plex_builder::bitset::BitSet;
use plex_builder::graph::CsrGraph;

use crate::heap::DegreeHeap;
use crate::subgraph::InducedSubgraph;
use crate::{SolverConfig, VertexSet};

/// State common to both backends.
pub(crate) struct SearchState {
    pub(crate) k: u32,
    pub(crate) active: BitSet,
    pub(crate) degrees: Vec<u32>,
    pub(crate) heap: DegreeHeap,
    /// Reduced id to input-space label.
    pub(crate) vertex_id: Vec<u32>,
    pub(crate) must_contain: Vec<u32>,
    /// Sticky "already queued for removal" flags; a set flag on a committed
    /// removal also marks the vertex as gone for later cascades.
    pub(crate) vertex_queued: Vec<bool>,
}

impl SearchState {
    fn new(g: &CsrGraph, must: &VertexSet, k: u32) -> Self {
        let n = g.node_count() as usize;
        let mut active = BitSet::new(n);
        active.flip_all();
        Self {
            k,
            active,
            degrees: g.degrees().to_vec(),
            heap: DegreeHeap::new(0, 0),
            vertex_id: g.original_ids().to_vec(),
            must_contain: must.iter().copied().collect(),
            vertex_queued: vec![false; n],
        }
    }

    fn init_heap(&mut self) {
        self.heap = DegreeHeap::with_keys(&self.degrees);
    }
}

/// The reduced graph in either backend.
pub enum ReducedGraph {
    List(ListReduced),
    Matrix(MatrixReduced),
}

impl ReducedGraph {
    /// Wraps the preprocessed graph, picking the backend by node count.
    pub fn from_csr(g: &CsrGraph, must: &VertexSet, cfg: &SolverConfig) -> Self {
        if g.node_count() <= cfg.matrix_max_nodes {
            ReducedGraph::Matrix(MatrixReduced::from_csr(g, must, cfg.k))
        } else {
            ReducedGraph::List(ListReduced::from_csr(g, must, cfg.k))
        }
    }

    fn state(&self) -> &SearchState {
        match self {
            ReducedGraph::List(g) => &g.state,
            ReducedGraph::Matrix(g) => &g.state,
        }
    }

    fn state_mut(&mut self) -> &mut SearchState {
        match self {
            ReducedGraph::List(g) => &mut g.state,
            ReducedGraph::Matrix(g) => &mut g.state,
        }
    }

    /// Computes the triangle counts and builds the degree heap. Must run once
    /// before the first [`ReducedGraph::ctcp`] call.
    pub fn init_before_search(&mut self) {
        match self {
            ReducedGraph::List(g) => g.init_triangles(),
            ReducedGraph::Matrix(g) => g.init_triangles(),
        }
        self.state_mut().init_heap();
        info!(
            "search graph ready: n = {}, m = {}",
            self.node_count().to_formatted_string(&Locale::en),
            self.edge_count().to_formatted_string(&Locale::en)
        );
    }

    /// The cascading reduction. `excluded = None` means the bound grew and
    /// every vertex and edge must be re-checked; `excluded = Some(v)` removes
    /// the finished seed `v` and lets the cascade run from there.
    pub fn ctcp(&mut self, lb: u32, excluded: Option<u32>) {
        match self {
            ReducedGraph::List(g) => g.ctcp(lb, excluded),
            ReducedGraph::Matrix(g) => g.ctcp(lb, excluded),
        }
    }

    /// Removes a finished seed and, when the bound moved, re-checks the rest.
    pub fn exclude(&mut self, v: u32, lb: u32, lb_changed: bool) {
        self.ctcp(lb, Some(v));
        if lb_changed {
            self.ctcp(lb, None);
        }
    }

    /// The live vertices of the seed's 2-hop neighborhood.
    pub fn induce_two_hop(&self, v: u32) -> BitSet {
        match self {
            ReducedGraph::List(g) => g.induce_two_hop(v),
            ReducedGraph::Matrix(g) => g.induce_two_hop(v),
        }
    }

    /// Materializes the dense subgraph on `mask`, numbered `0..|mask|`.
    pub fn induced_subgraph(&self, mask: &BitSet) -> InducedSubgraph {
        match self {
            ReducedGraph::List(g) => InducedSubgraph::from_list(g, mask),
            ReducedGraph::Matrix(g) => InducedSubgraph::from_matrix(g, mask),
        }
    }

    /// The next seed: a live vertex of minimum degree, most recently touched
    /// on ties.
    pub fn min_degree_vertex(&mut self) -> Option<u32> {
        let state = self.state_mut();
        if state.heap.is_empty() {
            None
        } else {
            Some(state.heap.min_node())
        }
    }

    /// Translates a solution over `subgraph` ids back to input-space labels
    /// and attaches the forced vertices.
    pub fn resolve(&self, solution: &VertexSet, subgraph: &InducedSubgraph) -> VertexSet {
        let state = self.state();
        let mut out: VertexSet = solution
            .iter()
            .map(|&s| state.vertex_id[subgraph.vertex_ids()[s as usize] as usize])
            .collect();
        out.extend(state.must_contain.iter().copied());
        out
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, ReducedGraph::Matrix(_))
    }

    /// The number of live vertices.
    pub fn node_count(&self) -> usize {
        self.state().active.cardinality()
    }

    /// The number of live undirected edges.
    pub fn edge_count(&self) -> usize {
        let state = self.state();
        let total: u64 = state
            .active
            .iter()
            .map(|v| state.degrees[v] as u64)
            .sum();
        (total / 2) as usize
    }

    pub fn is_active(&self, v: u32) -> bool {
        self.state().active.test(v as usize)
    }

    pub fn active(&self) -> &BitSet {
        &self.state().active
    }

    pub fn degree(&self, v: u32) -> u32 {
        self.state().degrees[v as usize]
    }

    /// The input-space label of the reduced vertex `v`.
    pub fn vertex_label(&self, v: u32) -> u32 {
        self.state().vertex_id[v as usize]
    }

    pub fn must_contain(&self) -> &[u32] {
        &self.state().must_contain
    }

    /// The maintained triangle count of a live edge, or `None` if `(u, v)`
    /// is not a live edge.
    pub fn triangle_count(&self, u: u32, v: u32) -> Option<u32> {
        match self {
            ReducedGraph::List(g) => g.triangle_count(u, v),
            ReducedGraph::Matrix(g) => g.triangle_count(u, v),
        }
    }

    /// Whether `(u, v)` is a live edge.
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        match self {
            ReducedGraph::List(g) => g.has_live_edge(u, v),
            ReducedGraph::Matrix(g) => g.matrix.has_edge(u as usize, v as usize),
        }
    }
}
