//! Preprocessing orchestration: heuristics, reductions, and the hand-off to
//! the exact search.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use log::info;
use num_format::{Locale, ToFormattedString};

use plex_builder::graph::CsrGraph;
use plex_builder::Error;

use crate::heuristics::{degeneracy, extend, sqrt_degeneracy};
use crate::reduce::{forced_inclusion, weak_reduce};
use crate::reduced::ReducedGraph;
use crate::{SolverConfig, VertexSet};

/// The preprocessing pipeline: shrinks the input graph while raising the
/// lower bound, then hands the survivors to the exact search.
///
/// The bound `lb` always equals the size of `best`, the largest k-plex seen
/// so far (in input-space labels, forced vertices included), and never
/// decreases.
pub struct Pipeline {
    graph: CsrGraph,
    cfg: SolverConfig,
    best: VertexSet,
    must: VertexSet,
}

impl Pipeline {
    pub fn new(graph: CsrGraph, cfg: SolverConfig) -> Self {
        Self {
            graph,
            cfg,
            best: VertexSet::new(),
            must: VertexSet::new(),
        }
    }

    /// The current lower bound.
    pub fn lb(&self) -> u32 {
        self.best.len() as u32
    }

    /// The largest k-plex found so far, in input-space labels.
    pub fn best(&self) -> &VertexSet {
        &self.best
    }

    /// Vertices proved to be in every maximum k-plex, in input-space labels.
    pub fn must_contain(&self) -> &VertexSet {
        &self.must
    }

    /// The (progressively reduced) preprocessing graph.
    pub fn graph(&self) -> &CsrGraph {
        &self.graph
    }

    /// Runs all heuristic and reduction stages.
    ///
    /// Degeneracy establishes the first bound and the graph is peeled at it;
    /// the subgraph and strong-extension heuristics then raise the bound,
    /// re-peeling after every improvement; forced inclusion extracts the
    /// vertices no maximum plex can avoid and cascades; a final heuristic
    /// round runs on whatever survived.
    pub fn preprocess(&mut self) {
        let start = Instant::now();
        let k = self.cfg.k;

        degeneracy(&self.graph, k, &mut self.best, &self.must);
        let lb = self.lb();
        weak_reduce(&mut self.graph, k, lb);
        info!(
            "degeneracy: lb = {}, n = {}",
            self.lb(),
            self.graph.node_count().to_formatted_string(&Locale::en)
        );

        self.heuristic_round();

        let lb = self.lb();
        let forced = forced_inclusion(&mut self.graph, k, lb, &mut self.must);
        if forced > 0 {
            // the survivors changed shape, so the heuristics get another shot
            self.heuristic_round();
        }

        info!(
            "preprocessing done: lb = {}, n = {}, m = {}, |must| = {} in {:?}",
            self.lb(),
            self.graph.node_count().to_formatted_string(&Locale::en),
            self.graph.edge_count().to_formatted_string(&Locale::en),
            self.must.len(),
            start.elapsed()
        );
    }

    /// One round of bound-raising heuristics, re-peeling on improvement.
    fn heuristic_round(&mut self) {
        let k = self.cfg.k;

        let mut lb = self.lb();
        sqrt_degeneracy(&self.graph, &self.cfg, &mut self.best, &self.must);
        if self.lb() > lb {
            let lb = self.lb();
            weak_reduce(&mut self.graph, k, lb);
        }

        lb = self.lb();
        let mut seeds: Vec<u32> = (0..self.graph.node_count()).collect();
        seeds.sort_unstable_by_key(|&v| std::cmp::Reverse(self.graph.degree(v)));
        seeds.truncate(self.cfg.seed_count);
        for seed in seeds {
            extend(&self.graph, k, seed, &mut self.best, &self.must);
        }
        if self.lb() > lb {
            let lb = self.lb();
            weak_reduce(&mut self.graph, k, lb);
        }
    }

    /// Finishes preprocessing: builds the search-side reduced graph with
    /// triangle counts and the degree heap initialized.
    ///
    /// Returns the reduced graph, the bound, and the incumbent solution.
    pub fn into_reduced(self) -> (ReducedGraph, u32, VertexSet) {
        let lb = self.lb();
        info!(
            "reduced graph: n = {}, m = {}, lb = {}",
            self.graph.node_count().to_formatted_string(&Locale::en),
            self.graph.edge_count().to_formatted_string(&Locale::en),
            lb
        );
        let mut reduced = ReducedGraph::from_csr(&self.graph, &self.must, &self.cfg);
        reduced.init_before_search();
        (reduced, lb, self.best)
    }

    /// Writes the reduced graph for offline inspection: `n m lb`, the
    /// directed edge records, a blank line, the input-space label of every
    /// vertex, a blank line, then the forced vertex count and members.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        let n = self.graph.node_count();
        writeln!(out, "{} {} {}", n, self.graph.edge_count(), self.lb())?;
        for u in 0..n {
            for &v in self.graph.neighbors(u) {
                writeln!(out, "{} {}", u, v)?;
            }
        }
        writeln!(out)?;
        for u in 0..n {
            writeln!(out, "{}", self.graph.original_id(u))?;
        }
        writeln!(out)?;
        writeln!(out, "{}", self.must.len())?;
        for v in &self.must {
            writeln!(out, "{}", v)?;
        }
        out.flush()?;
        Ok(())
    }
}
