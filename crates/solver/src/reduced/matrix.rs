//! Adjacency-matrix backend: bitset rows plus a triangle map keyed by the
//! ordered endpoint pair. Only used when the reduced graph is small enough
//! for dense rows to pay off.

use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};

use plex_builder::bitset::{AdjacencyMatrix, BitSet};
use plex_builder::graph::CsrGraph;

use super::SearchState;
use crate::VertexSet;

/// Triangle-map key: the edge `(u, v)` with `u < v`.
#[inline]
fn edge_key(u: u32, v: u32) -> (u32, u32) {
    if u < v {
        (u, v)
    } else {
        (v, u)
    }
}

pub struct MatrixReduced {
    pub(crate) state: SearchState,
    pub(crate) matrix: AdjacencyMatrix,
    /// `t(u, v)` keyed by `(min, max)`; entries of dead edges go stale and
    /// are never read again, the rows are the source of liveness truth.
    triangles: FxHashMap<(u32, u32), u32>,
    /// Sticky queue flags, like the list backend's per-record flags.
    edge_queued: FxHashSet<(u32, u32)>,
}

impl MatrixReduced {
    pub(crate) fn from_csr(g: &CsrGraph, must: &VertexSet, k: u32) -> Self {
        let n = g.node_count() as usize;
        let mut matrix = AdjacencyMatrix::new(n);
        for u in 0..g.node_count() {
            for &v in g.neighbors(u) {
                if u < v {
                    matrix.add_edge(u as usize, v as usize);
                }
            }
        }
        Self {
            state: SearchState::new(g, must, k),
            matrix,
            triangles: FxHashMap::default(),
            edge_queued: FxHashSet::default(),
        }
    }

    pub(crate) fn triangle_count(&self, u: u32, v: u32) -> Option<u32> {
        if !self.state.active.test(u as usize) || !self.matrix.has_edge(u as usize, v as usize) {
            return None;
        }
        self.triangles.get(&edge_key(u, v)).copied()
    }

    /// `t(u, v)` by bitset-AND-popcount, once per undirected edge.
    pub(crate) fn init_triangles(&mut self) {
        for u in 0..self.matrix.node_count() {
            for v in self.matrix.row(u).iter() {
                if v >= u {
                    break;
                }
                let count = self.matrix.row(u).intersect_count(self.matrix.row(v));
                self.triangles.insert((v as u32, u as u32), count as u32);
            }
        }
    }

    pub(crate) fn ctcp(&mut self, lb: u32, excluded: Option<u32>) {
        let k = self.state.k;
        // edges travel as (u, v) with u < v
        let mut edge_queue: VecDeque<(u32, u32)> = VecDeque::new();
        let mut vertex_queue: VecDeque<u32> = VecDeque::new();

        match excluded {
            None => {
                for u in 0..self.matrix.node_count() {
                    if !self.state.active.test(u) {
                        continue;
                    }
                    for v in self.matrix.row(u).iter() {
                        if v >= u {
                            break;
                        }
                        let key = (v as u32, u as u32);
                        if self.triangles[&key] + 2 * k <= lb && self.edge_queued.insert(key) {
                            edge_queue.push_back(key);
                        }
                    }
                    if self.state.degrees[u] + k <= lb {
                        vertex_queue.push_back(u as u32);
                        self.state.vertex_queued[u] = true;
                    }
                }
            }
            Some(v) => {
                debug_assert!(self.state.active.test(v as usize));
                vertex_queue.push_back(v);
                self.state.vertex_queued[v as usize] = true;
            }
        }

        while !edge_queue.is_empty() || !vertex_queue.is_empty() {
            while let Some((u, v)) = edge_queue.pop_front() {
                self.remove_edge(u, v, lb, &mut edge_queue, &mut vertex_queue);
            }
            if let Some(u) = vertex_queue.pop_front() {
                self.remove_vertex(u, lb, &mut edge_queue, &mut vertex_queue);
            }
        }
    }

    fn queue_decrement(
        &mut self,
        a: u32,
        w: u32,
        lb: u32,
        edge_queue: &mut VecDeque<(u32, u32)>,
    ) {
        let k = self.state.k;
        let key = edge_key(a, w);
        if self.edge_queued.contains(&key) {
            return;
        }
        let count = self
            .triangles
            .get_mut(&key)
            .expect("live edge must have a triangle count");
        *count -= 1;
        if *count + 2 * k <= lb {
            self.edge_queued.insert(key);
            edge_queue.push_back(key);
        }
    }

    fn remove_edge(
        &mut self,
        u: u32,
        v: u32,
        lb: u32,
        edge_queue: &mut VecDeque<(u32, u32)>,
        vertex_queue: &mut VecDeque<u32>,
    ) {
        let k = self.state.k;
        debug_assert!(u < v);
        debug_assert!(self.matrix.has_edge(u as usize, v as usize));
        self.matrix.remove_edge(u as usize, v as usize);

        for x in [u, v] {
            self.state.degrees[x as usize] -= 1;
            let d = self.state.degrees[x as usize];
            self.state.heap.decrease(x, d);
            if d + k <= lb && !self.state.vertex_queued[x as usize] {
                vertex_queue.push_back(x);
                self.state.vertex_queued[x as usize] = true;
            }
        }

        let mut common = self.matrix.row(u as usize).clone();
        common &= self.matrix.row(v as usize);
        for w in common.iter() {
            if self.state.vertex_queued[w] {
                continue;
            }
            self.queue_decrement(u, w as u32, lb, edge_queue);
            self.queue_decrement(v, w as u32, lb, edge_queue);
        }
    }

    fn remove_vertex(
        &mut self,
        u: u32,
        lb: u32,
        edge_queue: &mut VecDeque<(u32, u32)>,
        vertex_queue: &mut VecDeque<u32>,
    ) {
        let k = self.state.k;
        let row = self.matrix.row(u as usize).clone();

        for v in row.iter() {
            if self.state.vertex_queued[v] {
                continue;
            }
            if self.edge_queued.contains(&edge_key(u, v as u32)) {
                continue;
            }
            self.state.degrees[v] -= 1;
            let d = self.state.degrees[v];
            self.state.heap.decrease(v as u32, d);
            if d + k <= lb {
                vertex_queue.push_back(v as u32);
                self.state.vertex_queued[v] = true;
            }
            self.matrix.row_mut(v).reset(u as usize);
        }

        for v in row.iter() {
            if self.state.vertex_queued[v] {
                continue;
            }
            if self.edge_queued.contains(&edge_key(u, v as u32)) {
                continue;
            }
            for w in row.iter() {
                if w == v {
                    break;
                }
                if self.state.vertex_queued[w] {
                    continue;
                }
                if self.edge_queued.contains(&edge_key(u, w as u32)) {
                    continue;
                }
                if !self.matrix.has_edge(v, w) {
                    continue;
                }
                // w < v by iteration order
                self.queue_decrement(w as u32, v as u32, lb, edge_queue);
            }
        }

        self.state.active.reset(u as usize);
        self.matrix.row_mut(u as usize).clear();
        self.state.heap.delete(u);
    }

    pub(crate) fn induce_two_hop(&self, v: u32) -> BitSet {
        debug_assert!(self.state.active.test(v as usize));
        let mut mask = BitSet::new(self.matrix.node_count());
        for u in self.matrix.row(v as usize).iter() {
            debug_assert!(self.state.active.test(u));
            mask.set(u);
            mask |= self.matrix.row(u);
        }
        mask
    }
}
