//! Adjacency-list backend: CSR records with per-directed-edge triangle
//! counts and removal flags.

use std::collections::VecDeque;
use std::ops::Range;

use plex_builder::bitset::BitSet;
use plex_builder::graph::CsrGraph;

use super::SearchState;
use crate::VertexSet;

pub struct ListReduced {
    pub(crate) state: SearchState,
    pub(crate) offsets: Vec<usize>,
    pub(crate) targets: Vec<u32>,
    /// `t(u, v)` per directed record; mirror records agree at quiescence.
    triangles: Vec<u32>,
    pub(crate) edge_removed: Vec<bool>,
    /// Sticky queue flags per directed record, same lifetime rules as
    /// `SearchState::vertex_queued`.
    edge_queued: Vec<bool>,
}

impl ListReduced {
    pub(crate) fn from_csr(g: &CsrGraph, must: &VertexSet, k: u32) -> Self {
        let m = g.edge_count();
        let mut offsets = Vec::with_capacity(g.node_count() as usize + 1);
        let mut targets = Vec::with_capacity(m);
        offsets.push(0);
        for u in 0..g.node_count() {
            targets.extend_from_slice(g.neighbors(u));
            offsets.push(targets.len());
        }
        Self {
            state: SearchState::new(g, must, k),
            offsets,
            targets,
            triangles: vec![0; m],
            edge_removed: vec![false; m],
            edge_queued: vec![false; m],
        }
    }

    pub(crate) fn records(&self, u: u32) -> Range<usize> {
        self.offsets[u as usize]..self.offsets[u as usize + 1]
    }

    /// The index of the directed record `u -> v`, which must exist.
    fn record_index(&self, u: u32, v: u32) -> usize {
        let range = self.records(u);
        let offset = self.targets[range.clone()]
            .binary_search(&v)
            .expect("mirror record must exist");
        range.start + offset
    }

    fn live_record(&self, u: u32, v: u32) -> Option<usize> {
        let range = self.records(u);
        self.targets[range.clone()]
            .binary_search(&v)
            .ok()
            .map(|offset| range.start + offset)
            .filter(|&i| !self.edge_removed[i])
    }

    pub(crate) fn has_live_edge(&self, u: u32, v: u32) -> bool {
        self.state.active.test(u as usize)
            && self.state.active.test(v as usize)
            && self.live_record(u, v).is_some()
    }

    pub(crate) fn triangle_count(&self, u: u32, v: u32) -> Option<u32> {
        if !self.state.active.test(u as usize) || !self.state.active.test(v as usize) {
            return None;
        }
        self.live_record(u, v).map(|i| self.triangles[i])
    }

    /// Computes `t(u, v)` for every record. Each undirected edge is counted
    /// once, from the endpoint with the smaller degree against a neighbor
    /// mask of the other, then mirrored.
    pub(crate) fn init_triangles(&mut self) {
        let n = self.state.degrees.len();
        let mut mask = BitSet::new(n);
        for u in 0..n as u32 {
            for i in self.records(u) {
                mask.set(self.targets[i] as usize);
            }
            for i in self.records(u) {
                let v = self.targets[i];
                if self.state.degrees[v as usize] > self.state.degrees[u as usize] {
                    continue;
                }
                let mut count = 0;
                for j in self.records(v) {
                    if mask.test(self.targets[j] as usize) {
                        count += 1;
                    }
                }
                self.triangles[i] = count;
            }
            for i in self.records(u) {
                mask.reset(self.targets[i] as usize);
            }
        }
        for u in 0..n as u32 {
            for i in self.records(u) {
                let v = self.targets[i];
                if self.state.degrees[v as usize] <= self.state.degrees[u as usize] {
                    continue;
                }
                self.triangles[i] = self.triangles[self.record_index(v, u)];
            }
        }
    }

    pub(crate) fn ctcp(&mut self, lb: u32, excluded: Option<u32>) {
        let k = self.state.k;
        // edges travel as (record index, source vertex)
        let mut edge_queue: VecDeque<(usize, u32)> = VecDeque::new();
        let mut vertex_queue: VecDeque<u32> = VecDeque::new();

        match excluded {
            None => {
                let n = self.state.degrees.len();
                for u in 0..n as u32 {
                    if !self.state.active.test(u as usize) {
                        continue;
                    }
                    for i in self.records(u) {
                        if self.edge_removed[i] {
                            continue;
                        }
                        let v = self.targets[i];
                        if !self.state.active.test(v as usize) {
                            continue;
                        }
                        if self.triangles[i] + 2 * k <= lb {
                            if u < v {
                                edge_queue.push_back((i, u));
                            }
                            self.edge_queued[i] = true;
                        }
                    }
                    if self.state.degrees[u as usize] + k <= lb {
                        vertex_queue.push_back(u);
                        self.state.vertex_queued[u as usize] = true;
                    }
                }
            }
            Some(v) => {
                debug_assert!(self.state.active.test(v as usize));
                vertex_queue.push_back(v);
                self.state.vertex_queued[v as usize] = true;
            }
        }

        // edge removals drain first: they can spawn vertex candidates, and a
        // vertex pop must only ever see flags of fully committed edges
        while !edge_queue.is_empty() || !vertex_queue.is_empty() {
            while let Some((record, u)) = edge_queue.pop_front() {
                self.remove_edge(record, u, lb, &mut edge_queue, &mut vertex_queue);
            }
            if let Some(u) = vertex_queue.pop_front() {
                self.remove_vertex(u, lb, &mut edge_queue, &mut vertex_queue);
            }
        }
    }

    fn remove_edge(
        &mut self,
        record: usize,
        u: u32,
        lb: u32,
        edge_queue: &mut VecDeque<(usize, u32)>,
        vertex_queue: &mut VecDeque<u32>,
    ) {
        let k = self.state.k;
        let v = self.targets[record];
        debug_assert!(!self.edge_removed[record]);
        self.edge_removed[record] = true;
        let mirror = self.record_index(v, u);
        debug_assert!(!self.edge_removed[mirror]);
        self.edge_removed[mirror] = true;

        for x in [u, v] {
            self.state.degrees[x as usize] -= 1;
            let d = self.state.degrees[x as usize];
            self.state.heap.decrease(x, d);
            if d + k <= lb && !self.state.vertex_queued[x as usize] {
                vertex_queue.push_back(x);
                self.state.vertex_queued[x as usize] = true;
            }
        }

        // every common neighbor w of u and v loses the triangle u-v-w; edges
        // already queued must not be decremented again
        let (mut a, a_end) = (self.offsets[u as usize], self.offsets[u as usize + 1]);
        let (mut b, b_end) = (self.offsets[v as usize], self.offsets[v as usize + 1]);
        while a < a_end && b < b_end {
            if self.edge_removed[a] || self.state.vertex_queued[self.targets[a] as usize] {
                a += 1;
                continue;
            }
            if self.edge_removed[b] || self.state.vertex_queued[self.targets[b] as usize] {
                b += 1;
                continue;
            }
            match self.targets[a].cmp(&self.targets[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    let w = self.targets[a];
                    if !self.edge_queued[a] {
                        let wu = self.record_index(w, u);
                        debug_assert!(!self.edge_queued[wu]);
                        self.triangles[a] -= 1;
                        self.triangles[wu] -= 1;
                        if self.triangles[a] + 2 * k <= lb {
                            self.edge_queued[a] = true;
                            self.edge_queued[wu] = true;
                            edge_queue.push_back((a, u));
                        }
                    }
                    if !self.edge_queued[b] {
                        let wv = self.record_index(w, v);
                        debug_assert!(!self.edge_queued[wv]);
                        self.triangles[b] -= 1;
                        self.triangles[wv] -= 1;
                        if self.triangles[b] + 2 * k <= lb {
                            self.edge_queued[b] = true;
                            self.edge_queued[wv] = true;
                            edge_queue.push_back((b, v));
                        }
                    }
                    a += 1;
                    b += 1;
                }
            }
        }
    }

    fn remove_vertex(
        &mut self,
        u: u32,
        lb: u32,
        edge_queue: &mut VecDeque<(usize, u32)>,
        vertex_queue: &mut VecDeque<u32>,
    ) {
        let k = self.state.k;

        for i in self.records(u) {
            if self.edge_queued[i] {
                continue;
            }
            let v = self.targets[i];
            if self.state.vertex_queued[v as usize] {
                continue;
            }
            self.state.degrees[v as usize] -= 1;
            let d = self.state.degrees[v as usize];
            self.state.heap.decrease(v, d);
            if d + k <= lb {
                vertex_queue.push_back(v);
                self.state.vertex_queued[v as usize] = true;
            }
        }

        // every live pair v, w of u's neighbors connected by an edge loses
        // the triangle u-v-w
        let range = self.records(u);
        for i in range.clone() {
            if self.edge_queued[i] {
                continue;
            }
            let v = self.targets[i];
            if self.state.vertex_queued[v as usize] {
                continue;
            }
            for j in i + 1..range.end {
                if self.edge_queued[j] {
                    continue;
                }
                let w = self.targets[j];
                if self.state.vertex_queued[w as usize] {
                    continue;
                }
                let Some(vw) = self.live_record(v, w) else {
                    continue;
                };
                if self.edge_queued[vw] {
                    continue;
                }
                let wv = self.record_index(w, v);
                debug_assert_eq!(self.triangles[vw], self.triangles[wv]);
                self.triangles[vw] -= 1;
                self.triangles[wv] -= 1;
                if self.triangles[vw] + 2 * k <= lb {
                    self.edge_queued[vw] = true;
                    self.edge_queued[wv] = true;
                    edge_queue.push_back((vw, v));
                }
            }
        }

        self.state.active.reset(u as usize);
        self.state.heap.delete(u);
    }

    pub(crate) fn induce_two_hop(&self, v: u32) -> BitSet {
        debug_assert!(self.state.active.test(v as usize));
        let mut mask = BitSet::new(self.state.degrees.len());
        for i in self.records(v) {
            if self.edge_removed[i] {
                continue;
            }
            let a = self.targets[i];
            if !self.state.active.test(a as usize) {
                continue;
            }
            mask.set(a as usize);
            for j in self.records(a) {
                if self.edge_removed[j] {
                    continue;
                }
                let b = self.targets[j];
                if self.state.active.test(b as usize) {
                    mask.set(b as usize);
                }
            }
        }
        mask
    }
}
