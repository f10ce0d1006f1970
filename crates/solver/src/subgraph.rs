//! The dense subgraph handed to the branch-and-bound search for one seed.

use plex_builder::bitset::{AdjacencyMatrix, BitSet};

use crate::reduced::{ListReduced, MatrixReduced};
use crate::VertexSet;

/// An adjacency-matrix subgraph induced on a vertex mask of the reduced
/// graph, with vertices renumbered to `0..n` and the inverse map kept.
pub struct InducedSubgraph {
    matrix: AdjacencyMatrix,
    /// Subgraph id to reduced-graph id, ascending.
    vertex_id: Vec<u32>,
}

impl InducedSubgraph {
    pub(crate) fn from_list(g: &ListReduced, mask: &BitSet) -> Self {
        let vertex_id: Vec<u32> = mask.iter().map(|v| v as u32).collect();
        let mut local = vec![0u32; mask.capacity()];
        for (id, &v) in vertex_id.iter().enumerate() {
            local[v as usize] = id as u32;
        }

        let mut matrix = AdjacencyMatrix::new(vertex_id.len());
        for &u in &vertex_id {
            for i in g.records(u) {
                if g.edge_removed[i] {
                    continue;
                }
                let v = g.targets[i];
                if v >= u {
                    break;
                }
                if mask.test(v as usize) {
                    matrix.add_edge(local[u as usize] as usize, local[v as usize] as usize);
                }
            }
        }
        Self { matrix, vertex_id }
    }

    pub(crate) fn from_matrix(g: &MatrixReduced, mask: &BitSet) -> Self {
        let vertex_id: Vec<u32> = mask.iter().map(|v| v as u32).collect();
        let mut local = vec![0u32; mask.capacity()];
        for (id, &v) in vertex_id.iter().enumerate() {
            local[v as usize] = id as u32;
        }

        let mut matrix = AdjacencyMatrix::new(vertex_id.len());
        for &u in &vertex_id {
            let mut row = g.matrix.row(u as usize).clone();
            row &= mask;
            for v in row.iter() {
                if v as u32 >= u {
                    break;
                }
                matrix.add_edge(local[u as usize] as usize, local[v] as usize);
            }
        }
        Self { matrix, vertex_id }
    }

    pub fn node_count(&self) -> usize {
        self.vertex_id.len()
    }

    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.matrix.has_edge(a as usize, b as usize)
    }

    /// The neighbor row of a subgraph vertex.
    pub fn row(&self, a: u32) -> &BitSet {
        self.matrix.row(a as usize)
    }

    /// Subgraph id to reduced-graph id.
    pub fn vertex_ids(&self) -> &[u32] {
        &self.vertex_id
    }

    /// Translates subgraph ids back to reduced-graph ids.
    pub fn original_vertices(&self, solution: &VertexSet) -> VertexSet {
        solution
            .iter()
            .map(|&s| self.vertex_id[s as usize])
            .collect()
    }
}
