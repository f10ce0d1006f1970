use log::debug;

/// A Compressed-Sparse-Row representation of a simple undirected graph.
///
/// The data structure is composed of two arrays: `offsets` and `targets`. For
/// a graph with node count `n` and `m` directed records, `offsets` has exactly
/// `n + 1` and `targets` exactly `m` entries. The neighbor list of a node `u`
/// is the sorted slice `&targets[offsets[u]..offsets[u + 1]]`; every
/// undirected edge appears as two directed records.
///
/// Vertex ids are always a contiguous `[0, n)` range. [`CsrGraph::compact`]
/// renumbers survivors and composes `original_ids`, so `original_id(u)`
/// recovers the input-space label of `u` across any number of reductions.
#[derive(Debug, Clone)]
pub struct CsrGraph {
    offsets: Box<[usize]>,
    targets: Box<[u32]>,
    degrees: Box<[u32]>,
    original_ids: Box<[u32]>,
}

impl CsrGraph {
    /// Builds a graph from undirected edge pairs.
    ///
    /// Self-loops are dropped; duplicates are merged; each surviving edge is
    /// mirrored into two directed records sorted per source.
    pub fn from_edges(node_count: u32, edges: Vec<(u32, u32)>) -> Self {
        let mut directed = Vec::with_capacity(edges.len() * 2);
        for (a, b) in edges {
            debug_assert!(a < node_count && b < node_count);
            if a == b {
                continue;
            }
            directed.push((a, b));
            directed.push((b, a));
        }
        directed.sort_unstable();
        directed.dedup();

        let n = node_count as usize;
        let mut degrees = vec![0u32; n];
        for &(source, _) in &directed {
            degrees[source as usize] += 1;
        }
        let offsets = prefix_sum(&degrees);
        let targets = directed.into_iter().map(|(_, t)| t).collect::<Vec<_>>();

        Self {
            offsets: offsets.into_boxed_slice(),
            targets: targets.into_boxed_slice(),
            degrees: degrees.into_boxed_slice(),
            original_ids: (0..node_count).collect(),
        }
    }

    /// Builds a graph from a raw CSR body of per-node degrees and targets.
    ///
    /// Neighbor lists are sorted on the way in so that `has_edge` can binary
    /// search; the caller guarantees the body describes a symmetric simple
    /// graph.
    pub fn from_csr_parts(degrees: Vec<u32>, targets: Vec<u32>) -> Self {
        let offsets = prefix_sum(&degrees);
        let mut targets = targets;
        for u in 0..degrees.len() {
            targets[offsets[u]..offsets[u + 1]].sort_unstable();
        }
        Self {
            offsets: offsets.into_boxed_slice(),
            targets: targets.into_boxed_slice(),
            original_ids: (0..degrees.len() as u32).collect(),
            degrees: degrees.into_boxed_slice(),
        }
    }

    pub fn node_count(&self) -> u32 {
        self.degrees.len() as u32
    }

    /// The number of directed records, i.e. twice the undirected edge count.
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn degree(&self, u: u32) -> u32 {
        self.degrees[u as usize]
    }

    pub fn degrees(&self) -> &[u32] {
        &self.degrees
    }

    #[inline]
    pub fn neighbors(&self, u: u32) -> &[u32] {
        &self.targets[self.offsets[u as usize]..self.offsets[u as usize + 1]]
    }

    /// Whether `(u, v) ∈ E`, by binary search in `u`'s neighbor list.
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    /// The input-space label of the current vertex `u`.
    #[inline]
    pub fn original_id(&self, u: u32) -> u32 {
        self.original_ids[u as usize]
    }

    pub fn original_ids(&self) -> &[u32] {
        &self.original_ids
    }

    /// Rebuilds the graph on the vertices with `removed[v] == false`.
    ///
    /// Survivors are renumbered to a contiguous `[0, n')` range and
    /// `original_ids` is composed with the survivor map. The old buffers are
    /// swapped out wholesale; the graph is never observable mid-rebuild.
    pub fn compact(&mut self, removed: &[bool]) {
        let n = self.degrees.len();
        debug_assert_eq!(removed.len(), n);

        let mut new_ids = vec![u32::MAX; n];
        let mut new_original = Vec::new();
        for v in 0..n {
            if !removed[v] {
                new_ids[v] = new_original.len() as u32;
                new_original.push(self.original_ids[v]);
            }
        }
        let new_n = new_original.len();

        let mut new_offsets = Vec::with_capacity(new_n + 1);
        let mut new_targets = Vec::new();
        let mut new_degrees = Vec::with_capacity(new_n);
        new_offsets.push(0);
        for v in 0..n {
            if removed[v] {
                continue;
            }
            let start = new_targets.len();
            for &w in &self.targets[self.offsets[v]..self.offsets[v + 1]] {
                if !removed[w as usize] {
                    new_targets.push(new_ids[w as usize]);
                }
            }
            new_degrees.push((new_targets.len() - start) as u32);
            new_offsets.push(new_targets.len());
        }

        self.offsets = new_offsets.into_boxed_slice();
        self.targets = new_targets.into_boxed_slice();
        self.degrees = new_degrees.into_boxed_slice();
        self.original_ids = new_original.into_boxed_slice();

        debug!(
            "compacted graph to n = {}, m = {}",
            new_n,
            self.targets.len()
        );
    }

    /// Whether `members` (current vertex ids) forms a k-plex of this graph.
    pub fn is_plex(&self, k: u32, members: &[u32]) -> bool {
        let size = members.len() as u32;
        members.iter().all(|&u| {
            let inside = members.iter().filter(|&&v| self.has_edge(u, v)).count() as u32;
            inside + k >= size
        })
    }
}

fn prefix_sum(degrees: &[u32]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(degrees.len() + 1);
    let mut total = 0usize;
    offsets.push(0);
    for &d in degrees {
        total += d as usize;
        offsets.push(total);
    }
    offsets
}
