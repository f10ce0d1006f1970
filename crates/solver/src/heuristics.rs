//! Heuristic lower bounds: degeneracy peeling, capped-BFS subgraph
//! degeneracy, and strong extension from a seed.
//!
//! Every heuristic records the best plex it finds into a shared solution set
//! in input-space labels (translating through the graph's `original_ids`) and
//! unions in the vertices already proved to be in every maximum plex.

use std::collections::VecDeque;
use std::time::Instant;

use log::debug;

use plex_builder::graph::CsrGraph;

use crate::heap::DegreeHeap;
use crate::segtree::SegTree;
use crate::{SolverConfig, VertexSet};

/// Replaces `best` when `members` (current-graph ids) plus the forced
/// vertices beat it.
fn record_best<I>(g: &CsrGraph, members: I, size: usize, best: &mut VertexSet, must: &VertexSet)
where
    I: IntoIterator<Item = u32>,
{
    if size + must.len() <= best.len() {
        return;
    }
    best.clear();
    best.extend(members.into_iter().map(|v| g.original_id(v)));
    best.extend(must.iter().copied());
}

/// Degeneracy peeling over the whole graph.
///
/// Pulls the minimum-degree vertex while `min_degree + k < |rest|`; the
/// residue is a valid k-plex of size `|rest|`. O(n + m).
pub fn degeneracy(g: &CsrGraph, k: u32, best: &mut VertexSet, must: &VertexSet) -> u32 {
    let n = g.node_count() as usize;
    if n == 0 {
        return 0;
    }
    let start = Instant::now();

    let mut heap = DegreeHeap::with_keys(g.degrees());
    let mut removed = vec![false; n];
    while !heap.is_empty() && heap.min_key() + k < heap.len() as u32 {
        let u = heap.min_node();
        heap.delete(u);
        removed[u as usize] = true;
        for &v in g.neighbors(u) {
            if !removed[v as usize] {
                let key = heap.key_of(v);
                heap.decrease(v, key - 1);
            }
        }
    }

    let mut plex = Vec::with_capacity(heap.len());
    while !heap.is_empty() {
        let u = heap.min_node();
        heap.delete(u);
        plex.push(u);
    }
    debug!("degeneracy residue {} in {:?}", plex.len(), start.elapsed());

    let size = plex.len();
    record_best(g, plex, size, best, must);
    size as u32
}

/// Subgraph degeneracy: peel BFS-grown subgraphs of about `√n` vertices.
///
/// Seeds are the `seed_count` highest-degree vertices plus vertex 0; each BFS
/// admits at most `bfs_child_cap` children per expansion and pads with the
/// lowest unvisited ids when it stalls. One extra run peels the naive prefix
/// subgraph on the first `√n + 1` vertices.
pub fn sqrt_degeneracy(
    g: &CsrGraph,
    cfg: &SolverConfig,
    best: &mut VertexSet,
    must: &VertexSet,
) -> u32 {
    let n = g.node_count();
    if n == 0 {
        return 0;
    }
    let start = Instant::now();

    let mut seeds: Vec<u32> = (0..n).collect();
    seeds.sort_unstable_by_key(|&v| std::cmp::Reverse(g.degree(v)));
    seeds.truncate(cfg.seed_count);
    if !seeds.contains(&0) {
        seeds.push(0);
    }

    let mut bound = 0;
    for seed in seeds {
        bound = bound.max(bfs_peel(g, cfg, seed, best, must));
    }
    bound = bound.max(prefix_peel(g, cfg.k, best, must));
    debug!("sqrt-subgraph bound {} in {:?}", bound, start.elapsed());
    bound
}

fn bfs_peel(
    g: &CsrGraph,
    cfg: &SolverConfig,
    start: u32,
    best: &mut VertexSet,
    must: &VertexSet,
) -> u32 {
    let n = g.node_count() as usize;
    let range = ((n as f64).sqrt() as usize).clamp(1, n);

    // local[v] != 0 means v is in the subgraph with local id local[v] - 1
    let mut local = vec![0u32; n];
    let mut ids = Vec::with_capacity(range);
    local[start as usize] = 1;
    ids.push(start);

    let mut queue = VecDeque::new();
    queue.push_back(start);
    while let Some(u) = queue.pop_front() {
        if ids.len() == range {
            break;
        }
        let mut budget = cfg.bfs_child_cap;
        for &v in g.neighbors(u) {
            if local[v as usize] != 0 {
                continue;
            }
            queue.push_back(v);
            local[v as usize] = ids.len() as u32 + 1;
            ids.push(v);
            budget -= 1;
            if ids.len() == range || budget == 0 {
                break;
            }
        }
    }
    for v in 0..n as u32 {
        if ids.len() == range {
            break;
        }
        if local[v as usize] == 0 {
            local[v as usize] = ids.len() as u32 + 1;
            ids.push(v);
        }
    }

    let neighbors: Vec<Vec<u32>> = ids
        .iter()
        .map(|&u| {
            g.neighbors(u)
                .iter()
                .filter(|&&v| local[v as usize] != 0)
                .map(|&v| local[v as usize] - 1)
                .collect()
        })
        .collect();

    peel_local(g, cfg.k, &neighbors, &ids, best, must)
}

fn prefix_peel(g: &CsrGraph, k: u32, best: &mut VertexSet, must: &VertexSet) -> u32 {
    let n = g.node_count() as usize;
    let range = ((n as f64).sqrt() as usize + 1).min(n);

    let ids: Vec<u32> = (0..range as u32).collect();
    let neighbors: Vec<Vec<u32>> = ids
        .iter()
        .map(|&u| {
            g.neighbors(u)
                .iter()
                .take_while(|&&v| (v as usize) < range)
                .copied()
                .collect()
        })
        .collect();

    peel_local(g, k, &neighbors, &ids, best, must)
}

/// Degeneracy peel of an induced subgraph given as local adjacency lists;
/// `ids` maps local ids back to the graph.
fn peel_local(
    g: &CsrGraph,
    k: u32,
    neighbors: &[Vec<u32>],
    ids: &[u32],
    best: &mut VertexSet,
    must: &VertexSet,
) -> u32 {
    let mut degrees: Vec<u32> = neighbors.iter().map(|list| list.len() as u32).collect();
    let mut heap = DegreeHeap::with_keys(&degrees);
    let mut removed = vec![false; neighbors.len()];

    while !heap.is_empty() && heap.min_key() + k < heap.len() as u32 {
        let u = heap.min_node();
        heap.delete(u);
        removed[u as usize] = true;
        for &v in &neighbors[u as usize] {
            if !removed[v as usize] {
                degrees[v as usize] -= 1;
                heap.decrease(v, degrees[v as usize]);
            }
        }
    }

    let size = heap.len();
    let survivors = (0..neighbors.len())
        .filter(|&i| !removed[i])
        .map(|i| ids[i]);
    record_best(g, survivors, size, best, must);
    size as u32
}

/// Strong extension: grow a maximal k-plex from `seed`.
///
/// Candidates are ranked by their edge count into the growing set via a
/// [`SegTree`]; a candidate is admitted unless it is a non-neighbor of some
/// member that already sits at its minimum degree. Stops as soon as even the
/// best-connected candidate could not satisfy the plex bound.
pub fn extend(g: &CsrGraph, k: u32, seed: u32, best: &mut VertexSet, must: &VertexSet) -> u32 {
    let n = g.node_count() as usize;
    if n == 0 {
        return 0;
    }
    debug_assert!((seed as usize) < n);

    let mut tree = SegTree::full(n);
    let mut removed = vec![false; n];
    // edges into the current set, tracked for members only
    let mut links = vec![0u32; n];
    let mut members = vec![seed];

    tree.remove(seed);
    removed[seed as usize] = true;
    for &v in g.neighbors(seed) {
        tree.increment(v);
    }

    for _ in 1..n {
        let (v, weight) = match (tree.top(), tree.top_weight()) {
            (Some(v), Some(weight)) => (v, weight),
            _ => break,
        };
        tree.remove(v);
        removed[v as usize] = true;
        if weight + k < members.len() as u32 + 1 {
            break;
        }

        // v may only join if every saturated member is a neighbor
        if members.len() as u32 >= k {
            let blocked = members.iter().any(|&w| {
                !g.has_edge(v, w) && links[w as usize] + k == members.len() as u32
            });
            if blocked {
                continue;
            }
        }

        for &w in &members {
            if g.has_edge(v, w) {
                links[w as usize] += 1;
            }
        }
        links[v as usize] = weight;
        members.push(v);
        for &w in g.neighbors(v) {
            if !removed[w as usize] {
                tree.increment(w);
            }
        }
    }

    let size = members.len();
    record_best(g, members, size, best, must);
    size as u32
}
