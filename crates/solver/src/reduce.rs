//! Vertex reductions on the preprocessing graph: degree peeling and forced
//! inclusion.

use std::collections::VecDeque;

use log::debug;

use plex_builder::graph::CsrGraph;

use crate::VertexSet;

/// Removes every vertex that cannot be in a k-plex larger than `lb`.
///
/// A vertex `v` with `d(v) + k <= lb` misses more than `k` connections even
/// if all its neighbors joined, so it is peeled; removals cascade through the
/// neighbors' degrees until the queue drains, then the graph is compacted.
/// O(n + m).
pub fn weak_reduce(g: &mut CsrGraph, k: u32, lb: u32) {
    let n = g.node_count() as usize;
    if n == 0 {
        return;
    }

    let mut degrees = g.degrees().to_vec();
    let mut removed = vec![false; n];
    let mut queue = VecDeque::new();
    for v in 0..n {
        if degrees[v] + k <= lb {
            removed[v] = true;
            queue.push_back(v as u32);
        }
    }
    if queue.is_empty() {
        return;
    }

    while let Some(u) = queue.pop_front() {
        for &v in g.neighbors(u) {
            if removed[v as usize] {
                continue;
            }
            degrees[v as usize] -= 1;
            if degrees[v as usize] + k <= lb {
                removed[v as usize] = true;
                queue.push_back(v);
            }
        }
    }

    g.compact(&removed);
    debug!("weak reduce at lb = {}: n = {}", lb, g.node_count());
}

/// One-pass variant of [`weak_reduce`] that skips the cascade.
///
/// Only sound when the caller knows no cascade can fire, i.e. removing the
/// initially under-threshold vertices cannot push a survivor under the
/// threshold; the debug build asserts that this held.
pub fn fast_weak_reduce(g: &mut CsrGraph, k: u32, lb: u32) {
    let n = g.node_count() as usize;
    if n == 0 {
        return;
    }

    let mut removed = vec![false; n];
    let mut hit = false;
    for v in 0..n {
        if g.degree(v as u32) + k <= lb {
            removed[v] = true;
            hit = true;
        }
    }
    if !hit {
        return;
    }

    g.compact(&removed);
    debug_assert!(
        g.degrees().iter().all(|&d| d + k > lb),
        "fast weak reduce requires that no cascade can fire"
    );
    debug!("fast weak reduce at lb = {}: n = {}", lb, g.node_count());
}

/// Extracts vertices that belong to every maximum k-plex.
///
/// Let `H = {v : d(v) + k >= n}`. A vertex `u` whose non-neighbors all lie in
/// `H` (that is, `d(u) + c(u) + 1 = n` with `c(u)` the count of `u`'s
/// non-neighbors inside `H`) cannot be excluded from any maximum k-plex: its
/// non-neighbors each tolerate the missing connection. Such vertices are
/// recorded in `must` (input-space labels) and removed; removals cascade at
/// the current `lb` like [`weak_reduce`], then the graph is compacted.
///
/// Returns the number of vertices forced.
pub fn forced_inclusion(g: &mut CsrGraph, k: u32, lb: u32, must: &mut VertexSet) -> usize {
    let n = g.node_count();
    if n == 0 {
        return 0;
    }

    let satisfied: Vec<u32> = (0..n).filter(|&v| g.degree(v) + k >= n).collect();
    let mut removed = vec![false; n as usize];
    let mut forced = 0;
    for &u in &satisfied {
        if g.degree(u) + 1 == n {
            must.insert(g.original_id(u));
            removed[u as usize] = true;
            forced += 1;
            continue;
        }
        let foreign = satisfied
            .iter()
            .filter(|&&v| v != u && !g.has_edge(u, v))
            .count() as u32;
        if g.degree(u) + foreign + 1 == n {
            must.insert(g.original_id(u));
            removed[u as usize] = true;
            forced += 1;
        }
    }
    if forced == 0 {
        return 0;
    }

    let mut degrees = g.degrees().to_vec();
    let mut queue: VecDeque<u32> = (0..n).filter(|&v| removed[v as usize]).collect();
    while let Some(u) = queue.pop_front() {
        for &v in g.neighbors(u) {
            if removed[v as usize] {
                continue;
            }
            degrees[v as usize] -= 1;
            if degrees[v as usize] + k <= lb {
                removed[v as usize] = true;
                queue.push_back(v);
            }
        }
    }

    g.compact(&removed);
    debug!(
        "forced inclusion: {} vertices pinned, n = {}",
        forced,
        g.node_count()
    );
    forced
}
