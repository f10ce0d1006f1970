use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use plex::prelude::*;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn complete_graph(n: u32) -> CsrGraph {
    let mut edges = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            edges.push((a, b));
        }
    }
    CsrGraph::from_edges(n, edges)
}

fn random_graph(rng: &mut StdRng, n: u32, p: f64) -> CsrGraph {
    let mut edges = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            if rng.gen_bool(p) {
                edges.push((a, b));
            }
        }
    }
    CsrGraph::from_edges(n, edges)
}

/// Brute-force oracle: the maximum k-plex size and every optimal set.
fn max_plexes(g: &CsrGraph, k: u32) -> (u32, Vec<Vec<u32>>) {
    let n = g.node_count() as usize;
    assert!(n <= 20);
    let mut best = 0usize;
    let mut optima: Vec<Vec<u32>> = Vec::new();
    for mask in 0u32..1 << n {
        if (mask.count_ones() as usize) < best {
            continue;
        }
        let members: Vec<u32> = (0..n as u32).filter(|&v| mask >> v & 1 == 1).collect();
        if !g.is_plex(k, &members) {
            continue;
        }
        match members.len().cmp(&best) {
            std::cmp::Ordering::Greater => {
                best = members.len();
                optima = vec![members];
            }
            std::cmp::Ordering::Equal => optima.push(members),
            std::cmp::Ordering::Less => {}
        }
    }
    (best as u32, optima)
}

/// Checks the quiescence contract: degrees and triangle counts are exact
/// over the survivors and every survivor beats both bounds.
fn assert_quiescent(g: &ReducedGraph, k: u32, lb: u32) {
    let live: Vec<u32> = g.active().iter().map(|v| v as u32).collect();
    for &u in &live {
        let neighbors: Vec<u32> = live
            .iter()
            .copied()
            .filter(|&v| v != u && g.has_edge(u, v))
            .collect();
        assert_eq!(
            g.degree(u) as usize,
            neighbors.len(),
            "degree of {u} out of sync"
        );
        assert!(g.degree(u) + k > lb, "vertex {u} should have been removed");
        for &v in &neighbors {
            if v < u {
                continue;
            }
            let count = live
                .iter()
                .filter(|&&w| w != u && w != v && g.has_edge(u, w) && g.has_edge(v, w))
                .count() as u32;
            assert_eq!(
                g.triangle_count(u, v),
                Some(count),
                "triangle count of ({u}, {v}) out of sync"
            );
            assert_eq!(g.triangle_count(v, u), Some(count), "mirror disagrees");
            assert!(count + 2 * k > lb, "edge ({u}, {v}) should have been removed");
        }
    }
}

fn run_pipeline(g: &CsrGraph, k: u32) -> (ReducedGraph, u32, VertexSet, VertexSet) {
    init_logs();
    let mut pipeline = Pipeline::new(g.clone(), SolverConfig::new(k));
    pipeline.preprocess();
    let must = pipeline.must_contain().clone();
    let (reduced, lb, best) = pipeline.into_reduced();
    (reduced, lb, best, must)
}

#[test]
fn complete_graph_is_solved_by_preprocessing() {
    // K4, k = 1: the whole graph is the unique maximum plex
    let g = complete_graph(4);
    let (reduced, lb, best, _) = run_pipeline(&g, 1);
    assert_eq!(lb, 4);
    assert_eq!(best.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    assert_eq!(reduced.node_count(), 0);
}

#[test]
fn path_graph_bound_matches_brute_force() {
    // path 0-1-2-3-4, k = 2: three consecutive vertices are optimal
    let g = CsrGraph::from_edges(5, (1..5).map(|v| (v - 1, v)).collect());
    let (opt, _) = max_plexes(&g, 2);
    assert_eq!(opt, 3);

    let (_, lb, best, _) = run_pipeline(&g, 2);
    assert_eq!(lb, opt);
    assert!(g.is_plex(2, &best.iter().copied().collect::<Vec<_>>()));
}

#[test]
fn isolated_vertex_is_peeled() {
    // K5 plus the isolated vertex 5, k = 1
    let mut edges = Vec::new();
    for a in 0..5 {
        for b in a + 1..5 {
            edges.push((a, b));
        }
    }
    let g = CsrGraph::from_edges(6, edges);
    let (reduced, lb, best, _) = run_pipeline(&g, 1);
    assert_eq!(lb, 5);
    assert_eq!(best.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert_eq!(reduced.node_count(), 0);
}

#[test]
fn bowtie_pins_the_cut_vertex() {
    // two triangles sharing vertex 2, k = 2
    let g = CsrGraph::from_edges(5, vec![(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4)]);
    let (opt, optima) = max_plexes(&g, 2);
    assert_eq!(opt, 3);
    // vertex 2 is in every maximum plex, which licenses forced inclusion
    assert!(optima.iter().all(|s| s.contains(&2)));

    let (_, lb, best, must) = run_pipeline(&g, 2);
    assert_eq!(lb, opt);
    assert!(g.is_plex(2, &best.iter().copied().collect::<Vec<_>>()));
    for &v in &must {
        assert!(optima.iter().all(|s| s.contains(&v)));
    }
}

#[test]
fn near_clique_collapses_once_the_bound_is_proved() {
    // K6 minus the edge 0-1, k = 1: lb = 5 kills every degree-4 vertex
    let mut edges = Vec::new();
    for a in 0..6u32 {
        for b in a + 1..6 {
            if (a, b) != (0, 1) {
                edges.push((a, b));
            }
        }
    }
    let g = CsrGraph::from_edges(6, edges);
    let (reduced, lb, best, _) = run_pipeline(&g, 1);
    assert_eq!(lb, 5);
    assert_eq!(best.len(), 5);
    assert!(g.is_plex(1, &best.iter().copied().collect::<Vec<_>>()));
    assert_eq!(reduced.node_count(), 0);
}

#[test]
fn single_vertex_graph() {
    let g = CsrGraph::from_edges(1, vec![]);
    let (reduced, lb, best, _) = run_pipeline(&g, 3);
    assert_eq!(lb, 1);
    assert_eq!(best.iter().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(reduced.node_count(), 0);
}

#[test]
fn empty_graph() {
    let g = CsrGraph::from_edges(0, vec![]);
    let (reduced, lb, best, _) = run_pipeline(&g, 2);
    assert_eq!(lb, 0);
    assert!(best.is_empty());
    assert_eq!(reduced.node_count(), 0);
}

fn k6_minus_matching() -> CsrGraph {
    // non-edges: 0-3, 1-4, 2-5; d = 4 and t = 2 everywhere
    let mut edges = Vec::new();
    for a in 0..6u32 {
        for b in a + 1..6 {
            if b != a + 3 {
                edges.push((a, b));
            }
        }
    }
    CsrGraph::from_edges(6, edges)
}

fn reduced_for(g: &CsrGraph, k: u32, dense: bool) -> ReducedGraph {
    let mut cfg = SolverConfig::new(k);
    cfg.matrix_max_nodes = if dense { 4096 } else { 0 };
    let mut reduced = ReducedGraph::from_csr(g, &VertexSet::new(), &cfg);
    reduced.init_before_search();
    assert_eq!(reduced.is_matrix(), dense);
    reduced
}

#[test]
fn ctcp_tracks_triangles_after_an_exclusion() {
    let g = k6_minus_matching();
    for dense in [false, true] {
        let mut reduced = reduced_for(&g, 2, dense);
        assert_eq!(reduced.node_count(), 6);
        assert_eq!(reduced.edge_count(), 12);
        assert_eq!(reduced.triangle_count(0, 1), Some(2));

        // lb = 3 removes nothing on its own
        reduced.ctcp(3, None);
        assert_quiescent(&reduced, 2, 3);
        assert_eq!(reduced.node_count(), 6);

        // excluding 0 drops each incident triangle once
        reduced.exclude(0, 3, false);
        assert!(!reduced.is_active(0));
        assert_eq!(reduced.node_count(), 5);
        assert_eq!(reduced.triangle_count(1, 2), Some(1));
        assert_eq!(reduced.triangle_count(1, 3), Some(2));
        assert_quiescent(&reduced, 2, 3);

        // raising the bound to 5 collapses the rest
        reduced.ctcp(5, None);
        assert_eq!(reduced.node_count(), 0);
    }
}

#[test]
fn two_hop_induction_matches_live_edges() {
    let g = k6_minus_matching();
    for dense in [false, true] {
        let reduced = reduced_for(&g, 2, dense);
        let seed = 0u32;
        let mut mask = reduced.induce_two_hop(seed);
        mask.set(seed as usize);
        // the graph is a 2-hop ball around any vertex
        assert_eq!(mask.cardinality(), 6);

        let sub = reduced.induced_subgraph(&mask);
        assert_eq!(sub.node_count(), 6);
        let ids = sub.vertex_ids().to_vec();
        for a in 0..sub.node_count() as u32 {
            for b in 0..sub.node_count() as u32 {
                if a == b {
                    continue;
                }
                assert_eq!(
                    sub.has_edge(a, b),
                    reduced.has_edge(ids[a as usize], ids[b as usize])
                );
            }
        }

        // a subgraph solution resolves to input labels
        let local: VertexSet = [0u32, 1, 2].into_iter().collect();
        let resolved = reduced.resolve(&local, &sub);
        assert_eq!(resolved.len(), 3);
    }
}

#[test]
fn list_and_matrix_backends_agree() {
    let mut rng = StdRng::seed_from_u64(0xbeef);
    for _ in 0..10 {
        let n = rng.gen_range(8..=14);
        let g = random_graph(&mut rng, n, 0.45);
        for k in 1..=2u32 {
            let mut sparse = reduced_for(&g, k, false);
            let mut dense = reduced_for(&g, k, true);
            for lb in k..=(k + 4) {
                sparse.ctcp(lb, None);
                dense.ctcp(lb, None);
                assert_eq!(sparse.node_count(), dense.node_count());
                for u in 0..n {
                    assert_eq!(sparse.is_active(u), dense.is_active(u));
                    if !sparse.is_active(u) {
                        continue;
                    }
                    assert_eq!(sparse.degree(u), dense.degree(u));
                    for v in u + 1..n {
                        assert_eq!(sparse.triangle_count(u, v), dense.triangle_count(u, v));
                    }
                }
            }
        }
    }
}

#[test]
fn exclusion_loop_preserves_invariants() {
    let mut rng = StdRng::seed_from_u64(0xf00d);
    for trial in 0..12 {
        let n = rng.gen_range(8..=14);
        let g = random_graph(&mut rng, n, 0.4);
        let k = 1 + (trial % 2) as u32;

        let mut reduced = reduced_for(&g, k, trial % 2 == 0);
        let lb = k;
        reduced.ctcp(lb, None);
        assert_quiescent(&reduced, k, lb);

        while let Some(seed) = reduced.min_degree_vertex() {
            let mut mask = reduced.induce_two_hop(seed);
            mask.set(seed as usize);
            let sub = reduced.induced_subgraph(&mask);
            assert!(sub.node_count() >= 1);

            reduced.exclude(seed, lb, false);
            assert!(!reduced.is_active(seed));
            assert_quiescent(&reduced, k, lb);
        }
        assert_eq!(reduced.node_count(), 0);
    }
}

#[test]
fn random_graphs_respect_the_brute_force_oracle() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..40 {
        let n = rng.gen_range(4..=11);
        let p = rng.gen_range(0.2..0.8);
        let g = random_graph(&mut rng, n, p);
        for k in 1..=3u32 {
            let (opt, optima) = max_plexes(&g, k);
            let (mut reduced, lb, best, must) = run_pipeline(&g, k);

            assert!(lb <= opt, "lb {lb} exceeds the true optimum {opt}");
            assert_eq!(best.len() as u32, lb);
            assert!(
                g.is_plex(k, &best.iter().copied().collect::<Vec<_>>()),
                "reported solution is not a valid {k}-plex"
            );
            for &v in &must {
                assert!(
                    optima.iter().all(|s| s.contains(&v)),
                    "forced vertex {v} misses a maximum plex"
                );
            }
            reduced.ctcp(lb, None);
            assert_quiescent(&reduced, k, lb);
        }
    }
}

#[test]
fn dump_round_trips_the_reduced_graph() {
    let g = CsrGraph::from_edges(5, vec![(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4)]);
    let mut pipeline = Pipeline::new(g, SolverConfig::new(2));
    pipeline.preprocess();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reduced.dump");
    pipeline.dump(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    let header: Vec<usize> = lines
        .next()
        .unwrap()
        .split_whitespace()
        .map(|t| t.parse().unwrap())
        .collect();
    assert_eq!(header[0], pipeline.graph().node_count() as usize);
    assert_eq!(header[1], pipeline.graph().edge_count());
    assert_eq!(header[2], pipeline.lb() as usize);
    // edge records, a blank line, the id map, a blank line, the forced set
    let edge_lines = lines.by_ref().take_while(|l| !l.is_empty()).count();
    assert_eq!(edge_lines, header[1]);
    let id_lines = lines.by_ref().take_while(|l| !l.is_empty()).count();
    assert_eq!(id_lines, header[0]);
    let forced: usize = lines.next().unwrap().parse().unwrap();
    assert_eq!(lines.count(), forced);
}
