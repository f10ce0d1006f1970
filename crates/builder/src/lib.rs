//! A building block for maximum k-plex search.
//!
//! The crate provides the storage layer the solver is built on: a dense
//! [`BitSet`](bitset::BitSet), a Compressed-Sparse-Row graph
//! ([`CsrGraph`](graph::CsrGraph)) over `u32` vertex ids, and loaders for the
//! common plain-text and binary graph formats.
//!
//! A graph is always simple and undirected: self-loops are dropped and every
//! undirected edge is stored as two sorted, deduplicated directed records.
//!
//! # How to build a graph
//!
//! Graphs can be created programmatically from an edge list:
//!
//! ```
//! use plex_builder::prelude::*;
//!
//! let graph = CsrGraph::from_edges(4, vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
//!
//! assert_eq!(graph.node_count(), 4);
//! assert_eq!(graph.edge_count(), 10); // directed records
//! assert_eq!(graph.degree(1), 3);
//! assert_eq!(graph.neighbors(1), &[0, 2, 3]);
//! assert!(graph.has_edge(2, 3));
//! ```
//!
//! or read from a file with [`input::load_graph`], which picks the parser from
//! the file suffix (`.mtx`, `.bin`, DIMACS `p edge` without a suffix, or a
//! plain `n m` edge list).
//!
//! # Compaction
//!
//! The solver repeatedly removes vertices and rebuilds the graph on the
//! survivors. [`CsrGraph::compact`] renumbers the surviving vertices to a
//! contiguous `[0, n')` range and composes the `original_ids` mapping so a
//! solution on any reduction level can be translated back to input labels:
//!
//! ```
//! use plex_builder::prelude::*;
//!
//! let mut graph = CsrGraph::from_edges(3, vec![(0, 1), (1, 2)]);
//! graph.compact(&[true, false, false]);
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.original_id(0), 1);
//! assert_eq!(graph.original_id(1), 2);
//! ```

pub mod bitset;
pub mod graph;
pub mod input;
pub mod prelude;

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported while loading a graph from a file.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error while loading graph")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("invalid header, expected `{expected}`")]
    InvalidHeader { expected: &'static str },
    #[error("line {line}: expected {expected}")]
    InvalidRecord { line: usize, expected: &'static str },
    #[error("line {line}: self-loop at node {node} is not allowed in this format")]
    SelfLoop { line: usize, node: u32 },
    #[error("node id {id} out of range, node count is {node_count}")]
    IdOutOfRange { id: u32, node_count: u32 },
    #[error("binary body mismatch: degrees sum to {degree_sum} but header announced {edge_count} records")]
    InvalidBinaryBody { degree_sum: u64, edge_count: u64 },
}
