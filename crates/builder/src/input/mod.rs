//! Loaders for the supported graph file formats.
//!
//! [`load_graph`] picks the parser from the file suffix, mirroring what the
//! formats themselves promise:
//!
//! - `.mtx` — Matrix-Market-style: `%` comment lines, a `n n m` header, then
//!   `m` lines `a b` with arbitrary integer labels (remapped to `[0, n)` in
//!   order of first appearance).
//! - no suffix — DIMACS: a `p edge n m` header, then `m` lines `e a b`;
//!   labels must already lie in `[1, n]` or `[0, n)`.
//! - `.bin` — binary CSR body: `u32` node and record counts, `n × u32`
//!   degrees, `m × u32` targets; offsets are reconstructed by prefix sum.
//! - any other suffix — plain text: a `n m` header, then `m` lines `a b` with
//!   labels already in `[0, n)`.
//!
//! Self-loops are dropped where the format tolerates them (`.mtx`, DIMACS)
//! and rejected where it does not (plain text); duplicate edges are always
//! merged.

pub mod binary;
pub mod edgelist;

pub use edgelist::EdgeList;

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::graph::CsrGraph;
use crate::Error;

/// Reads a graph file, dispatching on the path suffix.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<CsrGraph, Error> {
    let path = path.as_ref();
    let start = Instant::now();

    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let graph = match path.extension().and_then(|ext| ext.to_str()) {
        Some("bin") => binary::read_graph(file)?,
        suffix => {
            let mmap;
            let bytes: &[u8] = if file.metadata()?.len() == 0 {
                &[]
            } else {
                mmap = unsafe { memmap2::Mmap::map(&file)? };
                &mmap
            };
            let edge_list = match suffix {
                Some("mtx") => edgelist::parse_mtx(bytes)?,
                None => edgelist::parse_dimacs(bytes)?,
                Some(_) => edgelist::parse_plain(bytes)?,
            };
            CsrGraph::from(edge_list)
        }
    };

    info!(
        "loaded {}: n = {}, m = {} in {:?}",
        path.display(),
        graph.node_count().to_formatted_string(&Locale::en),
        graph.edge_count().to_formatted_string(&Locale::en),
        start.elapsed()
    );

    Ok(graph)
}
