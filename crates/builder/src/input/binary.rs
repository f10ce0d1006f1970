use std::fs::File;
use std::io::{BufReader, Read};

use byte_slice_cast::AsMutByteSlice;

use crate::graph::CsrGraph;
use crate::Error;

/// Reads the binary CSR format: `u32 n`, `u32 m`, `n × u32` degrees,
/// `m × u32` targets. Offsets are reconstructed by prefix sum over the
/// degrees; a truncated body surfaces as an I/O error.
pub(crate) fn read_graph(file: File) -> Result<CsrGraph, Error> {
    let mut reader = BufReader::new(file);

    let mut header = [0u32; 2];
    reader.read_exact(header.as_mut_byte_slice())?;
    let [node_count, record_count] = header;

    let mut degrees = vec![0u32; node_count as usize];
    reader.read_exact(degrees.as_mut_byte_slice())?;

    let degree_sum = degrees.iter().map(|&d| d as u64).sum::<u64>();
    if degree_sum != record_count as u64 {
        return Err(Error::InvalidBinaryBody {
            degree_sum,
            edge_count: record_count as u64,
        });
    }

    let mut targets = vec![0u32; record_count as usize];
    reader.read_exact(targets.as_mut_byte_slice())?;
    if let Some(&bad) = targets.iter().find(|&&t| t >= node_count) {
        return Err(Error::IdOutOfRange {
            id: bad,
            node_count,
        });
    }

    Ok(CsrGraph::from_csr_parts(degrees, targets))
}
