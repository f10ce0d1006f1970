use atoi::FromRadix10;
use fxhash::FxHashMap;

use crate::graph::CsrGraph;
use crate::Error;

/// An intermediate list of undirected edges plus the declared node count.
///
/// All text parsers produce an `EdgeList`; [`CsrGraph::from`] turns it into
/// the deduplicated, sorted CSR form.
#[derive(Debug)]
pub struct EdgeList {
    node_count: u32,
    edges: Vec<(u32, u32)>,
}

impl EdgeList {
    pub fn new(node_count: u32, edges: Vec<(u32, u32)>) -> Self {
        Self { node_count, edges }
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }
}

impl From<EdgeList> for CsrGraph {
    fn from(list: EdgeList) -> Self {
        CsrGraph::from_edges(list.node_count, list.edges)
    }
}

/// A byte cursor over a memory-mapped input with 1-based line tracking.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0, line: 1 }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if !b.is_ascii_whitespace() {
                break;
            }
            if b == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.bytes.get(self.pos).copied()
    }

    fn skip_line(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                break;
            }
        }
    }

    fn next_u32(&mut self, expected: &'static str) -> Result<u32, Error> {
        self.skip_whitespace();
        let (value, used) = u32::from_radix_10(&self.bytes[self.pos..]);
        if used == 0 {
            return Err(Error::InvalidRecord {
                line: self.line,
                expected,
            });
        }
        self.pos += used;
        Ok(value)
    }

    fn expect_word(&mut self, word: &'static str) -> Result<(), Error> {
        self.skip_whitespace();
        let end = self.pos + word.len();
        if self.bytes.get(self.pos..end) == Some(word.as_bytes()) {
            self.pos = end;
            Ok(())
        } else {
            Err(Error::InvalidRecord {
                line: self.line,
                expected: word,
            })
        }
    }
}

/// Matrix-Market-style input: `%` comments, `n n m` header, `m` edge lines.
///
/// Labels are arbitrary and remapped to `[0, n)` in order of first
/// appearance; self-loops are dropped.
pub(crate) fn parse_mtx(bytes: &[u8]) -> Result<EdgeList, Error> {
    let mut cursor = Cursor::new(bytes);
    while cursor.peek() == Some(b'%') {
        cursor.skip_line();
    }
    if cursor.peek().is_none() {
        return Err(Error::InvalidHeader { expected: "n n m" });
    }
    let _rows = cursor.next_u32("n n m")?;
    let node_count = cursor.next_u32("n n m")?;
    let edge_count = cursor.next_u32("n n m")?;

    let mut remap = FxHashMap::default();
    let mut edges = Vec::with_capacity(edge_count as usize);
    for _ in 0..edge_count {
        let a = cursor.next_u32("edge record `a b`")?;
        let b = cursor.next_u32("edge record `a b`")?;
        if a == b {
            continue;
        }
        let a = remap_label(&mut remap, a, node_count)?;
        let b = remap_label(&mut remap, b, node_count)?;
        edges.push((a, b));
    }
    Ok(EdgeList::new(node_count, edges))
}

fn remap_label(remap: &mut FxHashMap<u32, u32>, label: u32, node_count: u32) -> Result<u32, Error> {
    if let Some(&id) = remap.get(&label) {
        return Ok(id);
    }
    let id = remap.len() as u32;
    if id >= node_count {
        return Err(Error::IdOutOfRange {
            id: label,
            node_count,
        });
    }
    remap.insert(label, id);
    Ok(id)
}

/// DIMACS input: `p edge n m` header, `m` records `e a b`.
///
/// Labels must already lie in `[1, n]` or `[0, n)`; 1-based files (some
/// endpoint equals `n` and none is 0) are shifted down by one.
pub(crate) fn parse_dimacs(bytes: &[u8]) -> Result<EdgeList, Error> {
    let mut cursor = Cursor::new(bytes);
    if cursor.peek() != Some(b'p') {
        return Err(Error::InvalidHeader {
            expected: "p edge n m",
        });
    }
    cursor.expect_word("p")?;
    cursor.expect_word("edge")?;
    let node_count = cursor.next_u32("p edge n m")?;
    let edge_count = cursor.next_u32("p edge n m")?;

    let mut edges = Vec::with_capacity(edge_count as usize);
    let mut max_label = 0;
    let mut one_based = true;
    for _ in 0..edge_count {
        cursor.expect_word("e")?;
        let a = cursor.next_u32("edge record `e a b`")?;
        let b = cursor.next_u32("edge record `e a b`")?;
        if a == b {
            continue;
        }
        max_label = max_label.max(a).max(b);
        one_based &= a >= 1 && b >= 1;
        edges.push((a, b));
    }

    if max_label > node_count || (max_label == node_count && !one_based) {
        return Err(Error::IdOutOfRange {
            id: max_label,
            node_count,
        });
    }
    if one_based && max_label == node_count {
        for (a, b) in edges.iter_mut() {
            *a -= 1;
            *b -= 1;
        }
    }
    Ok(EdgeList::new(node_count, edges))
}

/// Plain text input: `n m` header, `m` lines `a b` with labels in `[0, n)`.
///
/// Self-loops are a format violation here.
pub(crate) fn parse_plain(bytes: &[u8]) -> Result<EdgeList, Error> {
    let mut cursor = Cursor::new(bytes);
    if cursor.peek().is_none() {
        return Err(Error::InvalidHeader { expected: "n m" });
    }
    let node_count = cursor.next_u32("n m")?;
    let edge_count = cursor.next_u32("n m")?;

    let mut edges = Vec::with_capacity(edge_count as usize);
    for _ in 0..edge_count {
        let a = cursor.next_u32("edge record `a b`")?;
        let b = cursor.next_u32("edge record `a b`")?;
        if a == b {
            return Err(Error::SelfLoop {
                line: cursor.line,
                node: a,
            });
        }
        if a >= node_count || b >= node_count {
            return Err(Error::IdOutOfRange {
                id: a.max(b),
                node_count,
            });
        }
        edges.push((a, b));
    }
    Ok(EdgeList::new(node_count, edges))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mtx_remaps_labels_in_order_of_appearance() {
        let input = b"% a comment\n%%MatrixMarket whatever\n3 3 3\n7 9\n9 42\n7 7\n";
        let list = parse_mtx(input).unwrap();
        assert_eq!(list.node_count(), 3);
        // 7 -> 0, 9 -> 1, 42 -> 2; the self-loop 7 7 is dropped
        assert_eq!(list.edges(), &[(0, 1), (1, 2)]);
    }

    #[test]
    fn mtx_rejects_too_many_labels() {
        let input = b"2 2 2\n1 2\n3 1\n";
        assert!(matches!(
            parse_mtx(input),
            Err(Error::IdOutOfRange { id: 3, .. })
        ));
    }

    #[test]
    fn dimacs_shifts_one_based_labels() {
        let input = b"p edge 3 3\ne 1 2\ne 2 3\ne 1 3\n";
        let list = parse_dimacs(input).unwrap();
        assert_eq!(list.edges(), &[(0, 1), (1, 2), (0, 2)]);
    }

    #[test]
    fn dimacs_keeps_zero_based_labels() {
        let input = b"p edge 3 2\ne 0 1\ne 1 2\n";
        let list = parse_dimacs(input).unwrap();
        assert_eq!(list.edges(), &[(0, 1), (1, 2)]);
    }

    #[test]
    fn dimacs_requires_headers() {
        assert!(matches!(
            parse_dimacs(b"c nothing\n"),
            Err(Error::InvalidHeader { .. })
        ));
        assert!(matches!(
            parse_dimacs(b"p edge 2 1\n0 1\n"),
            Err(Error::InvalidRecord { expected: "e", .. })
        ));
    }

    #[test]
    fn plain_rejects_self_loops() {
        let err = parse_plain(b"3 2\n0 1\n2 2\n").unwrap_err();
        assert!(matches!(err, Error::SelfLoop { node: 2, line: 3 }));
    }

    #[test]
    fn plain_rejects_out_of_range_ids() {
        assert!(matches!(
            parse_plain(b"2 1\n0 5\n"),
            Err(Error::IdOutOfRange { id: 5, .. })
        ));
    }

    #[test]
    fn windows_line_endings_parse() {
        let list = parse_plain(b"3 2\r\n0 1\r\n1 2\r\n").unwrap();
        assert_eq!(list.edges(), &[(0, 1), (1, 2)]);
    }
}
