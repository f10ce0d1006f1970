//! A max segment tree over vertex ids.

/// Weight of an absent vertex; anything present is `>= 0`.
const ABSENT: i64 = i64::MIN;

/// A segment tree indexed by vertex id holding a weight per present vertex.
///
/// [`SegTree::top`] returns the present vertex with the maximum weight,
/// breaking ties toward the smallest id. Used by the strong-extension
/// heuristic to pick "the candidate with the most edges into the growing
/// plex" in O(log n).
#[derive(Debug, Clone)]
pub struct SegTree {
    size: usize,
    node_count: usize,
    tree: Vec<i64>,
}

impl SegTree {
    /// A tree over ids `0..node_count` with every vertex absent.
    pub fn new(node_count: usize) -> Self {
        let size = node_count.next_power_of_two().max(1);
        Self {
            size,
            node_count,
            tree: vec![ABSENT; size * 2],
        }
    }

    /// A tree over ids `0..node_count` with every vertex present at weight 0.
    pub fn full(node_count: usize) -> Self {
        let mut tree = Self::new(node_count);
        for leaf in tree.size..tree.size + node_count {
            tree.tree[leaf] = 0;
        }
        for node in (1..tree.size).rev() {
            tree.tree[node] = tree.tree[node * 2].max(tree.tree[node * 2 + 1]);
        }
        tree
    }

    pub fn contains(&self, v: u32) -> bool {
        self.tree[self.size + v as usize] != ABSENT
    }

    /// Marks `v` present with weight 0.
    pub fn add(&mut self, v: u32) {
        self.update(v, 0);
    }

    /// Marks `v` absent.
    pub fn remove(&mut self, v: u32) {
        self.update(v, ABSENT);
    }

    /// Bumps the weight of a present `v` by one.
    pub fn increment(&mut self, v: u32) {
        debug_assert!(self.contains(v));
        let weight = self.tree[self.size + v as usize];
        self.update(v, weight + 1);
    }

    /// The present vertex with the maximum weight, smallest id on ties.
    pub fn top(&self) -> Option<u32> {
        if self.tree[1] == ABSENT {
            return None;
        }
        let mut node = 1;
        while node < self.size {
            // left wins ties, which is exactly the smallest-id preference
            node = if self.tree[node * 2] >= self.tree[node * 2 + 1] {
                node * 2
            } else {
                node * 2 + 1
            };
        }
        Some((node - self.size) as u32)
    }

    /// The weight of [`SegTree::top`].
    pub fn top_weight(&self) -> Option<u32> {
        match self.tree[1] {
            ABSENT => None,
            weight => Some(weight as u32),
        }
    }

    fn update(&mut self, v: u32, weight: i64) {
        debug_assert!((v as usize) < self.node_count);
        let mut node = self.size + v as usize;
        self.tree[node] = weight;
        node /= 2;
        while node >= 1 {
            self.tree[node] = self.tree[node * 2].max(self.tree[node * 2 + 1]);
            node /= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_has_no_top() {
        let tree = SegTree::new(8);
        assert_eq!(tree.top(), None);
        assert_eq!(tree.top_weight(), None);
        assert_eq!(SegTree::new(0).top(), None);
    }

    #[test]
    fn top_tracks_weights() {
        let mut tree = SegTree::new(10);
        tree.add(4);
        tree.add(7);
        tree.increment(7);
        assert_eq!(tree.top(), Some(7));
        assert_eq!(tree.top_weight(), Some(1));

        tree.increment(4);
        tree.increment(4);
        assert_eq!(tree.top(), Some(4));
        assert_eq!(tree.top_weight(), Some(2));

        tree.remove(4);
        assert_eq!(tree.top(), Some(7));
    }

    #[test]
    fn ties_break_to_smallest_id() {
        let mut tree = SegTree::full(6);
        assert_eq!(tree.top(), Some(0));

        tree.increment(5);
        tree.increment(2);
        assert_eq!(tree.top(), Some(2));

        tree.remove(2);
        assert_eq!(tree.top(), Some(5));
    }

    #[test]
    fn full_marks_everything_present() {
        let tree = SegTree::full(5);
        assert!((0..5).all(|v| tree.contains(v)));
        assert_eq!(tree.top(), Some(0));
        assert_eq!(tree.top_weight(), Some(0));
    }
}
