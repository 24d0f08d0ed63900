/// A symmetric, unweighted tract adjacency graph in compressed sparse row format.
/// Neighbor lists are sorted, without duplicates or self-loops.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyGraph {
    offsets: Vec<u32>,
    edges: Vec<u32>,
}

impl Default for AdjacencyGraph {
    fn default() -> Self { Self::empty(0) }
}

impl AdjacencyGraph {
    /// A graph over `num_nodes` tracts with no edges.
    pub fn empty(num_nodes: usize) -> Self {
        Self { offsets: vec![0; num_nodes + 1], edges: Vec::new() }
    }

    /// Construct a graph from unordered node pairs, closing the relation under symmetry.
    pub fn from_pairs(num_nodes: usize, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut lists = vec![Vec::<u32>::new(); num_nodes];
        for (a, b) in pairs {
            assert!(a < num_nodes && b < num_nodes, "pair ({a}, {b}) out of range for {num_nodes} nodes");
            if a == b { continue }
            lists[a].push(b as u32);
            lists[b].push(a as u32);
        }

        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            offsets: std::iter::once(0u32).chain(
                lists.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| { *acc += len; Some(*acc) })
            ).collect(),
            edges: lists.into_iter().flatten().collect(),
        }
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.offsets.len() - 1 }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() / 2 }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Sorted neighbor slice of a given node.
    #[inline] pub fn neighbors(&self, node: usize) -> &[u32] { &self.edges[self.range(node)] }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors(node).iter().map(|&v| v as usize)
    }

    /// Returns true if `a` and `b` are adjacent (binary search).
    #[inline]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).binary_search(&(b as u32)).is_ok()
    }
}
