use std::collections::VecDeque;

use crate::graph::AdjacencyGraph;

impl AdjacencyGraph {
    /// Membership mask over all nodes for a member list.
    pub(crate) fn mask(&self, members: &[usize]) -> Vec<bool> {
        let mut mask = vec![false; self.node_count()];
        members.iter().for_each(|&u| mask[u] = true);
        mask
    }

    /// Find all connected components (as node lists) inside a member set.
    pub fn components(&self, members: &[usize]) -> Vec<Vec<usize>> {
        let in_members = self.mask(members);
        let mut visited = vec![false; self.node_count()];
        let mut components = Vec::new();

        for &u in members {
            if visited[u] { continue }
            visited[u] = true;

            let mut component = Vec::new();
            let mut queue = VecDeque::from([u]);
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for w in self.edges(v) {
                    if in_members[w] && !visited[w] {
                        visited[w] = true;
                        queue.push_back(w);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Check if a member set forms a single connected component (empty sets count as contiguous).
    pub fn is_contiguous(&self, members: &[usize]) -> bool {
        self.components(members).len() <= 1
    }

    /// Check if removing `node` from a member set leaves the remaining members connected,
    /// assuming they were connected before.
    pub fn removal_keeps_contiguity(&self, in_members: &[bool], node: usize) -> bool {
        // Collect neighbors that are in the same set.
        let neighbors = self.edges(node)
            .filter(|&v| in_members[v])
            .collect::<Vec<_>>();

        // If fewer than 2 same-set neighbors, removing `node` cannot disconnect the set.
        if neighbors.len() <= 1 { return true }

        // Track which same-set neighbors have been reached.
        let mut targets = vec![false; self.node_count()];
        neighbors.iter().for_each(|&v| targets[v] = true);

        // BFS from one neighbor within the set, forbidding `node`.
        let mut visited = vec![false; self.node_count()];
        visited[node] = true;
        visited[neighbors[0]] = true;

        let mut remaining = neighbors.len() - 1;
        let mut queue = VecDeque::from([neighbors[0]]);
        while let Some(u) = queue.pop_front() {
            for v in self.edges(u) {
                if !visited[v] && in_members[v] {
                    visited[v] = true;
                    queue.push_back(v);

                    // Early exit once every neighbor has been reached.
                    if targets[v] { remaining -= 1; if remaining == 0 { return true } }
                }
            }
        }

        false
    }

    /// Check if `node` has a neighbor inside the member set.
    #[inline]
    pub fn borders(&self, node: usize, in_members: &[bool]) -> bool {
        self.edges(node).any(|v| in_members[v])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 - 1 - 2
    // |       |
    // 3 - 4 - 5     6 (isolated)
    fn ring() -> AdjacencyGraph {
        AdjacencyGraph::from_pairs(7, [(0, 1), (1, 2), (2, 5), (5, 4), (4, 3), (3, 0)])
    }

    #[test]
    fn components_respect_member_set() {
        let graph = ring();
        assert_eq!(graph.components(&[0, 1, 2, 3, 4, 5]).len(), 1);
        assert_eq!(graph.components(&[0, 2, 6]).len(), 3);

        let mut split = graph.components(&[0, 1, 4, 5]);
        split.iter_mut().for_each(|c| c.sort_unstable());
        split.sort();
        assert_eq!(split, vec![vec![0, 1], vec![4, 5]]);

        assert!(graph.is_contiguous(&[]));
        assert!(graph.is_contiguous(&[6]));
        assert!(!graph.is_contiguous(&[0, 6]));
    }

    #[test]
    fn removal_on_a_cycle_keeps_contiguity() {
        let graph = ring();
        let mask = graph.mask(&[0, 1, 2, 3, 4, 5]);
        for node in 0..6 { assert!(graph.removal_keeps_contiguity(&mask, node)) }
    }

    #[test]
    fn removal_of_articulation_point_breaks_contiguity() {
        let graph = ring();
        let mask = graph.mask(&[0, 1, 2, 5]);
        assert!(!graph.removal_keeps_contiguity(&mask, 1));
        assert!(graph.removal_keeps_contiguity(&mask, 0));
        assert!(graph.removal_keeps_contiguity(&mask, 5));
    }

    #[test]
    fn borders_checks_membership() {
        let graph = ring();
        let mask = graph.mask(&[4, 5]);
        assert!(graph.borders(3, &mask));
        assert!(!graph.borders(0, &mask));
        assert!(!graph.borders(6, &mask));
    }
}
