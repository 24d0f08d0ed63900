use serde::Serialize;

use crate::{config::AdjacencyConfig, graph::AdjacencyGraph};

/// Self-check of an adjacency graph's coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjacencyQuality {
    /// Mean neighbor count per tract.
    pub average_degree: f64,
    /// Fraction of tracts with at least one neighbor.
    pub coverage: f64,
    /// Number of tracts with no neighbor.
    pub isolated: usize,
}

impl AdjacencyQuality {
    /// Whether the graph is dense enough to drive traversal.
    pub fn is_reliable(&self, config: &AdjacencyConfig) -> bool {
        self.coverage >= config.min_coverage && self.average_degree >= config.min_average_degree
    }

    fn from_degrees(degrees: impl Iterator<Item = usize>) -> Self {
        let (count, total, isolated) = degrees.fold((0usize, 0usize, 0usize), |(count, total, isolated), d| {
            (count + 1, total + d, isolated + usize::from(d == 0))
        });

        if count == 0 { return Self { average_degree: 0.0, coverage: 0.0, isolated: 0 } }

        Self {
            average_degree: total as f64 / count as f64,
            coverage: (count - isolated) as f64 / count as f64,
            isolated,
        }
    }
}

impl AdjacencyGraph {
    /// Coverage statistics over the whole graph.
    pub fn quality(&self) -> AdjacencyQuality {
        AdjacencyQuality::from_degrees((0..self.node_count()).map(|u| self.degree(u)))
    }

    /// Coverage statistics of the subgraph induced by a member set.
    pub fn quality_within(&self, members: &[usize]) -> AdjacencyQuality {
        let in_members = self.mask(members);
        AdjacencyQuality::from_degrees(members.iter().map(|&u| self.edges(u).filter(|&v| in_members[v]).count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_of_path() {
        let graph = AdjacencyGraph::from_pairs(4, [(0, 1), (1, 2)]);
        let quality = graph.quality();
        assert_eq!(quality.average_degree, 1.0);
        assert_eq!(quality.coverage, 0.75);
        assert_eq!(quality.isolated, 1);
        assert!(quality.is_reliable(&AdjacencyConfig::default()));
    }

    #[test]
    fn empty_graph_is_unreliable() {
        let quality = AdjacencyGraph::empty(10).quality();
        assert_eq!(quality.coverage, 0.0);
        assert_eq!(quality.isolated, 10);
        assert!(!quality.is_reliable(&AdjacencyConfig::default()));
        assert!(!AdjacencyGraph::empty(0).quality().is_reliable(&AdjacencyConfig::default()));
    }

    #[test]
    fn quality_within_ignores_outside_edges() {
        let graph = AdjacencyGraph::from_pairs(4, [(0, 1), (1, 2), (2, 3)]);
        let quality = graph.quality_within(&[0, 2]);
        assert_eq!(quality.isolated, 2);
        assert_eq!(quality.coverage, 0.0);
    }
}
