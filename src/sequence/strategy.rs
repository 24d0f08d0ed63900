use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    config::{AdjacencyConfig, SequenceConfig},
    error::SequenceError,
    geom::Axis,
    graph::AdjacencyGraph,
    map::TractSet,
    sequence::{Budget, CentroidSort, GreedyTraversal, RowTraversal},
};

/// Read-only inputs shared by every sequencing call of a run.
#[derive(Debug, Clone, Copy)]
pub struct SequenceContext<'a> {
    pub tracts: &'a TractSet,
    pub graph: &'a AdjacencyGraph,
    pub adjacency: &'a AdjacencyConfig,
    pub config: &'a SequenceConfig,
    /// Whether the whole-run adjacency graph passed its quality check.
    pub reliable: bool,
}

impl SequenceContext<'_> {
    /// Score of a tract in directional traversals: progress along the pass,
    /// nudged by the cross-axis position.
    #[inline]
    pub(crate) fn score(&self, axis: Axis, tract: usize) -> f64 {
        let c = self.tracts.get(tract).centroid();
        axis.primary(c) + self.config.secondary_bias * axis.secondary(c)
    }
}

/// Orders the tracts of a group so that prefixes of the order are spatially compact.
pub trait Sequencer {
    /// Produce an ordering of `members` (a permutation) for a pass along `axis`.
    fn sequence(
        &self,
        ctx: &SequenceContext<'_>,
        members: &[usize],
        axis: Axis,
        budget: &mut Budget,
    ) -> Result<Vec<usize>, SequenceError>;
}

/// Available sequencing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStrategy {
    /// Sort by centroid along the axis. Never fails.
    CentroidSort,
    /// Greedy directional walk over the adjacency graph.
    Greedy,
    /// Zig-zag row sweep over the adjacency graph.
    Rows,
}

impl SequenceStrategy {
    /// Whether the strategy walks the adjacency graph.
    #[inline]
    pub fn uses_adjacency(self) -> bool {
        !matches!(self, SequenceStrategy::CentroidSort)
    }
}

impl Sequencer for SequenceStrategy {
    fn sequence(
        &self,
        ctx: &SequenceContext<'_>,
        members: &[usize],
        axis: Axis,
        budget: &mut Budget,
    ) -> Result<Vec<usize>, SequenceError> {
        match self {
            SequenceStrategy::CentroidSort => CentroidSort.sequence(ctx, members, axis, budget),
            SequenceStrategy::Greedy => GreedyTraversal.sequence(ctx, members, axis, budget),
            SequenceStrategy::Rows => RowTraversal.sequence(ctx, members, axis, budget),
        }
    }
}

impl fmt::Display for SequenceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceStrategy::CentroidSort => f.write_str("centroid sort"),
            SequenceStrategy::Greedy => f.write_str("greedy"),
            SequenceStrategy::Rows => f.write_str("row"),
        }
    }
}
