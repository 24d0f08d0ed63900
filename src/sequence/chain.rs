use serde::Serialize;
use tracing::debug;

use crate::{
    config::SequenceConfig,
    error::SequenceError,
    geom::Axis,
    sequence::{centroid::centroid_order, Budget, SequenceContext, SequenceStrategy, Sequencer},
};

/// A strategy that was skipped or failed for a group, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fallback {
    pub strategy: SequenceStrategy,
    pub reason: String,
}

/// Result of running a fallback chain on one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequenced {
    /// A permutation of the group's members.
    pub order: Vec<usize>,
    /// Strategy that produced (the head of) the order.
    pub strategy: SequenceStrategy,
    /// Strategies tried before it.
    pub fallbacks: Vec<Fallback>,
}

/// Ordered list of sequencing strategies, always terminated by centroid sort.
///
/// Traversal strategies are skipped when the adjacency graph is unreliable for
/// the run or within the group. A stalled traversal keeps its partial order and
/// the rest is centroid-sorted; a traversal that runs out of budget hands over
/// to the next strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackChain {
    strategies: Vec<SequenceStrategy>,
}

impl Default for FallbackChain {
    fn default() -> Self { Self::from_config(&SequenceConfig::default()) }
}

impl FallbackChain {
    /// Build a chain, dropping repeats and anything after centroid sort.
    pub fn new(strategies: impl IntoIterator<Item = SequenceStrategy>) -> Self {
        let mut chain = Vec::new();
        for strategy in strategies {
            if !chain.contains(&strategy) { chain.push(strategy) }
            if strategy == SequenceStrategy::CentroidSort { break }
        }
        if chain.last() != Some(&SequenceStrategy::CentroidSort) {
            chain.push(SequenceStrategy::CentroidSort);
        }
        Self { strategies: chain }
    }

    pub fn from_config(config: &SequenceConfig) -> Self {
        Self::new(config.chain.iter().copied())
    }

    #[inline] pub fn strategies(&self) -> &[SequenceStrategy] { &self.strategies }

    /// Sequence a group, falling through the chain until a strategy succeeds.
    pub fn run(&self, ctx: &SequenceContext<'_>, members: &[usize], axis: Axis) -> Sequenced {
        let mut fallbacks = Vec::new();
        let mut local_quality = None;

        // The chain always ends with centroid sort, which cannot fail.
        for &strategy in self.strategies.iter().filter(|s| s.uses_adjacency()) {
            // A sparse run-level graph is reported once per run, not per group.
            if !ctx.reliable { continue }

            let quality = *local_quality.get_or_insert_with(|| ctx.graph.quality_within(members));
            if members.len() > 1 && !quality.is_reliable(ctx.adjacency) {
                let error = SequenceError::SparseAdjacency { coverage: quality.coverage };
                debug!("[sequence] skipping {strategy}: {error}");
                fallbacks.push(Fallback { strategy, reason: error.to_string() });
                continue;
            }

            let mut budget = Budget::from_config(ctx.config);
            match strategy.sequence(ctx, members, axis, &mut budget) {
                Ok(order) => return Sequenced { order, strategy, fallbacks },
                Err(error) => {
                    debug!("[sequence] {strategy} failed after {} steps: {error}", budget.steps());
                    fallbacks.push(Fallback { strategy, reason: error.to_string() });
                    if let SequenceError::Stalled { partial, .. } = error {
                        let order = complete(ctx, members, axis, partial);
                        return Sequenced { order, strategy, fallbacks }
                    }
                }
            }
        }

        Sequenced {
            order: centroid_order(ctx.tracts, members, axis),
            strategy: SequenceStrategy::CentroidSort,
            fallbacks,
        }
    }
}

/// Append the centroid-sorted members missing from a partial order.
fn complete(ctx: &SequenceContext<'_>, members: &[usize], axis: Axis, mut partial: Vec<usize>) -> Vec<usize> {
    let mut placed = vec![false; ctx.tracts.len()];
    partial.iter().for_each(|&u| placed[u] = true);
    let rest = members.iter().copied().filter(|&u| !placed[u]).collect::<Vec<_>>();
    partial.extend(centroid_order(ctx.tracts, &rest, axis));
    partial
}
