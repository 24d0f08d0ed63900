use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use crate::{
    error::SequenceError,
    geom::Axis,
    sequence::{centroid::centroid_order, Budget, SequenceContext, Sequencer},
};

/// A scored tract, ordered by score then index.
#[derive(Debug, Clone, Copy)]
struct Scored {
    score: f64,
    idx: usize,
}

impl PartialEq for Scored {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Scored {}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score).then(self.idx.cmp(&other.idx))
    }
}

/// Greedy directional walk: start at the extreme corner tract for the axis and
/// repeatedly step to the best-scored unvisited neighbor. On a dead end, resume
/// from the best-scored tract bordering anything visited so far.
/// Tracts the graph cannot reach are appended in centroid order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyTraversal;

impl Sequencer for GreedyTraversal {
    fn sequence(
        &self,
        ctx: &SequenceContext<'_>,
        members: &[usize],
        axis: Axis,
        budget: &mut Budget,
    ) -> Result<Vec<usize>, SequenceError> {
        let Some(start) = corner_tract(ctx, members, axis) else { return Ok(Vec::new()) };

        let in_members = ctx.graph.mask(members);
        let mut visited = vec![false; ctx.tracts.len()];
        let mut frontier = BinaryHeap::new();
        let mut order = Vec::with_capacity(members.len());

        let mut current = Some(start);
        while let Some(u) = current {
            budget.tick()?;
            visited[u] = true;
            order.push(u);

            let mut best: Option<Scored> = None;
            for v in ctx.graph.edges(u).filter(|&v| in_members[v] && !visited[v]) {
                let scored = Scored { score: ctx.score(axis, v), idx: v };
                frontier.push(Reverse(scored));
                if best.is_none_or(|b| scored < b) { best = Some(scored) }
            }

            current = best.map(|b| b.idx).or_else(|| {
                // Dead end: take the best frontier tract not yet visited.
                std::iter::from_fn(|| frontier.pop())
                    .map(|Reverse(scored)| scored.idx)
                    .find(|&v| !visited[v])
            });
        }

        if order.len() < members.len() {
            let unreached = members.iter().copied().filter(|&v| !visited[v]).collect::<Vec<_>>();
            order.extend(centroid_order(ctx.tracts, &unreached, axis));
        }

        Ok(order)
    }
}

/// The member reaching furthest toward the axis's start corner (lowest index on ties).
pub(crate) fn corner_tract(ctx: &SequenceContext<'_>, members: &[usize], axis: Axis) -> Option<usize> {
    let corner = axis.start_corner();
    members.iter().copied().min_by(|&a, &b| {
        corner.compare(ctx.tracts.get(a).corner(corner), ctx.tracts.get(b).corner(corner))
            .reverse()
            .then(a.cmp(&b))
    })
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;
    use crate::{
        config::{AdjacencyConfig, AdjacencyStrategy, SequenceConfig},
        graph::AdjacencyGraph,
        map::{Tract, TractSet},
    };

    /// `cols x rows` grid of unit squares, indexed row-major from the south-west.
    fn grid(cols: usize, rows: usize) -> TractSet {
        TractSet::new((0..cols * rows)
            .map(|i| {
                let (x, y) = ((i % cols) as f64, (i / cols) as f64);
                Tract::new(format!("t{i}"), 1, MultiPolygon(vec![polygon![
                    (x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0),
                ]])).unwrap()
            })
            .collect()
        ).unwrap()
    }

    fn rook() -> AdjacencyConfig {
        AdjacencyConfig { strategy: AdjacencyStrategy::Topological, ..Default::default() }
    }

    #[test]
    fn walks_a_rook_grid_from_the_north_west() {
        let tracts = grid(3, 2);
        let adjacency = rook();
        let graph = AdjacencyGraph::build(&tracts, &adjacency);
        let config = SequenceConfig::default();
        let ctx = SequenceContext { tracts: &tracts, graph: &graph, adjacency: &adjacency, config: &config, reliable: true };

        let members = (0..6).collect::<Vec<_>>();
        let order = GreedyTraversal.sequence(&ctx, &members, Axis::Latitude, &mut Budget::unlimited()).unwrap();

        // Start at the north-west tract (3) and prefer staying north, which sweeps the top row first.
        assert_eq!(order[0], 3);
        assert_eq!(order, vec![3, 4, 5, 2, 1, 0]);
    }

    #[test]
    fn unreachable_tracts_are_appended() {
        let tracts = grid(3, 1);
        let adjacency = rook();
        let graph = AdjacencyGraph::empty(3);
        let config = SequenceConfig::default();
        let ctx = SequenceContext { tracts: &tracts, graph: &graph, adjacency: &adjacency, config: &config, reliable: false };

        let order = GreedyTraversal.sequence(&ctx, &[2, 1, 0], Axis::Longitude, &mut Budget::unlimited()).unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn respects_budget() {
        let tracts = grid(4, 4);
        let adjacency = rook();
        let graph = AdjacencyGraph::build(&tracts, &adjacency);
        let config = SequenceConfig::default();
        let ctx = SequenceContext { tracts: &tracts, graph: &graph, adjacency: &adjacency, config: &config, reliable: true };

        let members = (0..16).collect::<Vec<_>>();
        let result = GreedyTraversal.sequence(&ctx, &members, Axis::Latitude, &mut Budget::new(5, None));
        assert_eq!(result, Err(SequenceError::BudgetExceeded { steps: 5 }));
    }
}
