use ahash::AHashMap;
use geo::Coord;

use crate::{
    error::SequenceError,
    geom::{distance, Axis},
    map::TractSet,
    sequence::{greedy::corner_tract, Budget, SequenceContext, Sequencer},
};

/// Zig-zag row sweep over the adjacency graph.
///
/// Rows run across the pass (west to east, then east to west, ...) and stack
/// along it. A row grows through neighbors that advance in the sweep direction
/// and stay within a band around the row's first tract. The next row starts at
/// the unvisited neighbor of the finished row that lies furthest back along the
/// pass, nearest the row's end.
///
/// The sweep starts from a tract with at least one neighbor when there is one.
/// Tracts lying inside another member's outer ring are not walked; each is
/// placed right after its container.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowTraversal;

impl Sequencer for RowTraversal {
    fn sequence(
        &self,
        ctx: &SequenceContext<'_>,
        members: &[usize],
        axis: Axis,
        budget: &mut Budget,
    ) -> Result<Vec<usize>, SequenceError> {
        let tracts = ctx.tracts;
        let centroid = |u: usize| tracts.get(u).centroid();

        // Split members into walkable tracts and tracts nested inside a walkable container.
        let in_members = ctx.graph.mask(members);
        let mut walkable = in_members.clone();
        let mut nested = AHashMap::<usize, Vec<usize>>::new();
        let containers = tracts.containers();
        for &m in members {
            if let Some(c) = containers[m].filter(|&c| in_members[c]) {
                nested.entry(c).or_default().push(m);
                walkable[m] = false;
            }
        }
        nested.values_mut().for_each(|children| children.sort_unstable());

        let roots = members.iter().copied().filter(|&m| walkable[m]).collect::<Vec<_>>();
        // An isolated corner tract would stall the sweep at once; start from a connected one.
        let connected = roots.iter().copied()
            .filter(|&u| ctx.graph.edges(u).any(|v| walkable[v]))
            .collect::<Vec<_>>();
        let starts = if connected.is_empty() { &roots } else { &connected };
        let Some(mut anchor) = corner_tract(ctx, starts, axis) else { return Ok(Vec::new()) };
        let band = ctx.config.row_band * median_extent(tracts, &roots, axis);

        let mut visited = vec![false; tracts.len()];
        let mut order = Vec::with_capacity(members.len());
        let mut unvisited = roots.len();
        let mut forward = true;

        loop {
            // Sweep one row starting from the anchor.
            let anchor_primary = axis.primary(centroid(anchor));
            let mut row = Vec::new();
            let mut current = anchor;
            loop {
                budget.tick()?;
                visited[current] = true;
                unvisited -= 1;
                emit(current, &nested, &mut order);
                row.push(current);

                let position = axis.secondary(centroid(current));
                let next = ctx.graph.edges(current)
                    .filter(|&v| walkable[v] && !visited[v])
                    .filter_map(|v| {
                        let c = centroid(v);
                        let step = if forward { axis.secondary(c) - position } else { position - axis.secondary(c) };
                        let drift = (axis.primary(c) - anchor_primary).abs();
                        (step > 0.0 && drift <= band).then_some((step + drift, v))
                    })
                    .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                    .map(|(_, v)| v);

                match next {
                    Some(v) => current = v,
                    None => break,
                }
            }

            if unvisited == 0 { break }

            // Start the next row next to the finished one, or anywhere on the visited frontier.
            let end = centroid(current);
            let bordering = |sources: &[usize]| {
                sources.iter()
                    .flat_map(|&u| ctx.graph.edges(u))
                    .filter(|&v| walkable[v] && !visited[v])
                    .min_by(|&a, &b| row_start_order(axis, end, centroid(a), centroid(b)).then(a.cmp(&b)))
            };

            let next = bordering(&row[..]).or_else(|| {
                let done = roots.iter().copied().filter(|&u| visited[u]).collect::<Vec<_>>();
                bordering(&done[..])
            });

            match next {
                Some(v) => anchor = v,
                None => {
                    let remaining = members.len() - order.len();
                    return Err(SequenceError::Stalled {
                        partial: order,
                        remaining,
                        reason: "no unvisited tract borders the traversal".to_string(),
                    })
                }
            }

            forward = !forward;
        }

        Ok(order)
    }
}

/// Push a tract followed by every tract nested inside it.
fn emit(u: usize, nested: &AHashMap<usize, Vec<usize>>, order: &mut Vec<usize>) {
    order.push(u);
    if let Some(children) = nested.get(&u) {
        children.iter().for_each(|&child| emit(child, nested, order));
    }
}

/// Preference for row starts: furthest back along the pass, then nearest the previous row's end.
fn row_start_order(axis: Axis, end: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> std::cmp::Ordering {
    axis.primary(a).total_cmp(&axis.primary(b))
        .then(distance(a, end).total_cmp(&distance(b, end)))
}

/// Median extent of the members' bounding boxes along the pass direction.
fn median_extent(tracts: &TractSet, members: &[usize], axis: Axis) -> f64 {
    let mut extents = members.iter()
        .map(|&u| {
            let bounds = tracts.get(u).bounds();
            match axis {
                Axis::Latitude => bounds.height(),
                Axis::Longitude => bounds.width(),
            }
        })
        .collect::<Vec<_>>();

    if extents.is_empty() { return 0.0 }
    extents.sort_by(f64::total_cmp);
    extents[extents.len() / 2]
}
