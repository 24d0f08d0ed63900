use crate::{
    error::SequenceError,
    geom::Axis,
    map::TractSet,
    sequence::{Budget, SequenceContext, Sequencer},
};

/// Order tracts by centroid: north to south then west to east for a latitude pass,
/// west to east then south to north for a longitude pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidSort;

impl Sequencer for CentroidSort {
    fn sequence(
        &self,
        ctx: &SequenceContext<'_>,
        members: &[usize],
        axis: Axis,
        _budget: &mut Budget,
    ) -> Result<Vec<usize>, SequenceError> {
        Ok(centroid_order(ctx.tracts, members, axis))
    }
}

/// Centroid ordering of `members`, ties broken by tract index.
pub(crate) fn centroid_order(tracts: &TractSet, members: &[usize], axis: Axis) -> Vec<usize> {
    let mut order = members.to_vec();
    order.sort_by(|&a, &b| {
        axis.compare(tracts.get(a).centroid(), tracts.get(b).centroid()).then(a.cmp(&b))
    });
    order
}
