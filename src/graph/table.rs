use ahash::AHashSet;
use tracing::{info, warn};

use crate::{
    graph::AdjacencyGraph,
    io::NeighborRecord,
    map::{TractId, TractSet},
    warning::Warning,
};

impl AdjacencyGraph {
    /// Build the graph from precomputed neighbor records.
    /// Records naming an unknown tract are skipped with a warning; the relation is closed under symmetry.
    pub fn from_table(tracts: &TractSet, records: &[NeighborRecord]) -> (Self, Vec<Warning>) {
        let mut self_pairs = 0usize;
        let mut pairs = Vec::with_capacity(records.len());

        for record in records {
            let (Some(a), Some(b)) = (tracts.index_of(&record.tract_id), tracts.index_of(&record.neighbor_tract_id)) else { continue };
            if a == b { self_pairs += 1; continue }
            pairs.push((a, b));
        }

        if self_pairs > 0 {
            warn!("[graph] skipped {self_pairs} self-referencing adjacency records");
        }

        let graph = Self::from_pairs(tracts.len(), pairs);
        info!("[graph] table adjacency: {} records, {} edges", records.len(), graph.edge_count());
        (graph, unknown_neighbors(tracts, records))
    }
}

/// One warning per distinct tract id in `records` that is not in the tract set, in first-seen order.
pub(crate) fn unknown_neighbors(tracts: &TractSet, records: &[NeighborRecord]) -> Vec<Warning> {
    let mut unknown = AHashSet::<&TractId>::new();
    records.iter()
        .flat_map(|record| [&record.tract_id, &record.neighbor_tract_id])
        .filter(|&id| tracts.index_of(id).is_none() && unknown.insert(id))
        .map(|id| Warning::UnknownNeighbor { tract: id.clone() })
        .collect()
}
