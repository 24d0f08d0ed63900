use std::fmt;

use serde::Serialize;

use crate::{map::TractId, sequence::SequenceStrategy};

/// A recoverable problem noticed during a run.
/// Warnings never abort a run; they are logged and returned with the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A tract's geometry was unusable and its centroid stands in for it.
    InvalidGeometry { tract: TractId, reason: String },
    /// The adjacency graph is too sparse to drive traversal.
    SparseAdjacency { average_degree: f64, coverage: f64 },
    /// An adjacency record referenced an unknown tract.
    UnknownNeighbor { tract: TractId },
    /// A sequencing strategy failed for a group and the next one was used.
    SequenceFallback { start: u32, end: u32, strategy: SequenceStrategy, reason: String },
    /// The dividing-line search missed its tolerance even after the binary pass.
    NonConvergentLineSearch { start: u32, end: u32, relative_error: f64 },
    /// The controller hit its split cap; some groups were left unsplit.
    MaxIterationsReached { iterations: usize, pending: usize },
    /// A child group produced by a split is not connected in the adjacency graph.
    DisconnectedSplit { start: u32, end: u32, components: usize },
    /// A district received no tracts.
    EmptyDistrict { district: u32 },
    /// Balancing stopped with districts still outside tolerance (deviation in percent).
    BalanceIncomplete { max_deviation: f64 },
}

impl Warning {
    /// Emit this warning through `tracing`.
    pub(crate) fn log(&self) {
        tracing::warn!("{self}");
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InvalidGeometry { tract, reason } =>
                write!(f, "tract {tract}: invalid geometry ({reason}), using centroid"),
            Warning::SparseAdjacency { average_degree, coverage } =>
                write!(f, "adjacency graph is sparse (average degree {average_degree:.2}, coverage {:.1}%), preferring centroid sort", coverage * 100.0),
            Warning::UnknownNeighbor { tract } =>
                write!(f, "adjacency record references unknown tract {tract}"),
            Warning::SequenceFallback { start, end, strategy, reason } =>
                write!(f, "districts {start}-{end}: {strategy} sequencing failed ({reason})"),
            Warning::NonConvergentLineSearch { start, end, relative_error } =>
                write!(f, "districts {start}-{end}: dividing line missed target by {:.2}%", relative_error * 100.0),
            Warning::MaxIterationsReached { iterations, pending } =>
                write!(f, "stopped after {iterations} splits with {pending} groups unsplit"),
            Warning::DisconnectedSplit { start, end, components } =>
                write!(f, "districts {start}-{end}: group has {components} disconnected components"),
            Warning::EmptyDistrict { district } =>
                write!(f, "district {district} received no tracts"),
            Warning::BalanceIncomplete { max_deviation } =>
                write!(f, "balancing stopped at {max_deviation:.2}% maximum deviation"),
        }
    }
}
