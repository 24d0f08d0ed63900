use thiserror::Error;

use crate::map::TractId;

/// Reasons a tract's geometry cannot be used for exact-geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("geometry has no polygons")]
    Empty,
    #[error("ring {ring} has {count} vertices (at least 4 required)")]
    TooFewVertices { ring: usize, count: usize },
    #[error("geometry contains a non-finite coordinate")]
    NonFinite,
    #[error("unsupported geometry type '{0}'")]
    UnsupportedShape(String),
    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(String),
}

/// Malformed input reported to the caller of the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartitionError {
    #[error("cannot partition an empty tract set into {districts} districts")]
    EmptyTractSet { districts: u32 },
    #[error("district count must be at least 1")]
    ZeroDistricts,
    #[error("tract {0} appears more than once")]
    DuplicateTract(TractId),
    #[error("tract {0} has no usable coordinates")]
    UnlocatableTract(TractId),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failures of a single sequencing strategy; always recovered by the fallback chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequenceError {
    #[error("adjacency too sparse for graph traversal (coverage {coverage:.2})")]
    SparseAdjacency { coverage: f64 },
    #[error("traversal stalled with {remaining} tracts unvisited: {reason}")]
    Stalled {
        partial: Vec<usize>,
        remaining: usize,
        reason: String,
    },
    #[error("traversal budget exhausted after {steps} steps")]
    BudgetExceeded { steps: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let err = GeometryError::TooFewVertices { ring: 2, count: 3 };
        assert_eq!(err.to_string(), "ring 2 has 3 vertices (at least 4 required)");

        let err = PartitionError::EmptyTractSet { districts: 4 };
        assert_eq!(err.to_string(), "cannot partition an empty tract set into 4 districts");

        let err = PartitionError::DuplicateTract(TractId::from("06001"));
        assert_eq!(err.to_string(), "tract 06001 appears more than once");
    }
}
