#![doc = "OpenMander recursive-bisection redistricting engine"]
mod balance;
mod bisect;
mod config;
mod county;
mod error;
mod geom;
mod graph;
mod io;
mod logging;
mod map;
mod partition;
mod plan;
mod redistrict;
mod sequence;
mod warning;

#[doc(inline)]
pub use redistrict::Redistricter;

#[doc(inline)]
pub use map::{Footprint, Tract, TractId, TractSet, UnitId};

#[doc(inline)]
pub use plan::{Bounds, District, Plan, Summary};

#[doc(inline)]
pub use config::{
    AdjacencyConfig, AdjacencyStrategy, BalanceConfig, BisectConfig, BisectMode,
    ControllerConfig, EngineConfig, SequenceConfig,
};

#[doc(inline)]
pub use error::{GeometryError, PartitionError, SequenceError};

#[doc(inline)]
pub use warning::Warning;

#[doc(inline)]
pub use geom::{bounding_box, centroid, extreme_point, validate, Axis, Corner};

#[doc(inline)]
pub use graph::{AdjacencyCache, AdjacencyGraph, AdjacencyQuality, RunId};

#[doc(inline)]
pub use sequence::{
    Budget, CentroidSort, Fallback, FallbackChain, GreedyTraversal, RowTraversal,
    SequenceContext, SequenceStrategy, Sequenced, Sequencer,
};

#[doc(inline)]
pub use bisect::{bisect_index, bisect_line, IndexSplit, LineSplit};

#[doc(inline)]
pub use partition::{
    AlgorithmStep, Controller, DistrictGroup, GroupSnapshot, PartitionRun, SplitSpec, StepLog,
};

#[doc(inline)]
pub use balance::{BalanceReport, Balancer, DistrictBalance, TractMove};

#[doc(inline)]
pub use county::{assign_by_unit, UnitAssignment, UnitKey};

#[doc(inline)]
pub use io::{
    parse_shape, read_boundary_records, read_neighbor_records, read_population_records,
    BoundaryRecord, NeighborRecord, PopulationRecord,
};

#[doc(inline)]
pub use logging::init_tracing;
