//! Reading and writing the records exchanged with data providers.
//!
//! - `records` - population, boundary and neighbor records, and JSON readers
//! - `geojson` - GeoJSON coordinate arrays to `geo` shapes

mod geojson;
mod records;

pub use geojson::parse_shape;
pub use records::{
    read_boundary_records, read_neighbor_records, read_population_records,
    BoundaryRecord, NeighborRecord, PopulationRecord,
};
