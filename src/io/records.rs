use std::path::Path;

use ahash::{AHashMap, AHashSet};
use anyhow::{Context, Result};
use geo::{Coord, MultiPolygon};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::{GeometryError, PartitionError},
    io::parse_shape,
    map::{Tract, TractId, TractSet, UnitId},
};

/// Population of one tract, with its optional administrative unit and centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub tract_id: TractId,
    pub population: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_unit_id: Option<UnitId>,
    /// `[lng, lat]`, used when the boundary is missing or unusable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<[f64; 2]>,
}

/// Boundary of one tract as GeoJSON geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRecord {
    pub tract_id: TractId,
    /// `"Polygon"` or `"MultiPolygon"`.
    pub geometry_type: String,
    pub coordinates: Value,
}

impl BoundaryRecord {
    /// Parse the record's coordinates into a shape.
    pub fn to_shape(&self) -> Result<MultiPolygon<f64>, GeometryError> {
        parse_shape(&self.geometry_type, &self.coordinates)
    }
}

/// One precomputed adjacency pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRecord {
    pub tract_id: TractId,
    pub neighbor_tract_id: TractId,
}

/// Read a JSON array of records from a file.
fn read_json_records<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {kind} records from {}", path.display()))?;
    let records: Vec<T> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {kind} records in {}", path.display()))?;
    info!("[io] read {} {kind} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read population records from a JSON array file.
pub fn read_population_records(path: &Path) -> Result<Vec<PopulationRecord>> {
    read_json_records(path, "population")
}

/// Read boundary records from a JSON array file.
pub fn read_boundary_records(path: &Path) -> Result<Vec<BoundaryRecord>> {
    read_json_records(path, "boundary")
}

/// Read neighbor records from a JSON array file.
pub fn read_neighbor_records(path: &Path) -> Result<Vec<NeighborRecord>> {
    read_json_records(path, "neighbor")
}

impl TractSet {
    /// Join population records with boundary records into a tract set.
    ///
    /// Tracts keep the order of the population records. Boundaries without a
    /// population record are skipped. A tract whose boundary is missing or
    /// unusable falls back to its record centroid (or the mean of its finite
    /// vertices) and is unlocatable without one.
    pub fn from_records(populations: &[PopulationRecord], boundaries: &[BoundaryRecord]) -> Result<Self, PartitionError> {
        let mut shapes = AHashMap::with_capacity(boundaries.len());
        for record in boundaries {
            if shapes.insert(&record.tract_id, record).is_some() {
                warn!("[io] duplicate boundary for tract {}, keeping the last", record.tract_id);
            }
        }

        let tracts = populations.iter()
            .map(|record| {
                let shape = match shapes.get(&record.tract_id) {
                    Some(boundary) => boundary.to_shape(),
                    None => Err(GeometryError::Empty),
                };
                let hint = record.centroid.map(|[x, y]| Coord { x, y });

                let tract = Tract::from_parts(record.tract_id.clone(), record.population, shape, hint)?;
                Ok(match &record.administrative_unit_id {
                    Some(unit) => tract.with_unit(unit.clone()),
                    None => tract,
                })
            })
            .collect::<Result<Vec<_>, PartitionError>>()?;

        let known = populations.iter().map(|record| &record.tract_id).collect::<AHashSet<_>>();
        let orphans = shapes.keys().filter(|id| !known.contains(*id)).count();
        if orphans > 0 {
            warn!("[io] skipped {orphans} boundaries without a population record");
        }

        Self::new(tracts)
    }
}
