//! Engine configuration.
//!
//! Every threshold used by the engine lives here rather than as a constant:
//! the adjacency heuristics in particular are empirically tuned for
//! longitude/latitude input and may need adjusting for other coordinate scales.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::PartitionError, geom::Axis, sequence::SequenceStrategy};

/// How the adjacency graph is derived from geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyStrategy {
    /// Bounding-box and extreme-point heuristics.
    Heuristic,
    /// Exact DE-9IM relation between shapes.
    Topological,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacencyConfig {
    pub strategy: AdjacencyStrategy,
    /// Bounding-box padding used to find candidate pairs (~10 m in degrees).
    pub bbox_tolerance: f64,
    /// Maximum extreme-point distance for the proximity test (~5 km in degrees).
    pub proximity_threshold: f64,
    /// Topological strategy: accept shared points, not only shared edges.
    pub queen: bool,
    /// Minimum fraction of tracts with at least one neighbor for the graph to be trusted.
    pub min_coverage: f64,
    /// Minimum average neighbor count for the graph to be trusted.
    pub min_average_degree: f64,
    /// Run the pairwise phase on the rayon thread pool.
    pub parallel: bool,
}

impl Default for AdjacencyConfig {
    fn default() -> Self {
        Self {
            strategy: AdjacencyStrategy::Heuristic,
            bbox_tolerance: 1e-4,
            proximity_threshold: 0.045,
            queen: false,
            min_coverage: 0.10,
            min_average_degree: 0.5,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Strategies tried in order; centroid sort always ends the chain.
    pub chain: Vec<SequenceStrategy>,
    /// Weight of the cross-axis coordinate in greedy traversal scores.
    pub secondary_bias: f64,
    /// Half-height of a traversal row, as a multiple of the median tract extent.
    pub row_band: f64,
    /// Maximum traversal steps per sequencing call.
    pub max_steps: usize,
    /// Optional wall-clock limit per sequencing call, in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            chain: vec![SequenceStrategy::Rows, SequenceStrategy::Greedy, SequenceStrategy::CentroidSort],
            secondary_bias: 0.1,
            row_band: 0.75,
            max_steps: 5_000_000,
            time_limit_ms: None,
        }
    }
}

/// How a group is split once it has been sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BisectMode {
    /// Split the tract sequence at the index closest to the target population.
    Index,
    /// Search for a dividing latitude/longitude line.
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BisectConfig {
    pub mode: BisectMode,
    /// Iteration cap for the proportional line search.
    pub max_iterations: usize,
    /// Target tolerance for the proportional line search (fraction of target).
    pub tolerance: f64,
    /// Tolerance below which the binary-search second pass is skipped.
    pub fallback_tolerance: f64,
    /// Iteration cap for the binary-search second pass.
    pub binary_iterations: usize,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            mode: BisectMode::Index,
            max_iterations: 20,
            tolerance: 0.01,
            fallback_tolerance: 0.05,
            binary_iterations: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Split axis at depth 0; alternates below.
    pub start_axis: Axis,
    /// Maximum number of splits before the run stops.
    pub max_iterations: usize,
    /// Check every child group for contiguity after a split.
    pub validate_contiguity: bool,
    /// Keep an AlgorithmStep for every split and terminal group.
    pub record_trace: bool,
    /// Split the groups of one recursion level on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            start_axis: Axis::Latitude,
            max_iterations: 10_000,
            validate_contiguity: true,
            record_trace: true,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Run the balancing pass after partitioning.
    pub enabled: bool,
    /// Allowed deviation from the mean district population (fraction).
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Allow moving tracts that do not border the receiving district.
    pub allow_detached_moves: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self { enabled: true, tolerance: 0.01, max_iterations: 1_000, allow_detached_moves: false }
    }
}

/// Complete configuration of a partition run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub adjacency: AdjacencyConfig,
    pub sequence: SequenceConfig,
    pub bisect: BisectConfig,
    pub controller: ControllerConfig,
    pub balance: BalanceConfig,
}

impl EngineConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse engine configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine configuration {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<(), PartitionError> {
        fn ensure(ok: bool, message: &str) -> Result<(), PartitionError> {
            if ok { Ok(()) } else { Err(PartitionError::InvalidConfig(message.to_string())) }
        }

        let a = &self.adjacency;
        ensure(a.bbox_tolerance >= 0.0 && a.bbox_tolerance.is_finite(), "adjacency.bbox_tolerance must be a finite value >= 0")?;
        ensure(a.proximity_threshold >= 0.0 && a.proximity_threshold.is_finite(), "adjacency.proximity_threshold must be a finite value >= 0")?;
        ensure((0.0..=1.0).contains(&a.min_coverage), "adjacency.min_coverage must be in [0, 1]")?;
        ensure(a.min_average_degree >= 0.0, "adjacency.min_average_degree must be >= 0")?;

        let s = &self.sequence;
        ensure(s.secondary_bias >= 0.0 && s.secondary_bias.is_finite(), "sequence.secondary_bias must be a finite value >= 0")?;
        ensure(s.row_band > 0.0 && s.row_band.is_finite(), "sequence.row_band must be > 0")?;
        ensure(s.max_steps > 0, "sequence.max_steps must be > 0")?;

        let b = &self.bisect;
        ensure(b.max_iterations > 0, "bisect.max_iterations must be > 0")?;
        ensure(b.tolerance > 0.0 && b.tolerance < 1.0, "bisect.tolerance must be in (0, 1)")?;
        ensure(b.fallback_tolerance >= b.tolerance && b.fallback_tolerance < 1.0, "bisect.fallback_tolerance must be in [tolerance, 1)")?;

        ensure(self.controller.max_iterations > 0, "controller.max_iterations must be > 0")?;

        let c = &self.balance;
        ensure(c.tolerance >= 0.0 && c.tolerance < 1.0, "balance.tolerance must be in [0, 1)")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{
            "bisect": { "mode": "line" },
            "controller": { "start_axis": "longitude", "parallel": true },
            "sequence": { "chain": ["greedy"] }
        }"#).unwrap();

        assert_eq!(config.bisect.mode, BisectMode::Line);
        assert_eq!(config.bisect.max_iterations, 20);
        assert_eq!(config.controller.start_axis, Axis::Longitude);
        assert!(config.controller.parallel);
        assert_eq!(config.sequence.chain, vec![SequenceStrategy::Greedy]);
        assert_eq!(config.adjacency, AdjacencyConfig::default());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "balance": { "tolerance": 2.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("balance.tolerance"), "{err}");

        let mut config = EngineConfig::default();
        config.bisect.fallback_tolerance = 0.001;
        assert!(matches!(config.validate(), Err(PartitionError::InvalidConfig(_))));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "adjacency": { "strategy": "topological", "queen": true } }"#).unwrap();

        let config = EngineConfig::from_path(&path).unwrap();
        assert_eq!(config.adjacency.strategy, AdjacencyStrategy::Topological);
        assert!(config.adjacency.queen);
    }
}
