use serde::Serialize;

use crate::map::TractId;

/// A tract moved from one district to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TractMove {
    pub tract: TractId,
    pub population: u64,
    pub from: u32,
    pub to: u32,
}

/// Population of a district after balancing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictBalance {
    pub district: u32,
    pub population: u64,
    /// Deviation from the mean district population, in percent.
    pub deviation: f64,
}

/// Outcome of a balancing pass. Deviations are in percent of the mean district population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub moves: Vec<TractMove>,
    pub iterations: usize,
    /// Every district ended within tolerance.
    pub converged: bool,
    pub target: f64,
    pub max_deviation_before: f64,
    pub max_deviation_after: f64,
    pub districts: Vec<DistrictBalance>,
}
