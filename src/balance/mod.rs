mod balancer;
mod report;

pub use balancer::Balancer;
pub use report::{BalanceReport, DistrictBalance, TractMove};

/// Deviation of a population from the target, in percent of the target.
#[inline]
pub(crate) fn deviation_pct(population: u64, target: f64) -> f64 {
    if target > 0.0 { (population as f64 - target) / target * 100.0 } else { 0.0 }
}

/// Largest absolute district deviation, in percent of the target.
pub(crate) fn max_deviation_pct(populations: &[u64], target: f64) -> f64 {
    populations.iter()
        .map(|&p| deviation_pct(p, target).abs())
        .fold(0.0, f64::max)
}
