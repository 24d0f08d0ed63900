use serde::Serialize;

use crate::{balance::{deviation_pct, max_deviation_pct}, warning::Warning};

/// Population statistics of a finished plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_population: u64,
    pub mean_population: f64,
    /// Population variance across districts.
    pub variance: f64,
    /// Deviation of each district from the mean, in percent.
    pub deviations: Vec<f64>,
    /// Largest absolute deviation, in percent.
    pub max_deviation: f64,
    pub warnings: Vec<Warning>,
}

impl Summary {
    pub(crate) fn new(populations: &[u64], warnings: Vec<Warning>) -> Self {
        let total_population = populations.iter().sum::<u64>();
        let mean_population = if populations.is_empty() { 0.0 } else { total_population as f64 / populations.len() as f64 };
        let variance = if populations.is_empty() { 0.0 } else {
            populations.iter()
                .map(|&p| (p as f64 - mean_population).powi(2))
                .sum::<f64>() / populations.len() as f64
        };

        Self {
            total_population,
            mean_population,
            variance,
            deviations: populations.iter().map(|&p| deviation_pct(p, mean_population)).collect(),
            max_deviation: max_deviation_pct(populations, mean_population),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics() {
        let summary = Summary::new(&[90, 110, 100], vec![]);
        assert_eq!(summary.total_population, 300);
        assert_eq!(summary.mean_population, 100.0);
        assert!((summary.variance - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.deviations, vec![-10.0, 10.0, 0.0]);
        assert_eq!(summary.max_deviation, 10.0);
    }

    #[test]
    fn empty_plan() {
        let summary = Summary::new(&[], vec![]);
        assert_eq!(summary.mean_population, 0.0);
        assert_eq!(summary.max_deviation, 0.0);
    }
}
