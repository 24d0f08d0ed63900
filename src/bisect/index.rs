use serde::Serialize;

/// Split of an ordered tract sequence at a single index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexSplit {
    /// Number of tracts (from the front of the sequence) on the first side.
    pub index: usize,
    /// Population the first side was aiming for.
    pub target: f64,
    pub first_population: u64,
    pub second_population: u64,
}

/// Find the split index whose prefix population is closest to `total * r1 / (r1 + r2)`.
///
/// With two or more tracts each side keeps at least one tract; ties go to the
/// earliest index. An empty sequence splits at 0; a single tract stays on the first side.
pub fn bisect_index(populations: &[u64], ratio: [f64; 2]) -> IndexSplit {
    assert!(ratio.iter().all(|r| *r >= 0.0) && ratio[0] + ratio[1] > 0.0, "ratio weights must be non-negative with a positive sum");

    let total = populations.iter().sum::<u64>();
    let target = total as f64 * ratio[0] / (ratio[0] + ratio[1]);

    let index = match populations.len() {
        0 => 0,
        1 => 1,
        n => {
            let mut prefix = 0u64;
            let mut best = (f64::INFINITY, 1);
            for (k, &population) in populations[..n - 1].iter().enumerate() {
                prefix += population;
                let error = (prefix as f64 - target).abs();
                if error < best.0 { best = (error, k + 1) }
            }
            best.1
        }
    };

    let first_population = populations[..index].iter().sum::<u64>();
    IndexSplit { index, target, first_population, second_population: total - first_population }
}
