use serde::Serialize;

/// How many districts go to each side of one bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitSpec {
    pub total: u32,
    pub first: u32,
    pub second: u32,
    /// Population share of each side: `[first / total, second / total]`.
    pub weights: [f64; 2],
}

impl SplitSpec {
    /// Divide `total` districts into `floor(total / 2)` and the remainder.
    pub fn divide(total: u32) -> Self {
        assert!(total >= 2, "cannot divide {total} districts");

        let first = total / 2;
        let second = total - first;
        Self {
            total,
            first,
            second,
            weights: [first as f64 / total as f64, second as f64 / total as f64],
        }
    }
}
