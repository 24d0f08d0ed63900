mod index;
mod line;

pub use index::{bisect_index, IndexSplit};
pub use line::{bisect_line, LineSplit};

/// Deviation of `population` from `target` as a fraction of the target.
#[inline]
pub(crate) fn relative_error(population: u64, target: f64) -> f64 {
    let diff = (population as f64 - target).abs();
    if target > 0.0 { diff / target } else if diff == 0.0 { 0.0 } else { 1.0 }
}
