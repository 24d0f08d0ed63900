use serde::Serialize;

use crate::{bisect::relative_error, config::BisectConfig, geom::Axis, map::TractSet};

/// Split of a group by a line of constant latitude or longitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSplit {
    /// Latitude (for a latitude pass) or longitude of the dividing line.
    pub coordinate: f64,
    /// Tracts entirely north (latitude) or west (longitude) of the line.
    pub first: Vec<usize>,
    /// Every other tract.
    pub second: Vec<usize>,
    pub target: f64,
    pub first_population: u64,
    pub second_population: u64,
    /// Miss of the first side against the target, as a fraction of the target.
    pub relative_error: f64,
    /// Line positions evaluated across both search passes.
    pub iterations: usize,
}

/// Side assignment of a group for one line position.
struct LineSide {
    coordinate: f64,
    population: u64,
    error: f64,
}

/// Searches line positions over a group; the first side grows as the line moves
/// south (latitude) or east (longitude).
struct LineSearch<'a> {
    tracts: &'a TractSet,
    members: &'a [usize],
    axis: Axis,
    target: f64,
    evaluations: usize,
}

impl LineSearch<'_> {
    /// Whether a tract's whole bounding box lies on the first side of the line.
    #[inline]
    fn on_first_side(&self, tract: usize, coordinate: f64) -> bool {
        let bounds = self.tracts.get(tract).bounds();
        match self.axis {
            Axis::Latitude => bounds.min().y >= coordinate,
            Axis::Longitude => bounds.max().x <= coordinate,
        }
    }

    /// +1 when increasing the coordinate grows the first side, -1 otherwise.
    #[inline]
    fn growth(&self) -> f64 {
        match self.axis {
            Axis::Latitude => -1.0,
            Axis::Longitude => 1.0,
        }
    }

    fn evaluate(&mut self, coordinate: f64) -> LineSide {
        self.evaluations += 1;
        let population = self.members.iter()
            .filter(|&&u| self.on_first_side(u, coordinate))
            .map(|&u| self.tracts.get(u).population())
            .sum::<u64>();
        LineSide { coordinate, population, error: relative_error(population, self.target) }
    }
}

/// Find a dividing line whose first side holds close to `target` population.
///
/// Tracts are never split: a tract belongs to the first side only when its
/// whole bounding box lies north (latitude) or west (longitude) of the line.
/// A proportional search runs first; when its best result misses
/// `fallback_tolerance`, a binary search over the same range runs and the
/// better of the two is kept.
pub fn bisect_line(tracts: &TractSet, members: &[usize], axis: Axis, target: f64, config: &BisectConfig) -> LineSplit {
    let total = tracts.population_of(members);
    let Some(bounds) = tracts.bounds_of(members) else {
        return LineSplit {
            coordinate: 0.0,
            first: Vec::new(),
            second: Vec::new(),
            target,
            first_population: 0,
            second_population: 0,
            relative_error: relative_error(0, target),
            iterations: 0,
        }
    };

    let (lo, hi) = match axis {
        Axis::Latitude => (bounds.min().y, bounds.max().y),
        Axis::Longitude => (bounds.min().x, bounds.max().x),
    };
    let span = hi - lo;

    let mut search = LineSearch { tracts, members, axis, target, evaluations: 0 };

    // Proportional pass from the midpoint.
    let mut best = search.evaluate(lo + span / 2.0);
    let (mut coordinate, mut population) = (best.coordinate, best.population);
    for _ in 1..config.max_iterations {
        if best.error <= config.tolerance || total == 0 { break }

        let shortfall = (target - population as f64) / total as f64;
        let next = (coordinate + search.growth() * shortfall * span).clamp(lo, hi);
        if next == coordinate { break }

        let side = search.evaluate(next);
        (coordinate, population) = (side.coordinate, side.population);
        if side.error < best.error { best = side }
    }

    // Binary pass over the full range.
    if best.error > config.fallback_tolerance {
        let (mut low, mut high) = (lo, hi);
        for _ in 0..config.binary_iterations {
            let mid = low + (high - low) / 2.0;
            let side = search.evaluate(mid);
            let grow = (side.population as f64) < target;
            if side.error < best.error { best = side }
            if best.error <= config.tolerance { break }

            // Move toward a larger first side when short, smaller when over.
            if grow == (search.growth() > 0.0) { low = mid } else { high = mid }
        }
    }

    let (first, second): (Vec<usize>, Vec<usize>) = members.iter().copied()
        .partition(|&u| search.on_first_side(u, best.coordinate));

    LineSplit {
        coordinate: best.coordinate,
        first,
        second,
        target,
        first_population: best.population,
        second_population: total - best.population,
        relative_error: best.error,
        iterations: search.evaluations,
    }
}
