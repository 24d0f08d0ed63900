use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::BalanceConfig,
    map::{TractId, TractSet, UnitId},
};

/// The unit a tract belongs to; a tract without an administrative unit forms its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum UnitKey {
    Unit(UnitId),
    Tract(TractId),
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKey::Unit(id) => write!(f, "{id}"),
            UnitKey::Tract(id) => write!(f, "tract {id}"),
        }
    }
}

/// A whole administrative unit and its tracts.
#[derive(Debug, Clone)]
struct Unit {
    key: UnitKey,
    members: Vec<usize>,
    population: u64,
}

/// Whole-unit district assignment, before tract-level balancing.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitAssignment {
    /// Member lists indexed by district number - 1.
    pub districts: Vec<Vec<usize>>,
    /// Units in each district, by key.
    pub units: Vec<Vec<UnitKey>>,
    /// Whole-unit moves made while balancing.
    pub unit_moves: usize,
}

/// Assign whole administrative units to `districts` districts.
///
/// Units are placed largest first (ties by key) into the least populated
/// district; a unit at or above the target population takes the
/// lowest-numbered empty district if one is left. While a district is outside
/// tolerance, the smallest unit of the most populated district that fits in its
/// excess moves whole to the least populated district. Units are never split
/// and no district is emptied.
pub fn assign_by_unit(tracts: &TractSet, districts: u32, config: &BalanceConfig) -> UnitAssignment {
    assert!(districts >= 1, "need at least one district");
    let k = districts as usize;

    let mut grouped = BTreeMap::<UnitKey, Vec<usize>>::new();
    for (i, tract) in tracts.tracts().iter().enumerate() {
        let key = match tract.unit() {
            Some(unit) => UnitKey::Unit(unit.clone()),
            None => UnitKey::Tract(tract.id().clone()),
        };
        grouped.entry(key).or_default().push(i);
    }

    let mut units = grouped.into_iter()
        .map(|(key, members)| Unit { population: tracts.population_of(&members), key, members })
        .collect::<Vec<_>>();
    units.sort_by(|a, b| b.population.cmp(&a.population).then_with(|| a.key.cmp(&b.key)));

    let target = tracts.total_population() as f64 / k as f64;
    let tolerance = config.tolerance * target;

    // Greedy placement, largest unit first.
    let mut placement = Placement::new(k);
    for (u, unit) in units.iter().enumerate() {
        let empty = placement.counts.iter().position(|&c| c == 0);
        let district = match empty {
            Some(d) if unit.population as f64 >= target => d,
            _ => least(&placement.populations),
        };
        placement.place(u, unit.population, district);
    }

    let unit_moves = placement.rebalance(&units, target, tolerance, config.max_iterations);

    let mut lists = vec![Vec::new(); k];
    let mut keys = vec![Vec::new(); k];
    for (unit, &district) in units.into_iter().zip(&placement.district) {
        lists[district].extend(unit.members);
        keys[district].push(unit.key);
    }
    lists.iter_mut().for_each(|list| list.sort_unstable());

    info!("[county] {} units into {districts} districts, {unit_moves} unit moves", placement.district.len());
    UnitAssignment { districts: lists, units: keys, unit_moves }
}

/// District of each placed unit, with running district totals.
#[derive(Debug, Clone, Default)]
struct Placement {
    district: Vec<usize>,
    populations: Vec<u64>,
    counts: Vec<usize>,
}

impl Placement {
    fn new(districts: usize) -> Self {
        Self { district: Vec::new(), populations: vec![0; districts], counts: vec![0; districts] }
    }

    /// Place the next unit (units are placed in index order).
    fn place(&mut self, unit: usize, population: u64, district: usize) {
        debug_assert_eq!(unit, self.district.len());
        self.district.push(district);
        self.populations[district] += population;
        self.counts[district] += 1;
    }

    fn relocate(&mut self, unit: usize, population: u64, to: usize) {
        let from = self.district[unit];
        self.district[unit] = to;
        self.populations[from] -= population;
        self.populations[to] += population;
        self.counts[from] -= 1;
        self.counts[to] += 1;
    }

    /// Move whole units out of the most populated district until every district
    /// is within tolerance or no unit fits. Returns the number of moves.
    fn rebalance(&mut self, units: &[Unit], target: f64, tolerance: f64, max_iterations: usize) -> usize {
        let mut moves = 0;
        for _ in 0..max_iterations {
            if self.populations.iter().all(|&p| (p as f64 - target).abs() <= tolerance) { break }

            let over = most(&self.populations);
            let under = least(&self.populations);
            if over == under || self.counts[over] <= 1 { break }

            let excess = self.populations[over] as f64 - target;
            let candidate = (0..units.len())
                .filter(|&u| self.district[u] == over)
                .filter(|&u| units[u].population > 0 && units[u].population as f64 <= excess)
                .min_by(|&a, &b| units[a].population.cmp(&units[b].population).then_with(|| units[a].key.cmp(&units[b].key)));

            let Some(u) = candidate else { break };
            debug!("[county] moving unit {} ({}) from district {} to {}", units[u].key, units[u].population, over + 1, under + 1);
            self.relocate(u, units[u].population, under);
            moves += 1;
        }
        moves
    }
}

/// Index of the least populated district (lowest index on ties).
fn least(populations: &[u64]) -> usize {
    populations.iter().enumerate()
        .min_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)))
        .map_or(0, |(i, _)| i)
}

/// Index of the most populated district (lowest index on ties).
fn most(populations: &[u64]) -> usize {
    populations.iter().enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;
    use crate::map::Tract;

    /// Tracts in a row, each given as (population, unit).
    fn tracts(spec: &[(u64, Option<&str>)]) -> TractSet {
        TractSet::new(spec.iter().enumerate()
            .map(|(i, &(population, unit))| {
                let x = i as f64;
                let tract = Tract::new(format!("t{i}"), population, MultiPolygon(vec![polygon![
                    (x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0),
                ]])).unwrap();
                match unit { Some(unit) => tract.with_unit(unit), None => tract }
            })
            .collect()
        ).unwrap()
    }

    #[test]
    fn units_are_never_split() {
        let set = tracts(&[
            (30, Some("A")), (30, Some("A")),
            (20, Some("B")), (20, Some("B")),
            (25, Some("C")),
            (15, Some("D")),
        ]);
        let result = assign_by_unit(&set, 2, &BalanceConfig::default());

        let district_of = |i: usize| result.districts.iter().position(|d| d.contains(&i));
        assert_eq!(district_of(0), district_of(1));
        assert_eq!(district_of(2), district_of(3));
        assert_eq!(result.districts.iter().map(Vec::len).sum::<usize>(), 6);

        // A: 60, B: 40, C: 25, D: 15 -> {A, D} = 75 and {B, C} = 65.
        let populations = result.districts.iter().map(|d| set.population_of(d)).collect::<Vec<_>>();
        assert_eq!(populations, vec![75, 65]);
    }

    #[test]
    fn large_units_take_empty_districts_first() {
        let set = tracts(&[(100, Some("big")), (100, Some("huge")), (10, Some("small"))]);
        let result = assign_by_unit(&set, 3, &BalanceConfig::default());

        assert_eq!(result.units[0], vec![UnitKey::Unit(UnitId::from("big"))]);
        assert_eq!(result.units[1], vec![UnitKey::Unit(UnitId::from("huge"))]);
        assert_eq!(result.units[2], vec![UnitKey::Unit(UnitId::from("small"))]);
    }

    #[test]
    fn tracts_without_unit_stand_alone() {
        let set = tracts(&[(10, None), (10, None), (10, Some("x"))]);
        let result = assign_by_unit(&set, 3, &BalanceConfig::default());
        assert!(result.districts.iter().all(|d| d.len() == 1));
        assert!(result.units.iter().flatten().any(|k| *k == UnitKey::Tract(TractId::from("t0"))));
    }

    #[test]
    fn rebalance_moves_smallest_fitting_unit() {
        let units = [("a", 40), ("b", 10), ("c", 6), ("d", 24)]
            .map(|(key, population)| Unit { key: UnitKey::Unit(UnitId::from(key)), members: vec![], population });

        // District 1 holds a, b and c (56); district 2 holds d (24); target 40.
        let mut placement = Placement::new(2);
        for (u, district) in [0, 0, 0, 1].into_iter().enumerate() {
            placement.place(u, units[u].population, district);
        }

        let moves = placement.rebalance(&units, 40.0, 0.0, 100);
        // Excess 16: c (6) moves first, then the excess of 10 admits b.
        assert_eq!(moves, 2);
        assert_eq!(placement.district, vec![0, 1, 1, 1]);
        assert_eq!(placement.populations, vec![40, 40]);
    }

    #[test]
    fn largest_first_placement_balances() {
        // X(50) -> 1, Y(30) -> 2, Z(20) -> 2, V(4) -> 1, W(4) -> 2.
        let set = tracts(&[(50, Some("X")), (30, Some("Y")), (20, Some("Z")), (4, Some("W")), (4, Some("V"))]);
        let result = assign_by_unit(&set, 2, &BalanceConfig { tolerance: 0.0, ..Default::default() });

        let populations = result.districts.iter().map(|d| set.population_of(d)).collect::<Vec<_>>();
        assert_eq!(populations, vec![54, 54]);
        assert_eq!(result.unit_moves, 0);
    }
}
