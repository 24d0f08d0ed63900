use tracing::{debug, info};

use crate::{
    balance::{deviation_pct, max_deviation_pct, BalanceReport, DistrictBalance, TractMove},
    config::BalanceConfig,
    geom::distance,
    graph::AdjacencyGraph,
    map::TractSet,
};

/// Moves boundary tracts from over- to under-populated districts.
pub struct Balancer<'a> {
    tracts: &'a TractSet,
    graph: &'a AdjacencyGraph,
    reliable: bool,
    config: &'a BalanceConfig,
}

impl<'a> Balancer<'a> {
    /// `reliable` tells whether the adjacency graph can be trusted for border and contiguity checks.
    pub fn new(tracts: &'a TractSet, graph: &'a AdjacencyGraph, reliable: bool, config: &'a BalanceConfig) -> Self {
        Self { tracts, graph, reliable, config }
    }

    /// Rebalance district member lists in place (district `i + 1` is `districts[i]`).
    ///
    /// Each iteration moves one tract out of the most over-populated district.
    /// The most under-populated district receives it when a move is possible;
    /// otherwise the next least populated one is tried, and so on. A move must
    /// strictly lower the combined deviation of the pair, must not raise the
    /// maximum deviation, must not empty the source district and, while the
    /// graph is trusted, must take a tract bordering the receiving district whose
    /// removal keeps the source connected. Stops when every district is within
    /// tolerance or no such move exists.
    pub fn balance(&self, districts: &mut [Vec<usize>]) -> BalanceReport {
        let mut populations = districts.iter().map(|d| self.tracts.population_of(d)).collect::<Vec<_>>();
        let target = if districts.is_empty() { 0.0 } else { populations.iter().sum::<u64>() as f64 / districts.len() as f64 };
        let tolerance = self.config.tolerance * target;
        let max_deviation_before = max_deviation_pct(&populations, target);

        let mut moves = Vec::new();
        let mut iterations = 0;
        let mut converged = within_tolerance(&populations, target, tolerance);

        while !converged && iterations < self.config.max_iterations {
            iterations += 1;

            let over = extreme(&populations, |a, b| a > b);
            let before = max_deviation_pct(&populations, target);

            // Most under-populated receiver first; a receiver not bordering `over` yields to the next.
            let mut receivers = (0..populations.len()).filter(|&d| d != over).collect::<Vec<_>>();
            receivers.sort_by_key(|&d| (populations[d], d));
            let found = receivers.into_iter().find_map(|under| {
                let tract = self.best_move(districts, &populations, over, under, target)?;
                let population = self.tracts.get(tract).population();
                let mut trial = populations.clone();
                trial[over] -= population;
                trial[under] += population;
                (max_deviation_pct(&trial, target) <= before).then_some((under, tract))
            });

            let Some((under, tract)) = found else {
                debug!("[balance] no improving move out of district {}", over + 1);
                break
            };

            let population = self.tracts.get(tract).population();
            populations[over] -= population;
            populations[under] += population;

            districts[over].retain(|&u| u != tract);
            districts[under].push(tract);
            moves.push(TractMove {
                tract: self.tracts.get(tract).id().clone(),
                population,
                from: over as u32 + 1,
                to: under as u32 + 1,
            });

            converged = within_tolerance(&populations, target, tolerance);
        }

        let max_deviation_after = max_deviation_pct(&populations, target);
        info!(
            "[balance] {} moves in {iterations} iterations, max deviation {max_deviation_before:.3}% -> {max_deviation_after:.3}%",
            moves.len(),
        );

        BalanceReport {
            moves,
            iterations,
            converged,
            target,
            max_deviation_before,
            max_deviation_after,
            districts: populations.iter().enumerate()
                .map(|(i, &population)| DistrictBalance {
                    district: i as u32 + 1,
                    population,
                    deviation: deviation_pct(population, target),
                })
                .collect(),
        }
    }

    /// Pick the tract to move from `over` to `under`, if any move improves the pair.
    fn best_move(&self, districts: &[Vec<usize>], populations: &[u64], over: usize, under: usize, target: f64) -> Option<usize> {
        // Never empty a district.
        if districts[over].len() <= 1 { return None }

        let (o, u) = (populations[over] as f64, populations[under] as f64);
        let current = (o - target).abs() + (u - target).abs();
        let ideal = (o - target).min(target - u);

        // An empty district has no border, so any tract may seed it.
        let detached = self.config.allow_detached_moves || !self.reliable || districts[under].is_empty();
        let in_over = self.graph.mask(&districts[over]);
        let in_under = self.graph.mask(&districts[under]);
        let receiver = self.tracts.centroid_of(&districts[under]);

        districts[over].iter().copied()
            .filter(|&t| {
                let p = self.tracts.get(t).population() as f64;
                (o - p - target).abs() + (u + p - target).abs() < current
            })
            .filter(|&t| detached || (self.graph.borders(t, &in_under) && self.graph.removal_keeps_contiguity(&in_over, t)))
            .map(|t| {
                let closeness = receiver.map_or(0.0, |c| distance(self.tracts.get(t).centroid(), c));
                let fit = (self.tracts.get(t).population() as f64 - ideal).abs();
                (closeness, fit, t)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)))
            .map(|(_, _, t)| t)
    }
}

fn within_tolerance(populations: &[u64], target: f64, tolerance: f64) -> bool {
    populations.iter().all(|&p| (p as f64 - target).abs() <= tolerance)
}

/// Index of the first population preferred by `better` over all others.
fn extreme(populations: &[u64], better: impl Fn(u64, u64) -> bool) -> usize {
    let mut best = 0;
    for (i, &p) in populations.iter().enumerate().skip(1) {
        if better(p, populations[best]) { best = i }
    }
    best
}
