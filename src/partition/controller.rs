use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    bisect::{bisect_index, bisect_line},
    config::{BisectConfig, BisectMode, ControllerConfig},
    geom::Axis,
    partition::{DistrictGroup, GroupSnapshot, SplitSpec, StepLog},
    sequence::{FallbackChain, SequenceContext},
    warning::Warning,
};

/// Result of a recursive bisection run.
#[derive(Debug, Clone)]
pub struct PartitionRun {
    /// Terminal groups, ordered by district number.
    pub districts: Vec<DistrictGroup>,
    /// Groups left unsplit when the split cap was reached.
    pub pending: Vec<DistrictGroup>,
    pub trace: StepLog,
    pub warnings: Vec<Warning>,
    /// Number of splits performed.
    pub iterations: usize,
}

impl PartitionRun {
    /// Member lists indexed by district number - 1. A pending group's tracts go to its first district.
    pub fn assignments(&self, districts: u32) -> Vec<Vec<usize>> {
        let mut lists = vec![Vec::new(); districts as usize];
        for group in self.districts.iter().chain(&self.pending) {
            lists[group.start() as usize - 1].extend_from_slice(group.members());
        }
        lists
    }
}

/// Children of one split and what was noticed while making it.
struct SplitOutcome {
    children: [DistrictGroup; 2],
    warnings: Vec<Warning>,
    description: String,
}

/// Drives recursive bisection, one recursion level at a time.
pub struct Controller<'a> {
    ctx: SequenceContext<'a>,
    chain: FallbackChain,
    bisect: &'a BisectConfig,
    config: &'a ControllerConfig,
}

impl<'a> Controller<'a> {
    pub fn new(ctx: SequenceContext<'a>, chain: FallbackChain, bisect: &'a BisectConfig, config: &'a ControllerConfig) -> Self {
        Self { ctx, chain, bisect, config }
    }

    /// Partition every tract into `districts` groups.
    pub fn run(&self, districts: u32) -> PartitionRun {
        self.run_group(DistrictGroup::root(self.ctx.tracts, districts))
    }

    /// Recursively bisect `root` until every group covers a single district.
    pub fn run_group(&self, root: DistrictGroup) -> PartitionRun {
        let mut done = Vec::new();
        let mut pending = Vec::new();
        let mut warnings = Vec::new();
        let mut trace = StepLog::default();
        let mut iterations = 0;

        let mut level = vec![root];
        while !level.is_empty() {
            let depth = level[0].depth();
            let allowed = self.config.max_iterations.saturating_sub(iterations);
            let to_split = level.iter().filter(|g| !g.is_terminal()).take(allowed).collect::<Vec<_>>();
            info!("[partition] depth {depth}: {} groups, {} to split", level.len(), to_split.len());

            // Groups of one level are independent.
            let outcomes: Vec<SplitOutcome> = if self.config.parallel {
                to_split.par_iter().map(|group| self.split(group)).collect()
            } else {
                to_split.iter().map(|group| self.split(group)).collect()
            };
            iterations += outcomes.len();

            // Merge in level order so the trace and warnings are deterministic.
            let snapshots: Vec<GroupSnapshot> = if self.config.record_trace { level.iter().map(DistrictGroup::snapshot).collect() } else { Vec::new() };
            let mut outcomes = outcomes.into_iter();
            let mut next = Vec::new();
            for (i, group) in level.into_iter().enumerate() {
                let description = if group.is_terminal() {
                    if group.members().is_empty() {
                        push_warning(&mut warnings, Warning::EmptyDistrict { district: group.start() });
                    }
                    let description = format!(
                        "district {} assigned {} tracts (population {})",
                        group.start(), group.members().len(), group.population(),
                    );
                    done.push(group);
                    description
                } else if let Some(outcome) = outcomes.next() {
                    outcome.warnings.into_iter().for_each(|w| push_warning(&mut warnings, w));
                    next.extend(outcome.children);
                    outcome.description
                } else {
                    pending.push(group);
                    continue
                };

                if self.config.record_trace {
                    let forest = done.iter().chain(&next).chain(&pending)
                        .map(DistrictGroup::snapshot)
                        .chain(snapshots[i + 1..].iter().cloned())
                        .collect();
                    trace.push(depth, forest, description);
                }
            }

            level = next;
        }

        if !pending.is_empty() {
            push_warning(&mut warnings, Warning::MaxIterationsReached { iterations, pending: pending.len() });
        }

        done.sort_by_key(DistrictGroup::start);
        pending.sort_by_key(DistrictGroup::start);
        PartitionRun { districts: done, pending, trace, warnings, iterations }
    }

    /// Bisect one group along the axis of its depth.
    fn split(&self, group: &DistrictGroup) -> SplitOutcome {
        let spec = SplitSpec::divide(group.total_districts());
        let axis = Axis::at_depth(self.config.start_axis, group.depth());
        let (start, end) = (group.start(), group.end());
        let tracts = self.ctx.tracts;
        let mut warnings = Vec::new();

        let (first, second, description) = match self.bisect.mode {
            BisectMode::Index => {
                let sequenced = self.chain.run(&self.ctx, group.members(), axis);
                for fallback in sequenced.fallbacks {
                    warnings.push(Warning::SequenceFallback { start, end, strategy: fallback.strategy, reason: fallback.reason });
                }

                let populations = sequenced.order.iter().map(|&u| tracts.get(u).population()).collect::<Vec<_>>();
                let split = bisect_index(&populations, spec.weights);
                let mut first = sequenced.order;
                let second = first.split_off(split.index);

                let description = format!(
                    "districts {start}-{end} split {}/{} along {axis} ({} order, index {}): population {} / {} (target {:.0})",
                    spec.first, spec.second, sequenced.strategy, split.index,
                    split.first_population, split.second_population, split.target,
                );
                (first, second, description)
            }
            BisectMode::Line => {
                let target = group.population() as f64 * spec.weights[0];
                let split = bisect_line(tracts, group.members(), axis, target, self.bisect);
                if split.relative_error > self.bisect.fallback_tolerance {
                    warnings.push(Warning::NonConvergentLineSearch { start, end, relative_error: split.relative_error });
                }

                let description = format!(
                    "districts {start}-{end} split {}/{} along {axis} at {:.6}: population {} / {} (target {:.0})",
                    spec.first, spec.second, split.coordinate,
                    split.first_population, split.second_population, split.target,
                );
                (split.first, split.second, description)
            }
        };
        debug!("[partition] {description}");

        let children = [
            DistrictGroup::new(tracts, start, start + spec.first - 1, first, group.depth() + 1),
            DistrictGroup::new(tracts, start + spec.first, end, second, group.depth() + 1),
        ];

        // Disconnected children are reported, never rejected.
        if self.config.validate_contiguity && self.ctx.reliable {
            for child in &children {
                let components = self.ctx.graph.components(child.members()).len();
                if components > 1 {
                    warnings.push(Warning::DisconnectedSplit { start: child.start(), end: child.end(), components });
                }
            }
        }

        SplitOutcome { children, warnings, description }
    }
}

/// Record a warning and emit it through `tracing`.
pub(crate) fn push_warning(warnings: &mut Vec<Warning>, warning: Warning) {
    warning.log();
    warnings.push(warning);
}
