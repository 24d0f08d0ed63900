use std::sync::Arc;

use tracing::info;

use crate::{
    balance::{BalanceReport, Balancer},
    config::EngineConfig,
    county::assign_by_unit,
    error::PartitionError,
    graph::{unknown_neighbors, AdjacencyCache, AdjacencyGraph, RunId},
    io::NeighborRecord,
    map::TractSet,
    partition::{push_warning, Controller},
    plan::Plan,
    sequence::{FallbackChain, SequenceContext},
    warning::Warning,
};

/// Top-level entry point: partitions a tract set into districts.
pub struct Redistricter<'a> {
    tracts: &'a TractSet,
    config: EngineConfig,
    neighbors: Option<&'a [NeighborRecord]>,
    cache: Option<(&'a AdjacencyCache, RunId)>,
}

/// Adjacency graph of a run and what was noticed while preparing it.
struct Prepared {
    graph: Arc<AdjacencyGraph>,
    reliable: bool,
    warnings: Vec<Warning>,
}

impl<'a> Redistricter<'a> {
    /// Create a redistricter over a tract set, rejecting invalid configuration.
    pub fn new(tracts: &'a TractSet, config: EngineConfig) -> Result<Self, PartitionError> {
        config.validate()?;
        Ok(Self { tracts, config, neighbors: None, cache: None })
    }

    /// Use precomputed neighbor records instead of deriving adjacency from geometry.
    pub fn with_adjacency(mut self, records: &'a [NeighborRecord]) -> Self {
        self.neighbors = Some(records);
        self
    }

    /// Share built adjacency graphs through a run-scoped cache.
    pub fn with_cache(mut self, cache: &'a AdjacencyCache, run: RunId) -> Self {
        self.cache = Some((cache, run));
        self
    }

    #[inline] pub fn config(&self) -> &EngineConfig { &self.config }

    #[inline] pub fn tracts(&self) -> &TractSet { self.tracts }

    /// Partition by recursive bisection, then balance populations.
    pub fn partition(&self, districts: u32) -> Result<Plan, PartitionError> {
        self.check(districts)?;
        info!("[redistrict] partitioning {} tracts into {districts} districts", self.tracts.len());

        let Prepared { graph, reliable, mut warnings } = self.prepare();
        let ctx = SequenceContext {
            tracts: self.tracts,
            graph: &graph,
            adjacency: &self.config.adjacency,
            config: &self.config.sequence,
            reliable,
        };

        let run = Controller::new(ctx, FallbackChain::from_config(&self.config.sequence), &self.config.bisect, &self.config.controller)
            .run(districts);
        let mut assignments = run.assignments(districts);
        warnings.extend(run.warnings);

        let balance = self.balance(&graph, reliable, &mut assignments, &mut warnings);
        let trace = self.config.controller.record_trace.then_some(run.trace);

        Ok(Plan::new(self.tracts, &assignments, trace, balance, warnings))
    }

    /// Assign whole administrative units to districts, then balance populations.
    pub fn partition_by_unit(&self, districts: u32) -> Result<Plan, PartitionError> {
        self.check(districts)?;
        info!("[redistrict] assigning units of {} tracts to {districts} districts", self.tracts.len());

        let Prepared { graph, reliable, mut warnings } = self.prepare();
        let mut assignments = assign_by_unit(self.tracts, districts, &self.config.balance).districts;
        for (i, members) in assignments.iter().enumerate() {
            if members.is_empty() {
                push_warning(&mut warnings, Warning::EmptyDistrict { district: i as u32 + 1 });
            }
        }

        let balance = self.balance(&graph, reliable, &mut assignments, &mut warnings);
        Ok(Plan::new(self.tracts, &assignments, None, balance, warnings))
    }

    /// Reject inputs no run can be made from.
    fn check(&self, districts: u32) -> Result<(), PartitionError> {
        if districts == 0 { return Err(PartitionError::ZeroDistricts) }
        if self.tracts.is_empty() { return Err(PartitionError::EmptyTractSet { districts }) }
        Ok(())
    }

    /// Build (or fetch) the adjacency graph and check its quality.
    fn prepare(&self) -> Prepared {
        let mut warnings = Vec::new();

        for tract in self.tracts.tracts() {
            if let Some(error) = tract.geometry_error() {
                push_warning(&mut warnings, Warning::InvalidGeometry { tract: tract.id().clone(), reason: error.to_string() });
            }
        }

        let build = || match self.neighbors {
            Some(records) => AdjacencyGraph::from_table(self.tracts, records).0,
            None => AdjacencyGraph::build(self.tracts, &self.config.adjacency),
        };
        let graph = match &self.cache {
            Some((cache, run)) => cache.get_or_insert_with(run, build),
            None => Arc::new(build()),
        };

        // Checked on every run, so a cached graph still reports bad records.
        if let Some(records) = self.neighbors {
            unknown_neighbors(self.tracts, records).into_iter().for_each(|w| push_warning(&mut warnings, w));
        }

        let quality = graph.quality();
        let reliable = quality.is_reliable(&self.config.adjacency);
        info!(
            "[redistrict] adjacency: average degree {:.2}, coverage {:.1}%, {} isolated",
            quality.average_degree, quality.coverage * 100.0, quality.isolated,
        );
        if !reliable {
            push_warning(&mut warnings, Warning::SparseAdjacency { average_degree: quality.average_degree, coverage: quality.coverage });
        }

        Prepared { graph, reliable, warnings }
    }

    /// Run the balancing pass when enabled.
    fn balance(
        &self,
        graph: &AdjacencyGraph,
        reliable: bool,
        assignments: &mut [Vec<usize>],
        warnings: &mut Vec<Warning>,
    ) -> Option<BalanceReport> {
        if !self.config.balance.enabled || assignments.len() < 2 { return None }

        let report = Balancer::new(self.tracts, graph, reliable, &self.config.balance).balance(assignments);
        if !report.converged {
            push_warning(warnings, Warning::BalanceIncomplete { max_deviation: report.max_deviation_after });
        }
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;
    use crate::map::{Tract, TractId};

    fn square(id: &str, x: f64, y: f64, population: u64) -> Tract {
        Tract::new(id, population, MultiPolygon(vec![polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
        ]])).unwrap()
    }

    /// `cols` x `rows` grid of unit squares, 100 people each, indexed row-major from the south-west.
    fn grid(cols: usize, rows: usize) -> TractSet {
        TractSet::new((0..cols * rows)
            .map(|i| square(&format!("t{i}"), (i % cols) as f64, (i / cols) as f64, 100))
            .collect()
        ).unwrap()
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let tracts = grid(2, 2);
        let engine = Redistricter::new(&tracts, EngineConfig::default()).unwrap();
        assert_eq!(engine.partition(0).unwrap_err(), PartitionError::ZeroDistricts);

        let empty = TractSet::new(vec![]).unwrap();
        let engine = Redistricter::new(&empty, EngineConfig::default()).unwrap();
        assert_eq!(engine.partition(3).unwrap_err(), PartitionError::EmptyTractSet { districts: 3 });

        let mut config = EngineConfig::default();
        config.balance.tolerance = -1.0;
        assert!(matches!(Redistricter::new(&tracts, config), Err(PartitionError::InvalidConfig(_))));
    }

    #[test]
    fn partitions_grid_into_equal_districts() {
        let tracts = grid(4, 4);
        let plan = Redistricter::new(&tracts, EngineConfig::default()).unwrap().partition(4).unwrap();

        assert_eq!(plan.num_districts(), 4);
        for district in plan.districts() {
            assert_eq!(district.population, 400);
        }
        assert_eq!(plan.summary().max_deviation, 0.0);
        assert_eq!(plan.summary().total_population, 1600);
        assert!(plan.trace().is_some_and(|t| !t.is_empty()));
    }

    #[test]
    fn table_adjacency_is_used() {
        let tracts = grid(2, 1);
        let records = [NeighborRecord { tract_id: "t0".into(), neighbor_tract_id: "t1".into() }];
        let engine = Redistricter::new(&tracts, EngineConfig::default()).unwrap().with_adjacency(&records);

        let Prepared { graph, reliable, warnings } = engine.prepare();
        assert!(reliable);
        assert!(warnings.is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn empty_table_reports_sparse_adjacency() {
        let tracts = grid(3, 3);
        let plan = Redistricter::new(&tracts, EngineConfig::default()).unwrap()
            .with_adjacency(&[])
            .partition(3)
            .unwrap();

        assert!(plan.warnings().iter().any(|w| matches!(w, Warning::SparseAdjacency { .. })));
        assert_eq!(plan.summary().total_population, 900);
        assert_eq!(plan.districts().iter().map(|d| d.tract_ids.len()).sum::<usize>(), 9);
    }

    #[test]
    fn cache_reuses_graph_within_a_run() {
        let tracts = grid(3, 3);
        let cache = AdjacencyCache::new();
        let run = RunId::from("run-1");

        let engine = Redistricter::new(&tracts, EngineConfig::default()).unwrap().with_cache(&cache, run.clone());
        let first = engine.prepare().graph;
        let second = engine.prepare().graph;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&run).is_some());
    }

    #[test]
    fn cached_table_runs_keep_unknown_neighbor_warnings() {
        let tracts = grid(2, 2);
        let records = [
            NeighborRecord { tract_id: "t0".into(), neighbor_tract_id: "t1".into() },
            NeighborRecord { tract_id: "t2".into(), neighbor_tract_id: "t3".into() },
            NeighborRecord { tract_id: "t0".into(), neighbor_tract_id: "t2".into() },
            NeighborRecord { tract_id: "t1".into(), neighbor_tract_id: "ghost".into() },
        ];
        let cache = AdjacencyCache::new();
        let engine = Redistricter::new(&tracts, EngineConfig::default()).unwrap()
            .with_adjacency(&records)
            .with_cache(&cache, RunId::from("run-1"));

        for _ in 0..2 {
            let plan = engine.partition(2).unwrap();
            let unknown = plan.warnings().iter()
                .filter(|w| matches!(w, Warning::UnknownNeighbor { tract } if tract.as_str() == "ghost"))
                .count();
            assert_eq!(unknown, 1);
            assert_eq!(plan.summary().total_population, 400);
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn trace_is_optional() {
        let tracts = grid(2, 2);
        let mut config = EngineConfig::default();
        config.controller.record_trace = false;

        let plan = Redistricter::new(&tracts, config).unwrap().partition(2).unwrap();
        assert!(plan.trace().is_none());
    }

    #[test]
    fn balancing_can_be_disabled() {
        let tracts = grid(2, 2);
        let mut config = EngineConfig::default();
        config.balance.enabled = false;

        let plan = Redistricter::new(&tracts, config).unwrap().partition(2).unwrap();
        assert!(plan.balance().is_none());

        let plan = Redistricter::new(&tracts, EngineConfig::default()).unwrap().partition(1).unwrap();
        assert!(plan.balance().is_none());
    }

    #[test]
    fn unit_path_keeps_units_whole() {
        let tracts = TractSet::new(vec![
            square("a1", 0.0, 0.0, 100).with_unit("A"),
            square("a2", 1.0, 0.0, 100).with_unit("A"),
            square("b1", 0.0, 1.0, 100).with_unit("B"),
            square("b2", 1.0, 1.0, 100).with_unit("B"),
        ]).unwrap();

        let mut config = EngineConfig::default();
        config.balance.enabled = false;
        let plan = Redistricter::new(&tracts, config).unwrap().partition_by_unit(2).unwrap();

        let assignments = plan.assignments();
        assert_eq!(assignments[&TractId::from("a1")], assignments[&TractId::from("a2")]);
        assert_eq!(assignments[&TractId::from("b1")], assignments[&TractId::from("b2")]);
        assert_ne!(assignments[&TractId::from("a1")], assignments[&TractId::from("b1")]);
        assert!(plan.trace().is_none());
    }
}
