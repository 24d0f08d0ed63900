// Integration tests for the partition engine:
//   population conservation, division rule, adjacency symmetry, small grids,
//   degenerate adjacency, balancer non-regression, and the warnings a run
//   reports for disconnected splits, missed line targets and invalid geometry.

use geo::{polygon, Coord, MultiPolygon};
use openmander_bisect::{
    bisect_index, AdjacencyConfig, AdjacencyGraph, AdjacencyStrategy, Balancer, BalanceConfig,
    BisectMode, EngineConfig, GeometryError, Redistricter, SplitSpec, Tract, TractId, TractSet,
    Warning,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn square(id: &str, x: f64, y: f64, population: u64) -> Tract {
    Tract::new(id, population, MultiPolygon(vec![polygon![
        (x: x, y: y),
        (x: x + 1.0, y: y),
        (x: x + 1.0, y: y + 1.0),
        (x: x, y: y + 1.0),
    ]])).unwrap()
}

/// Grid of unit squares indexed row-major from the south-west.
fn grid(cols: usize, rows: usize, population: impl Fn(usize) -> u64) -> TractSet {
    TractSet::new((0..cols * rows)
        .map(|i| square(&format!("t{i}"), (i % cols) as f64, (i / cols) as f64, population(i)))
        .collect()
    ).unwrap()
}

fn random_grid(rng: &mut StdRng, cols: usize, rows: usize) -> TractSet {
    let populations = (0..cols * rows).map(|_| rng.random_range(1..=500u64)).collect::<Vec<_>>();
    grid(cols, rows, |i| populations[i])
}

fn indices(tracts: &TractSet, ids: &[TractId]) -> Vec<usize> {
    ids.iter().map(|id| tracts.index_of(id).unwrap()).collect()
}

#[test]
fn population_is_conserved_on_random_grids() {
    let mut rng = StdRng::seed_from_u64(7);
    for mode in [BisectMode::Index, BisectMode::Line] {
        for districts in 1..=7 {
            let tracts = random_grid(&mut rng, 6, 5);
            let mut config = EngineConfig::default();
            config.bisect.mode = mode;

            let plan = Redistricter::new(&tracts, config).unwrap().partition(districts).unwrap();

            assert_eq!(plan.num_districts(), districts);
            assert_eq!(plan.summary().total_population, tracts.total_population());
            assert_eq!(plan.districts().iter().map(|d| d.population).sum::<u64>(), tracts.total_population());

            // Each tract lands in exactly one district.
            assert_eq!(plan.districts().iter().map(|d| d.tract_ids.len()).sum::<usize>(), tracts.len());
            assert_eq!(plan.assignments().len(), tracts.len());
        }
    }
}

#[test]
fn division_rule() {
    for (total, first, second) in [(13, 6, 7), (52, 26, 26), (9, 4, 5)] {
        let spec = SplitSpec::divide(total);
        assert_eq!((spec.first, spec.second), (first, second));
    }
}

#[test]
fn adjacency_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(11);
    let tracts = random_grid(&mut rng, 5, 5);
    let graph = AdjacencyGraph::build(&tracts, &AdjacencyConfig::default());

    for a in 0..graph.node_count() {
        assert!(!graph.contains(a, a));
        for b in graph.edges(a) {
            assert!(graph.contains(b, a), "edge ({a}, {b}) is one-sided");
        }
    }
}

#[test]
fn single_tract_bisection_keeps_it_on_first_side() {
    let split = bisect_index(&[100], [0.5, 0.5]);
    assert_eq!(split.index, 1);
    assert_eq!((split.first_population, split.second_population), (100, 0));
}

#[test]
fn two_by_two_grid_splits_into_two_contiguous_halves() {
    let tracts = grid(2, 2, |_| 100);
    let config = EngineConfig::default();
    let graph = AdjacencyGraph::build(&tracts, &config.adjacency);

    let plan = Redistricter::new(&tracts, config).unwrap().partition(2).unwrap();
    assert_eq!(plan.districts().iter().map(|d| d.population).collect::<Vec<_>>(), vec![200, 200]);
    for district in plan.districts() {
        assert!(graph.is_contiguous(&indices(&tracts, &district.tract_ids)), "district {} is disconnected", district.number);
    }
}

#[test]
fn one_tract_one_district_needs_no_recursion() {
    let tracts = grid(1, 1, |_| 42);
    let plan = Redistricter::new(&tracts, EngineConfig::default()).unwrap().partition(1).unwrap();

    assert_eq!(plan.num_districts(), 1);
    assert_eq!(plan.districts()[0].population, 42);
    assert_eq!(plan.trace().map(|t| t.len()), Some(1));
    assert_eq!(plan.summary().max_deviation, 0.0);
}

#[test]
fn empty_adjacency_falls_back_to_centroid_order() {
    let tracts = grid(4, 3, |i| 50 + i as u64);
    let plan = Redistricter::new(&tracts, EngineConfig::default()).unwrap()
        .with_adjacency(&[])
        .partition(4)
        .unwrap();

    assert!(plan.warnings().iter().any(|w| matches!(w, Warning::SparseAdjacency { .. })));
    assert_eq!(plan.num_districts(), 4);
    assert!(plan.districts().iter().all(|d| !d.tract_ids.is_empty()));
    assert_eq!(plan.summary().total_population, tracts.total_population());
}

#[test]
fn more_districts_than_tracts_reports_empty_districts() {
    let tracts = grid(2, 1, |_| 10);
    let mut config = EngineConfig::default();
    config.balance.enabled = false;

    let plan = Redistricter::new(&tracts, config).unwrap().partition(3).unwrap();
    assert_eq!(plan.num_districts(), 3);
    assert!(plan.warnings().iter().any(|w| matches!(w, Warning::EmptyDistrict { .. })));
    assert_eq!(plan.summary().total_population, 20);
}

#[test]
fn balancer_never_increases_max_deviation() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        let tracts = random_grid(&mut rng, 5, 4);
        let graph = AdjacencyGraph::build(&tracts, &AdjacencyConfig::default());

        // Vertical stripes of uneven width keep every district connected.
        let mut districts = vec![Vec::new(); 3];
        for i in 0..tracts.len() {
            let column = i % 5;
            districts[if column < 1 { 0 } else if column < 3 { 1 } else { 2 }].push(i);
        }

        let config = BalanceConfig { max_iterations: 200, ..Default::default() };
        let report = Balancer::new(&tracts, &graph, true, &config).balance(&mut districts);

        assert!(report.max_deviation_after <= report.max_deviation_before + 1e-9);
        assert_eq!(districts.iter().map(Vec::len).sum::<usize>(), tracts.len());
        assert!(districts.iter().all(|d| !d.is_empty()));
        assert_eq!(report.districts.iter().map(|d| d.population).sum::<u64>(), tracts.total_population());
        for district in &districts {
            assert!(graph.is_contiguous(district));
        }
    }
}

/// A 2x2 mainland of unit squares plus a square island far to the north-east.
fn mainland_and_island() -> Vec<Tract> {
    let mut tracts = (0..4)
        .map(|i| square(&format!("m{i}"), (i % 2) as f64, (i / 2) as f64, 100))
        .collect::<Vec<_>>();
    tracts.push(square("island", 10.0, 10.0, 100));
    tracts
}

fn topological() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.adjacency.strategy = AdjacencyStrategy::Topological;
    config
}

#[test]
fn island_split_reports_disconnected_group() {
    let tracts = TractSet::new(mainland_and_island()).unwrap();
    let plan = Redistricter::new(&tracts, topological()).unwrap().partition(2).unwrap();

    // The island is too small to form a district alone, so it shares one with mainland tracts.
    assert!(
        plan.warnings().iter().any(|w| matches!(w, Warning::DisconnectedSplit { components, .. } if *components >= 2)),
        "{:?}", plan.warnings(),
    );
    assert!(!plan.warnings().iter().any(|w| matches!(w, Warning::SparseAdjacency { .. })));
    assert_eq!(plan.summary().total_population, 500);
}

#[test]
fn line_mode_reports_missed_target() {
    // A 1x3 column: any latitude line leaves 100 / 200, a third off the 150 target.
    let tracts = grid(1, 3, |_| 100);
    let mut config = EngineConfig::default();
    config.bisect.mode = BisectMode::Line;
    config.balance.enabled = false;

    let plan = Redistricter::new(&tracts, config).unwrap().partition(2).unwrap();

    let missed = plan.warnings().iter()
        .find_map(|w| match w {
            Warning::NonConvergentLineSearch { start, end, relative_error } => Some((*start, *end, *relative_error)),
            _ => None,
        })
        .expect("line search warning");
    assert_eq!((missed.0, missed.1), (1, 2));
    assert!((missed.2 - 1.0 / 3.0).abs() < 1e-9, "{}", missed.2);

    let mut populations = plan.districts().iter().map(|d| d.population).collect::<Vec<_>>();
    populations.sort_unstable();
    assert_eq!(populations, vec![100, 200]);
}

#[test]
fn invalid_geometry_is_reported_and_placed() {
    let mut list = mainland_and_island();
    list.pop();
    list.push(Tract::from_parts("bad", 50, Err(GeometryError::Empty), Some(Coord { x: 2.02, y: 0.5 })).unwrap());
    let tracts = TractSet::new(list).unwrap();

    let plan = Redistricter::new(&tracts, EngineConfig::default()).unwrap().partition(2).unwrap();

    let reported = plan.warnings().iter()
        .filter(|w| matches!(w, Warning::InvalidGeometry { tract, .. } if tract.as_str() == "bad"))
        .count();
    assert_eq!(reported, 1);
    assert!(plan.assignments().contains_key(&TractId::from("bad")));
    assert_eq!(plan.summary().total_population, 450);
}
