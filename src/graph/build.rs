use geo::{Rect, Relate};
use rayon::prelude::*;
use tracing::info;

use crate::{
    config::{AdjacencyConfig, AdjacencyStrategy},
    geom::{distance, padded_envelope},
    graph::AdjacencyGraph,
    map::{Tract, TractSet},
};

impl AdjacencyGraph {
    /// Derive the adjacency graph of a tract set from its geometry.
    pub fn build(tracts: &TractSet, config: &AdjacencyConfig) -> Self {
        let pairs: Vec<(usize, usize)> = if config.parallel {
            (0..tracts.len()).into_par_iter()
                .flat_map_iter(|i| candidate_pairs(tracts, i, config))
                .collect()
        } else {
            (0..tracts.len())
                .flat_map(|i| candidate_pairs(tracts, i, config))
                .collect()
        };

        let graph = Self::from_pairs(tracts.len(), pairs);
        info!("[graph] {:?} adjacency: {} tracts, {} edges", config.strategy, graph.node_count(), graph.edge_count());
        graph
    }
}

/// Adjacent pairs `(i, j)` found by searching around tract `i`.
fn candidate_pairs(tracts: &TractSet, i: usize, config: &AdjacencyConfig) -> Vec<(usize, usize)> {
    let tract = tracts.get(i);

    // Centroid footprints only meet their neighbors through the proximity test.
    let padding = if tract.has_exact_geometry() { config.bbox_tolerance } else { config.proximity_threshold };

    tracts.query(&padded_envelope(&tract.bounds(), padding))
        .filter(|&j| j != i)
        .filter(|&j| {
            // Check each exact pair once; pairs involving a fallback tract may be found from either side.
            j > i || !tract.has_exact_geometry() || !tracts.get(j).has_exact_geometry()
        })
        .filter(|&j| is_adjacent(tract, tracts.get(j), config))
        .map(|j| (i, j))
        .collect()
}

/// Decide whether two candidate tracts touch.
fn is_adjacent(a: &Tract, b: &Tract, config: &AdjacencyConfig) -> bool {
    if !a.has_exact_geometry() || !b.has_exact_geometry() {
        return corners_within(a, b, config.proximity_threshold)
    }

    match config.strategy {
        AdjacencyStrategy::Heuristic => {
            shares_box_edge(&a.bounds(), &b.bounds(), config.bbox_tolerance)
                || boxes_overlap(&a.bounds(), &b.bounds())
                || corners_within(a, b, config.proximity_threshold)
        }
        AdjacencyStrategy::Topological => {
            // Rook: touching, with boundary/boundary intersection of dimension 1.
            // Queen: any touching boundary.
            let im = a.shape().relate(b.shape());
            im.is_touches() && (config.queen || im.matches("****1****").unwrap_or(false))
        }
    }
}

/// Length of the overlap between `[a0, a1]` and `[b0, b1]` (negative for a gap).
#[inline]
fn overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    a1.min(b1) - a0.max(b0)
}

/// Two boxes share an edge: opposite sides coincide within `tol` and the
/// boxes overlap along that side by more than `tol`.
fn shares_box_edge(a: &Rect<f64>, b: &Rect<f64>, tol: f64) -> bool {
    let (a_min, a_max, b_min, b_max) = (a.min(), a.max(), b.min(), b.max());

    let x_touch = (a_max.x - b_min.x).abs() <= tol || (b_max.x - a_min.x).abs() <= tol;
    let y_touch = (a_max.y - b_min.y).abs() <= tol || (b_max.y - a_min.y).abs() <= tol;

    (x_touch && overlap(a_min.y, a_max.y, b_min.y, b_max.y) > tol)
        || (y_touch && overlap(a_min.x, a_max.x, b_min.x, b_max.x) > tol)
}

/// Unpadded boxes overlap with positive extent on both axes.
fn boxes_overlap(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    overlap(a.min().x, a.max().x, b.min().x, b.max().x) > 0.0
        && overlap(a.min().y, a.max().y, b.min().y, b.max().y) > 0.0
}

/// Some extreme point of `a` lies within `threshold` of some extreme point of `b`.
fn corners_within(a: &Tract, b: &Tract, threshold: f64) -> bool {
    a.footprint().corners.iter()
        .any(|&p| b.footprint().corners.iter().any(|&q| distance(p, q) <= threshold))
}
