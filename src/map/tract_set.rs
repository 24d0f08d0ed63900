use std::sync::OnceLock;

use ahash::AHashMap;
use geo::{Coord, MultiPolygon, Rect, Relate};
use rayon::prelude::*;
use rstar::{RTree, AABB};

use crate::{
    error::PartitionError,
    geom::{padded_envelope, rect_union, BoundingBox},
    map::{Tract, TractId},
};

/// The fixed universe of tracts for one partition run, with spatial relationships.
#[derive(Debug)]
pub struct TractSet {
    tracts: Vec<Tract>,
    index: AHashMap<TractId, u32>, // Map between tract ids and contiguous indices.
    rtree: RTree<BoundingBox>,
    containers: OnceLock<Vec<Option<usize>>>, // Lazily computed innermost container per tract.
}

impl TractSet {
    /// Construct a TractSet, rejecting duplicate tract ids.
    pub fn new(tracts: Vec<Tract>) -> Result<Self, PartitionError> {
        let mut index = AHashMap::with_capacity(tracts.len());
        for (i, tract) in tracts.iter().enumerate() {
            if index.insert(tract.id().clone(), i as u32).is_some() {
                return Err(PartitionError::DuplicateTract(tract.id().clone()))
            }
        }

        Ok(Self {
            rtree: RTree::bulk_load(
                tracts.iter().enumerate()
                    .map(|(i, tract)| BoundingBox::new(i, tract.bounds()))
                    .collect()
            ),
            tracts,
            index,
            containers: OnceLock::new(),
        })
    }

    /// Get the number of tracts.
    #[inline] pub fn len(&self) -> usize { self.tracts.len() }

    /// Check if there are no tracts.
    #[inline] pub fn is_empty(&self) -> bool { self.tracts.is_empty() }

    /// Get a reference to a tract by index.
    #[inline] pub fn get(&self, idx: usize) -> &Tract { &self.tracts[idx] }

    /// Get a reference to the list of tracts.
    #[inline] pub fn tracts(&self) -> &[Tract] { &self.tracts }

    /// Look up the index of a tract id.
    #[inline] pub fn index_of(&self, id: &TractId) -> Option<usize> { self.index.get(id).map(|&i| i as usize) }

    /// Total population of every tract.
    #[inline] pub fn total_population(&self) -> u64 { self.tracts.iter().map(Tract::population).sum() }

    /// Total population of a subset of tracts.
    #[inline]
    pub fn population_of(&self, members: &[usize]) -> u64 {
        members.iter().map(|&i| self.tracts[i].population()).sum()
    }

    /// Smallest rectangle containing the bounds of every member.
    pub fn bounds_of(&self, members: &[usize]) -> Option<Rect<f64>> {
        members.iter()
            .map(|&i| self.tracts[i].bounds())
            .reduce(|a, b| rect_union(&a, &b))
    }

    /// Mean of the member centroids.
    pub fn centroid_of(&self, members: &[usize]) -> Option<Coord<f64>> {
        if members.is_empty() { return None }
        let sum = members.iter()
            .map(|&i| self.tracts[i].centroid())
            .fold(Coord { x: 0.0, y: 0.0 }, |acc, c| Coord { x: acc.x + c.x, y: acc.y + c.y });
        Some(Coord { x: sum.x / members.len() as f64, y: sum.y / members.len() as f64 })
    }

    /// Query the R-tree for tracts whose bounding boxes intersect the given envelope.
    #[inline]
    pub(crate) fn query(&self, envelope: &AABB<[f64; 2]>) -> impl Iterator<Item = usize> + '_ {
        self.rtree.locate_in_envelope_intersecting(envelope).map(BoundingBox::idx)
    }

    /// For each tract, the innermost tract whose outer ring entirely contains it (if any).
    /// Only tracts with exact geometry take part. Built on first access.
    pub fn containers(&self) -> &[Option<usize>] {
        self.containers.get_or_init(|| {
            (0..self.len()).into_par_iter()
                .map(|i| self.find_container(i))
                .collect()
        })
    }

    fn find_container(&self, inner: usize) -> Option<usize> {
        let tract = &self.tracts[inner];
        if !tract.has_exact_geometry() { return None }

        let bounds = tract.bounds();
        let area = |r: &Rect<f64>| r.width() * r.height();

        self.rtree.locate_in_envelope_intersecting(&padded_envelope(&bounds, 0.0))
            .filter(|candidate| candidate.idx() != inner)
            .filter(|candidate| self.tracts[candidate.idx()].has_exact_geometry())
            .filter(|candidate| {
                let outer = candidate.bbox();
                outer.min().x <= bounds.min().x && outer.min().y <= bounds.min().y
                    && outer.max().x >= bounds.max().x && outer.max().y >= bounds.max().y
                    && area(outer) > area(&bounds)
            })
            .filter(|candidate| {
                // Compare against the outer rings only, so a tract filling a hole still counts.
                let hull = MultiPolygon(self.tracts[candidate.idx()].shape().0.iter()
                    .map(|polygon| geo::Polygon::new(polygon.exterior().clone(), vec![]))
                    .collect());
                hull.relate(tract.shape()).is_contains()
            })
            .min_by(|a, b| area(a.bbox()).total_cmp(&area(b.bbox())).then(a.idx().cmp(&b.idx())))
            .map(|candidate| candidate.idx())
    }
}
