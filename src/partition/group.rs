use geo::{Coord, Rect};

use crate::{map::TractSet, partition::GroupSnapshot};

/// A node of the recursion tree: a contiguous range of district numbers and
/// the tracts that will be shared among them.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictGroup {
    start: u32,
    end: u32,
    members: Vec<usize>,
    population: u64,
    bounds: Option<Rect<f64>>,
    centroid: Option<Coord<f64>>,
    depth: usize,
}

impl DistrictGroup {
    /// Construct a group over districts `start..=end`.
    pub fn new(tracts: &TractSet, start: u32, end: u32, members: Vec<usize>, depth: usize) -> Self {
        assert!(start >= 1 && start <= end, "invalid district range {start}-{end}");
        Self {
            start,
            end,
            population: tracts.population_of(&members),
            bounds: tracts.bounds_of(&members),
            centroid: tracts.centroid_of(&members),
            members,
            depth,
        }
    }

    /// The root group: every tract shared among districts `1..=districts`.
    pub fn root(tracts: &TractSet, districts: u32) -> Self {
        Self::new(tracts, 1, districts, (0..tracts.len()).collect(), 0)
    }

    #[inline] pub fn start(&self) -> u32 { self.start }

    #[inline] pub fn end(&self) -> u32 { self.end }

    #[inline] pub fn total_districts(&self) -> u32 { self.end - self.start + 1 }

    /// A group covering a single district is final.
    #[inline] pub fn is_terminal(&self) -> bool { self.total_districts() == 1 }

    #[inline] pub fn members(&self) -> &[usize] { &self.members }

    #[inline] pub fn population(&self) -> u64 { self.population }

    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { self.bounds }

    #[inline] pub fn centroid(&self) -> Option<Coord<f64>> { self.centroid }

    #[inline] pub fn depth(&self) -> usize { self.depth }

    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            start: self.start,
            end: self.end,
            depth: self.depth,
            tracts: self.members.len(),
            population: self.population,
        }
    }
}
