use ahash::AHashMap;
use geo::{Coord, Rect};
use serde::Serialize;

use crate::{
    balance::BalanceReport,
    map::{TractId, TractSet},
    partition::StepLog,
    plan::Summary,
    warning::Warning,
};

/// Longitude/latitude extent of a district.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Self { min_lng: rect.min().x, min_lat: rect.min().y, max_lng: rect.max().x, max_lat: rect.max().y }
    }
}

/// One district of a finished plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct District {
    pub number: u32,
    pub tract_ids: Vec<TractId>,
    pub population: u64,
    pub bounds: Option<Bounds>,
    /// Mean of the member tract centroids as `[lng, lat]`.
    pub centroid: Option<[f64; 2]>,
}

/// A districting plan: every tract assigned to exactly one district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    districts: Vec<District>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<StepLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance: Option<BalanceReport>,
    summary: Summary,
}

impl Plan {
    /// Build a plan from member lists indexed by district number - 1.
    pub(crate) fn new(
        tracts: &TractSet,
        assignments: &[Vec<usize>],
        trace: Option<StepLog>,
        balance: Option<BalanceReport>,
        warnings: Vec<Warning>,
    ) -> Self {
        let districts = assignments.iter().enumerate()
            .map(|(i, members)| {
                let mut members = members.clone();
                members.sort_unstable();
                District {
                    number: i as u32 + 1,
                    tract_ids: members.iter().map(|&u| tracts.get(u).id().clone()).collect(),
                    population: tracts.population_of(&members),
                    bounds: tracts.bounds_of(&members).map(Bounds::from),
                    centroid: tracts.centroid_of(&members).map(|Coord { x, y }| [x, y]),
                }
            })
            .collect::<Vec<_>>();

        let populations = districts.iter().map(|d| d.population).collect::<Vec<_>>();
        Self { districts, trace, balance, summary: Summary::new(&populations, warnings) }
    }

    /// Get the number of districts.
    #[inline] pub fn num_districts(&self) -> u32 { self.districts.len() as u32 }

    #[inline] pub fn districts(&self) -> &[District] { &self.districts }

    /// Get a district by number (1-based).
    #[inline]
    pub fn district(&self, number: u32) -> Option<&District> {
        number.checked_sub(1).and_then(|i| self.districts.get(i as usize))
    }

    #[inline] pub fn trace(&self) -> Option<&StepLog> { self.trace.as_ref() }

    #[inline] pub fn balance(&self) -> Option<&BalanceReport> { self.balance.as_ref() }

    #[inline] pub fn summary(&self) -> &Summary { &self.summary }

    #[inline] pub fn warnings(&self) -> &[Warning] { &self.summary.warnings }

    /// Map every tract id to its district number.
    pub fn assignments(&self) -> AHashMap<TractId, u32> {
        self.districts.iter()
            .flat_map(|d| d.tract_ids.iter().map(move |id| (id.clone(), d.number)))
            .collect()
    }
}
