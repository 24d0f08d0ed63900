use std::{cmp::Ordering, fmt};

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::geom::Corner;

/// The coordinate a bisection splits along.
///
/// A `Latitude` pass orders tracts north to south (rows sweep west to east),
/// a `Longitude` pass orders them west to east (columns sweep south to north).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// The axis used one recursion level deeper.
    #[inline]
    pub fn next(self) -> Self {
        match self {
            Axis::Latitude => Axis::Longitude,
            Axis::Longitude => Axis::Latitude,
        }
    }

    /// Axis used at a given recursion depth, alternating from `start`.
    #[inline]
    pub fn at_depth(start: Axis, depth: usize) -> Self {
        if depth % 2 == 0 { start } else { start.next() }
    }

    /// Progress along the pass direction; increases north→south or west→east.
    #[inline]
    pub fn primary(self, c: Coord<f64>) -> f64 {
        match self {
            Axis::Latitude => -c.y,
            Axis::Longitude => c.x,
        }
    }

    /// Position across the pass direction; increases west→east or south→north.
    #[inline]
    pub fn secondary(self, c: Coord<f64>) -> f64 {
        match self {
            Axis::Latitude => c.x,
            Axis::Longitude => c.y,
        }
    }

    /// Raw coordinate value this axis splits on (latitude or longitude).
    #[inline]
    pub fn coordinate(self, c: Coord<f64>) -> f64 {
        match self {
            Axis::Latitude => c.y,
            Axis::Longitude => c.x,
        }
    }

    /// Corner a traversal along this axis starts from.
    #[inline]
    pub fn start_corner(self) -> Corner {
        match self {
            Axis::Latitude => Corner::NorthWest,
            Axis::Longitude => Corner::SouthWest,
        }
    }

    /// Order two coordinates by primary then secondary position.
    #[inline]
    pub fn compare(self, a: Coord<f64>, b: Coord<f64>) -> Ordering {
        self.primary(a).total_cmp(&self.primary(b))
            .then(self.secondary(a).total_cmp(&self.secondary(b)))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}
