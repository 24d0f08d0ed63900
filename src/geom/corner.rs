use std::cmp::Ordering;

use geo::Coord;
use serde::{Deserialize, Serialize};

/// A directional corner of a shape, used to anchor traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::NorthWest, Corner::NorthEast, Corner::SouthWest, Corner::SouthEast];

    /// Position of this corner in `Corner::ALL`.
    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            Corner::NorthWest => 0,
            Corner::NorthEast => 1,
            Corner::SouthWest => 2,
            Corner::SouthEast => 3,
        }
    }

    /// Compare two coordinates by how far they reach toward this corner.
    /// Latitude decides first, longitude breaks ties. `Greater` means `a` is more extreme.
    pub(crate) fn compare(self, a: Coord<f64>, b: Coord<f64>) -> Ordering {
        let (north, west) = match self {
            Corner::NorthWest => (true, true),
            Corner::NorthEast => (true, false),
            Corner::SouthWest => (false, true),
            Corner::SouthEast => (false, false),
        };

        let lat = if north { a.y.total_cmp(&b.y) } else { b.y.total_cmp(&a.y) };
        let lng = if west { b.x.total_cmp(&a.x) } else { a.x.total_cmp(&b.x) };
        lat.then(lng)
    }
}
