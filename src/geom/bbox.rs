use geo::Rect;
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a tract by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of corresponding tract in the TractSet
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding tract.
    #[inline] pub(crate) fn idx(&self) -> usize { self.idx }

    /// Get a reference to the bounding rectangle.
    #[inline] pub(crate) fn bbox(&self) -> &Rect<f64> { &self.bbox }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Build a query envelope around `rect`, padded by `tol` on every side.
#[inline]
pub(crate) fn padded_envelope(rect: &Rect<f64>, tol: f64) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [rect.min().x - tol, rect.min().y - tol],
        [rect.max().x + tol, rect.max().y + tol],
    )
}
