use geo::{Coord, MultiPolygon, Rect};

use crate::{
    error::{GeometryError, PartitionError},
    geom::{self, Corner},
    map::{TractId, UnitId},
};

/// Derived placement of a tract: bounding box, centroid and the four extreme points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub bounds: Rect<f64>,
    pub centroid: Coord<f64>,
    pub corners: [Coord<f64>; 4], // indexed by Corner::slot
}

impl Footprint {
    /// Compute the footprint from exact geometry.
    pub fn exact(shape: &MultiPolygon<f64>) -> Result<Self, GeometryError> {
        Ok(Self {
            bounds: geom::bounding_box(shape)?,
            centroid: geom::centroid(shape)?,
            corners: [
                geom::extreme_point(shape, Corner::NorthWest)?,
                geom::extreme_point(shape, Corner::NorthEast)?,
                geom::extreme_point(shape, Corner::SouthWest)?,
                geom::extreme_point(shape, Corner::SouthEast)?,
            ],
        })
    }

    /// A degenerate footprint collapsed onto a single point.
    pub fn point(centroid: Coord<f64>) -> Self {
        Self { bounds: Rect::new(centroid, centroid), centroid, corners: [centroid; 4] }
    }
}

/// An atomic geographic unit with a population and a boundary.
#[derive(Debug, Clone)]
pub struct Tract {
    id: TractId,
    population: u64,
    unit: Option<UnitId>,
    shape: MultiPolygon<f64>,
    footprint: Footprint,
    invalid: Option<GeometryError>, // Set when the footprint is a centroid fallback
}

impl Tract {
    /// Construct a tract from its exact geometry.
    pub fn new(id: impl Into<TractId>, population: u64, shape: MultiPolygon<f64>) -> Result<Self, PartitionError> {
        Self::from_parts(id, population, Ok(shape), None)
    }

    /// Construct a tract whose geometry may be unusable.
    /// Invalid geometry falls back to `centroid_hint`, or to the mean of its finite vertices.
    pub fn from_parts(
        id: impl Into<TractId>,
        population: u64,
        shape: Result<MultiPolygon<f64>, GeometryError>,
        centroid_hint: Option<Coord<f64>>,
    ) -> Result<Self, PartitionError> {
        let id = id.into();
        let (shape, exact) = match shape {
            Ok(shape) => {
                let exact = Footprint::exact(&shape);
                (shape, exact)
            }
            Err(error) => (MultiPolygon(vec![]), Err(error)),
        };

        let (footprint, invalid) = match exact {
            Ok(footprint) => (footprint, None),
            Err(error) => {
                let centroid = centroid_hint
                    .filter(|c| c.x.is_finite() && c.y.is_finite())
                    .or_else(|| geom::finite_vertex_mean(&shape))
                    .ok_or_else(|| PartitionError::UnlocatableTract(id.clone()))?;
                (Footprint::point(centroid), Some(error))
            }
        };

        Ok(Self { id, population, unit: None, shape, footprint, invalid })
    }

    /// Attach an administrative unit to this tract.
    pub fn with_unit(mut self, unit: impl Into<UnitId>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[inline] pub fn id(&self) -> &TractId { &self.id }

    #[inline] pub fn population(&self) -> u64 { self.population }

    #[inline] pub fn unit(&self) -> Option<&UnitId> { self.unit.as_ref() }

    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.shape }

    #[inline] pub fn footprint(&self) -> &Footprint { &self.footprint }

    #[inline] pub fn bounds(&self) -> Rect<f64> { self.footprint.bounds }

    #[inline] pub fn centroid(&self) -> Coord<f64> { self.footprint.centroid }

    #[inline] pub fn corner(&self, corner: Corner) -> Coord<f64> { self.footprint.corners[corner.slot()] }

    /// The reason exact geometry is unavailable, if any.
    #[inline] pub fn geometry_error(&self) -> Option<&GeometryError> { self.invalid.as_ref() }

    #[inline] pub fn has_exact_geometry(&self) -> bool { self.invalid.is_none() }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, LineString, Polygon};

    use super::*;

    #[test]
    fn exact_footprint_is_cached() {
        let tract = Tract::new("a", 10, MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 0.0, y: 1.0),
        ]])).unwrap();

        assert!(tract.has_exact_geometry());
        assert_eq!(tract.centroid(), Coord { x: 1.0, y: 0.5 });
        assert_eq!(tract.corner(Corner::SouthEast), Coord { x: 2.0, y: 0.0 });
        assert_eq!(tract.bounds().max(), Coord { x: 2.0, y: 1.0 });
    }

    #[test]
    fn invalid_geometry_falls_back_to_centroid() {
        let sliver = MultiPolygon(vec![Polygon::new(LineString::from(vec![(0.0, 0.0), (2.0, 2.0)]), vec![])]);
        let tract = Tract::new("b", 5, sliver).unwrap();

        assert!(!tract.has_exact_geometry());
        assert_eq!(tract.centroid(), Coord { x: 1.0, y: 1.0 });
        for corner in Corner::ALL { assert_eq!(tract.corner(corner), tract.centroid()) }
        assert_eq!(tract.bounds().min(), tract.bounds().max());
    }

    #[test]
    fn unsupported_shape_uses_hint() {
        let tract = Tract::from_parts(
            "c", 1,
            Err(GeometryError::UnsupportedShape("Point".into())),
            Some(Coord { x: -120.0, y: 37.0 }),
        ).unwrap();
        assert_eq!(tract.centroid(), Coord { x: -120.0, y: 37.0 });
        assert_eq!(tract.geometry_error(), Some(&GeometryError::UnsupportedShape("Point".into())));
    }

    #[test]
    fn unlocatable_tract_is_rejected() {
        let err = Tract::from_parts("d", 1, Err(GeometryError::Empty), None).unwrap_err();
        assert_eq!(err, PartitionError::UnlocatableTract(TractId::from("d")));
    }
}
