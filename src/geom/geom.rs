use geo::{Coord, LineString, MultiPolygon, Rect};

use crate::{error::GeometryError, geom::Corner};

/// Iterate every ring (exteriors and holes) of a MultiPolygon.
fn rings(shape: &MultiPolygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    shape.0.iter().flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
}

/// Vertices of a ring, without the duplicate closing coordinate.
fn ring_vertices(ring: &LineString<f64>) -> &[Coord<f64>] {
    match ring.0.split_last() {
        Some((last, rest)) if rest.first() == Some(last) => rest,
        _ => &ring.0,
    }
}

/// Check that a shape is usable for exact-geometry operations.
pub fn validate(shape: &MultiPolygon<f64>) -> Result<(), GeometryError> {
    if shape.0.is_empty() { return Err(GeometryError::Empty) }

    for (ring, line) in rings(shape).enumerate() {
        if line.0.len() < 4 {
            return Err(GeometryError::TooFewVertices { ring, count: line.0.len() })
        }
        if line.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(GeometryError::NonFinite)
        }
    }

    Ok(())
}

/// Axis-aligned bounding box of the shape's exterior rings.
pub fn bounding_box(shape: &MultiPolygon<f64>) -> Result<Rect<f64>, GeometryError> {
    validate(shape)?;

    let mut min = Coord { x: f64::INFINITY, y: f64::INFINITY };
    let mut max = Coord { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
    for c in shape.0.iter().flat_map(|polygon| polygon.exterior().0.iter()) {
        min.x = min.x.min(c.x);
        min.y = min.y.min(c.y);
        max.x = max.x.max(c.x);
        max.y = max.y.max(c.y);
    }

    Ok(Rect::new(min, max))
}

/// Mean of all ring vertices (closing duplicates excluded).
pub fn centroid(shape: &MultiPolygon<f64>) -> Result<Coord<f64>, GeometryError> {
    validate(shape)?;
    mean(rings(shape).flat_map(|ring| ring_vertices(ring).iter().copied()))
        .ok_or(GeometryError::Empty)
}

/// The exterior vertex reaching furthest toward `corner`.
pub fn extreme_point(shape: &MultiPolygon<f64>, corner: Corner) -> Result<Coord<f64>, GeometryError> {
    validate(shape)?;
    shape.0.iter()
        .flat_map(|polygon| ring_vertices(polygon.exterior()).iter().copied())
        .max_by(|&a, &b| corner.compare(a, b))
        .ok_or(GeometryError::Empty)
}

/// Mean of the finite vertices of a shape, ignoring validity. Used for centroid fallback.
pub(crate) fn finite_vertex_mean(shape: &MultiPolygon<f64>) -> Option<Coord<f64>> {
    mean(rings(shape)
        .flat_map(|ring| ring_vertices(ring).iter().copied())
        .filter(|c| c.x.is_finite() && c.y.is_finite()))
}

fn mean(coords: impl Iterator<Item = Coord<f64>>) -> Option<Coord<f64>> {
    let (sum, count) = coords.fold((Coord { x: 0.0, y: 0.0 }, 0usize), |(sum, count), c| {
        (Coord { x: sum.x + c.x, y: sum.y + c.y }, count + 1)
    });
    (count > 0).then(|| Coord { x: sum.x / count as f64, y: sum.y / count as f64 })
}

/// Smallest rectangle containing both `a` and `b`.
#[inline]
pub(crate) fn rect_union(a: &Rect<f64>, b: &Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

/// Euclidean distance in coordinate units.
#[inline]
pub(crate) fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
