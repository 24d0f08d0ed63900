use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::error::GeometryError;

/// Parse GeoJSON coordinates of a `Polygon` or `MultiPolygon` into a MultiPolygon.
/// Polygon: `[ring, ring, ...]`, MultiPolygon: `[[ring, ...], ...]`, where
/// a ring is `[[lng, lat], ...]` and the first ring of a polygon is its exterior.
pub fn parse_shape(geometry_type: &str, coordinates: &Value) -> Result<MultiPolygon<f64>, GeometryError> {
    match geometry_type {
        "Polygon" => Ok(MultiPolygon(vec![parse_polygon_coords(coordinates)?])),
        "MultiPolygon" => as_array(coordinates, "MultiPolygon")?.iter()
            .map(parse_polygon_coords)
            .collect::<Result<Vec<_>, _>>()
            .map(MultiPolygon),
        other => Err(GeometryError::UnsupportedShape(other.to_string())),
    }
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, GeometryError> {
    value.as_array().ok_or_else(|| GeometryError::MalformedCoordinates(format!("{what} must be an array")))
}

/// Parse one polygon: exterior ring followed by holes.
fn parse_polygon_coords(coords: &Value) -> Result<Polygon<f64>, GeometryError> {
    let rings = as_array(coords, "polygon")?;
    let (exterior, interiors) = rings.split_first()
        .ok_or_else(|| GeometryError::MalformedCoordinates("polygon has no exterior ring".to_string()))?;

    Ok(Polygon::new(
        parse_ring_coords(exterior)?,
        interiors.iter().map(parse_ring_coords).collect::<Result<_, _>>()?,
    ))
}

/// Parse a ring (exterior or interior) from GeoJSON coordinates.
/// Format: [[x, y], [x, y], ...]
fn parse_ring_coords(coords: &Value) -> Result<LineString<f64>, GeometryError> {
    let mut points = as_array(coords, "ring")?.iter()
        .map(|pair| {
            let pair = as_array(pair, "position")?;
            match (pair.first().and_then(Value::as_f64), pair.get(1).and_then(Value::as_f64)) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => Err(GeometryError::MalformedCoordinates("position must hold two numbers".to_string())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Ensure ring is closed (first point == last point)
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }

    Ok(LineString(points))
}
