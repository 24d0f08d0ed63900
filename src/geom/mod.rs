mod axis;
mod bbox;
mod corner;
mod geom;

pub use axis::Axis;
pub(crate) use bbox::{padded_envelope, BoundingBox};
pub use corner::Corner;
pub use geom::{bounding_box, centroid, extreme_point, validate};
pub(crate) use geom::{distance, finite_vertex_mean, rect_union};
