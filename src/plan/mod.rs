mod io;
mod plan;
mod summary;

pub use plan::{Bounds, District, Plan};
pub use summary::Summary;
