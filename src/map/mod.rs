mod tract;
mod tract_id;
mod tract_set;

pub use tract::{Footprint, Tract};
pub use tract_id::{TractId, UnitId};
pub use tract_set::TractSet;
