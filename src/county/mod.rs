mod assign;

pub use assign::{assign_by_unit, UnitAssignment, UnitKey};
