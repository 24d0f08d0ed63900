mod controller;
mod division;
mod group;
mod trace;

pub use controller::{Controller, PartitionRun};
pub(crate) use controller::push_warning;
pub use division::SplitSpec;
pub use group::DistrictGroup;
pub use trace::{AlgorithmStep, GroupSnapshot, StepLog};
