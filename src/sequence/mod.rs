mod budget;
mod centroid;
mod chain;
mod greedy;
mod rows;
mod strategy;

pub use budget::Budget;
pub use centroid::CentroidSort;
pub use chain::{Fallback, FallbackChain, Sequenced};
pub use greedy::GreedyTraversal;
pub use rows::RowTraversal;
pub use strategy::{SequenceContext, SequenceStrategy, Sequencer};
