mod build;
mod cache;
mod contiguity;
mod graph;
mod quality;
mod table;

pub use cache::{AdjacencyCache, RunId};
pub use graph::AdjacencyGraph;
pub use quality::AdjacencyQuality;
pub(crate) use table::unknown_neighbors;
