use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::graph::AdjacencyGraph;

/// Identifier of one partition run, chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl From<&str> for RunId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

/// Run-scoped store of built adjacency graphs, shared between callers that
/// partition the same tract set more than once.
#[derive(Debug, Default)]
pub struct AdjacencyCache {
    graphs: RwLock<AHashMap<RunId, Arc<AdjacencyGraph>>>,
}

impl AdjacencyCache {
    pub fn new() -> Self { Self::default() }

    // Graphs are immutable once stored, so a writer that panicked cannot leave one half-written.
    fn read(&self) -> RwLockReadGuard<'_, AHashMap<RunId, Arc<AdjacencyGraph>>> {
        self.graphs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AHashMap<RunId, Arc<AdjacencyGraph>>> {
        self.graphs.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the graph stored for a run, if any.
    pub fn get(&self, run: &RunId) -> Option<Arc<AdjacencyGraph>> {
        self.read().get(run).cloned()
    }

    /// Store a graph for a run, replacing any previous one.
    pub fn insert(&self, run: RunId, graph: Arc<AdjacencyGraph>) {
        self.write().insert(run, graph);
    }

    /// Get the graph stored for a run, building and storing it on a miss.
    /// The build runs under the write lock, so concurrent callers build a run's graph once.
    pub fn get_or_insert_with(&self, run: &RunId, build: impl FnOnce() -> AdjacencyGraph) -> Arc<AdjacencyGraph> {
        if let Some(graph) = self.get(run) { return graph }

        let mut graphs = self.write();
        Arc::clone(graphs.entry(run.clone()).or_insert_with(|| Arc::new(build())))
    }

    /// Drop the graph stored for a run.
    pub fn invalidate(&self, run: &RunId) -> Option<Arc<AdjacencyGraph>> {
        self.write().remove(run)
    }

    #[inline] pub fn len(&self) -> usize { self.read().len() }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }
}
