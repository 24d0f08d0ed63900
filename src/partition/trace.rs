use serde::Serialize;

/// A group as it stood at one step of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSnapshot {
    pub start: u32,
    pub end: u32,
    pub depth: usize,
    pub tracts: usize,
    pub population: u64,
}

/// One split or terminal assignment, with the group forest right after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmStep {
    pub index: usize,
    pub depth: usize,
    pub groups: Vec<GroupSnapshot>,
    pub description: String,
}

/// Append-only record of a partition run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepLog {
    steps: Vec<AlgorithmStep>,
}

impl StepLog {
    /// Append a step; groups are stored ordered by first district.
    pub fn push(&mut self, depth: usize, mut groups: Vec<GroupSnapshot>, description: String) {
        groups.sort_by_key(|g| g.start);
        self.steps.push(AlgorithmStep { index: self.steps.len(), depth, groups, description });
    }

    #[inline] pub fn steps(&self) -> &[AlgorithmStep] { &self.steps }

    #[inline] pub fn len(&self) -> usize { self.steps.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    #[inline] pub fn last(&self) -> Option<&AlgorithmStep> { self.steps.last() }
}
