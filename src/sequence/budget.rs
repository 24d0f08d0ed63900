use std::time::{Duration, Instant};

use crate::{config::SequenceConfig, error::SequenceError};

/// Step and wall-clock allowance for a single traversal.
#[derive(Debug, Clone)]
pub struct Budget {
    steps: usize,
    max_steps: usize,
    deadline: Option<Instant>,
}

impl Budget {
    /// Clock reads happen once every this many steps.
    const CLOCK_INTERVAL: usize = 1024;

    pub fn new(max_steps: usize, time_limit: Option<Duration>) -> Self {
        Self { steps: 0, max_steps, deadline: time_limit.map(|limit| Instant::now() + limit) }
    }

    /// A fresh budget with the limits of a sequencing configuration.
    pub fn from_config(config: &SequenceConfig) -> Self {
        Self::new(config.max_steps, config.time_limit_ms.map(Duration::from_millis))
    }

    /// An effectively unbounded budget.
    pub fn unlimited() -> Self { Self::new(usize::MAX, None) }

    /// Number of steps consumed so far.
    #[inline] pub fn steps(&self) -> usize { self.steps }

    /// Consume one step, failing once either limit is exhausted.
    pub fn tick(&mut self) -> Result<(), SequenceError> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(SequenceError::BudgetExceeded { steps: self.max_steps })
        }
        if let Some(deadline) = self.deadline {
            if self.steps % Self::CLOCK_INTERVAL == 0 && Instant::now() >= deadline {
                return Err(SequenceError::BudgetExceeded { steps: self.steps })
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_limit_is_enforced() {
        let mut budget = Budget::new(3, None);
        for _ in 0..3 { budget.tick().unwrap() }
        assert_eq!(budget.tick(), Err(SequenceError::BudgetExceeded { steps: 3 }));
        assert_eq!(budget.steps(), 4);
    }

    #[test]
    fn time_limit_is_enforced() {
        let mut budget = Budget::new(usize::MAX, Some(Duration::ZERO));
        let result = (0..Budget::CLOCK_INTERVAL).try_for_each(|_| budget.tick());
        assert!(matches!(result, Err(SequenceError::BudgetExceeded { .. })));
    }
}
