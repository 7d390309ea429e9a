//! `__ID` generation for schema-backed tables

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How identity values are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Random UUID v4 strings
    #[default]
    Uuid,
    /// Zero-padded counter, deterministic across runs
    Sequential,
}

/// Produces identity values that are free in a given table.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    next: u64,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy, next: 0 }
    }

    /// Returns a fresh identity for which `taken` is false.
    pub fn generate(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let candidate = self.candidate();
            if !taken(&candidate) {
                return candidate;
            }
        }
    }

    /// Moves the sequential counter past an existing id.
    ///
    /// Ids that are not sequential counters are ignored, as is everything
    /// under the `Uuid` strategy.
    pub fn resume_after(&mut self, id: &str) {
        if self.strategy != IdStrategy::Sequential {
            return;
        }
        if let Ok(n) = id.parse::<u64>() {
            self.next = self.next.max(n);
        }
    }

    fn candidate(&mut self) -> String {
        match self.strategy {
            IdStrategy::Uuid => Uuid::new_v4().to_string(),
            IdStrategy::Sequential => {
                self.next += 1;
                format!("{:012}", self.next)
            }
        }
    }
}
