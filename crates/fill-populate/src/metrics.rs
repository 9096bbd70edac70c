//! Generation metrics.

use fill_core::ModelId;
use std::time::Duration;

/// Metrics for one model of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    /// Model that was generated.
    pub model: ModelId,
    /// Number of instances requested.
    pub rows_requested: u64,
    /// Number of instances persisted.
    pub rows_inserted: u64,
    /// Time spent generating and persisting.
    pub duration: Duration,
}

impl ModelReport {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        rate(self.rows_inserted, self.duration)
    }
}

/// Metrics from a `generate()` call, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// Per-model metrics in the order the models were processed.
    pub models: Vec<ModelReport>,
    /// Total time taken.
    pub total_duration: Duration,
}

impl GenerationReport {
    /// Rows persisted across all models.
    pub fn rows_inserted(&self) -> u64 {
        self.models.iter().map(|m| m.rows_inserted).sum()
    }

    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        rate(self.rows_inserted(), self.total_duration)
    }

    /// Models in processing order.
    pub fn order(&self) -> Vec<&ModelId> {
        self.models.iter().map(|m| &m.model).collect()
    }

    pub fn get(&self, model: &str) -> Option<&ModelReport> {
        self.models.iter().find(|m| m.model.as_str() == model)
    }
}

fn rate(rows: u64, duration: Duration) -> f64 {
    if duration.as_secs_f64() > 0.0 {
        rows as f64 / duration.as_secs_f64()
    } else {
        0.0
    }
}
