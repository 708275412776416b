//! Generation run metrics.
//!
//! Collected on every run; the counters are plain integers so the hot loop
//! pays nothing for them. The verbose API and the CLI report surface them.

use std::time::Duration;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationMetrics {
    /// Total elapsed time for [`Generator::run`](super::Generator::run).
    pub total: Duration,
    /// Distinct arrangements examined, the original order included.
    pub arrangements: usize,
    /// Arrangements the validator accepted.
    pub accepted: usize,
    /// Arrangements dropped by the pre-filter before validation.
    pub filtered: usize,
}

impl GenerationMetrics {
    /// Share of examined arrangements that were accepted.
    pub fn acceptance(&self) -> f64 {
        if self.arrangements == 0 { 0.0 } else { self.accepted as f64 / self.arrangements as f64 }
    }
}
