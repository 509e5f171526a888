//! Running aggregate statistics over completed analyses.
//!
//! The tracker owns raw counters and folds each result in incrementally; it
//! never re-scans history, so it stays accurate after the bounded history
//! store evicts old entries. Escalation and total counts are stored raw and
//! the percentage is derived on read, with rounding applied only to the
//! final value.

use crate::types::{AggregateStats, AnalysisResult, TrustLabel};

/// Simulated fines avoided per caught result, by trust label.
const fn fines_bonus(label: TrustLabel) -> u64 {
    match label {
        TrustLabel::High => 50_000,
        TrustLabel::Medium => 10_000,
        TrustLabel::Low => 0,
    }
}

/// Owned aggregate-counter state with a single update entry point.
///
/// Not a static global: the engine owns one instance behind its lock so the
/// read-modify-write atomicity contract is enforceable and testable.
#[derive(Debug, Default)]
pub struct StatsTracker {
    checks_today: u64,
    total_count: u64,
    escalation_count: u64,
    estimated_fines_avoided: u64,
}

impl StatsTracker {
    /// Create a tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed analysis into the running counters and return the
    /// updated snapshot.
    pub fn record(&mut self, result: &AnalysisResult) -> AggregateStats {
        self.checks_today += 1;
        self.total_count += 1;
        if result.label.is_escalation() {
            self.escalation_count += 1;
        }
        self.estimated_fines_avoided += fines_bonus(result.label);
        self.snapshot()
    }

    /// Reset the daily counter. Called by the external day-rollover job;
    /// the running percentage and fines total are not affected.
    pub fn roll_day(&mut self) {
        self.checks_today = 0;
    }

    /// Read-only snapshot of the current counters.
    pub fn snapshot(&self) -> AggregateStats {
        let high_risk_percentage = if self.total_count == 0 {
            0.0
        } else {
            (self.escalation_count as f64 / self.total_count as f64 * 100.0).round()
        };

        AggregateStats {
            checks_today: self.checks_today,
            high_risk_percentage,
            estimated_fines_avoided: self.estimated_fines_avoided,
        }
    }
}
