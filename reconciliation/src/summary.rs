//! Aggregate view over many shift reconciliations

use crate::divergence::Severity;
use crate::shift::ShiftReconciliation;
use capinhas_core::Money;
use serde::{Deserialize, Serialize};

/// Totals for a set of shifts (a store-day, a week of one seller, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    /// Shifts considered
    pub total_shifts: usize,
    /// Shifts without any difference
    pub balanced_shifts: usize,
    /// Shifts with a non-zero difference
    pub divergent_shifts: usize,
    /// Shifts whose difference is critical
    pub critical_shifts: usize,
    /// Sum of signed differences
    pub net_difference: Money,
    /// Sum of absolute differences
    pub total_absolute_difference: Money,
}

/// Summarize a set of shifts
pub fn summarize(shifts: &[ShiftReconciliation]) -> ReconciliationSummary {
    let mut summary = ReconciliationSummary {
        total_shifts: shifts.len(),
        ..Default::default()
    };

    for shift in shifts {
        let report = shift.report();
        if report.has_divergence {
            summary.divergent_shifts += 1;
        } else {
            summary.balanced_shifts += 1;
        }
        if report.severity == Severity::Critical {
            summary.critical_shifts += 1;
        }
        summary.net_difference += report.difference;
        summary.total_absolute_difference += report.difference.abs();
    }

    summary
}
