//! Cash divergence classification
//!
//! The difference is always `real - system`: negative means the drawer is
//! short, positive means it holds more than the point-of-sale recorded.
//! Both amounts are centavos, so equality is exact.

use crate::Result;
use capinhas_core::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest difference still shown as balanced (R$ 0,01)
pub const BALANCED_TOLERANCE: Money = Money::from_cents(1);

/// Largest difference shown as needing attention (R$ 50,00); above is critical
pub const ATTENTION_LIMIT: Money = Money::from_reais(50);

/// Display severity of a difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Within one centavo
    Balanced,
    /// Up to R$ 50,00
    Attention,
    /// Above R$ 50,00
    Critical,
}

impl Severity {
    /// Bucket a difference; thresholds are absolute and never scaled by shift size
    pub fn from_difference(difference: Money) -> Self {
        let magnitude = difference.abs();
        if magnitude <= BALANCED_TOLERANCE {
            Severity::Balanced
        } else if magnitude <= ATTENTION_LIMIT {
            Severity::Attention
        } else {
            Severity::Critical
        }
    }
}

/// Outcome of comparing the recorded and counted amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergenceReport {
    /// Counted minus recorded
    pub difference: Money,

    /// Any non-zero difference, however small
    pub has_divergence: bool,

    /// Display bucket
    pub severity: Severity,
}

/// Compare the system amount with the physically counted amount
pub fn classify(system_amount: Money, real_amount: Money) -> DivergenceReport {
    let difference = real_amount - system_amount;
    DivergenceReport {
        difference,
        has_divergence: !difference.is_zero(),
        severity: Severity::from_difference(difference),
    }
}

/// [`classify`] for raw decimal inputs, normalized to centavos first
pub fn classify_decimal(system_amount: Decimal, real_amount: Decimal) -> Result<DivergenceReport> {
    Ok(classify(
        Money::from_decimal(system_amount)?,
        Money::from_decimal(real_amount)?,
    ))
}

/// A condition that blocks closing a divergent shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureIssue {
    /// Justification text is missing or blank
    MissingJustification,
    /// The conferente has not confirmed the justification
    NotConfirmed,
}

impl fmt::Display for ClosureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosureIssue::MissingJustification => {
                f.write_str("a justification is required for the divergence")
            }
            ClosureIssue::NotConfirmed => f.write_str("the justification has not been confirmed"),
        }
    }
}

/// Every condition blocking closure, checked independently
///
/// Empty when the shift has no divergence, or when it is justified with
/// non-blank text and confirmed.
pub fn closure_issues(
    report: &DivergenceReport,
    justification: Option<&str>,
    justified: bool,
) -> Vec<ClosureIssue> {
    let mut issues = Vec::new();
    if !report.has_divergence {
        return issues;
    }
    if justification.map_or(true, |text| text.trim().is_empty()) {
        issues.push(ClosureIssue::MissingJustification);
    }
    if !justified {
        issues.push(ClosureIssue::NotConfirmed);
    }
    issues
}

/// Whether a shift with this report may close
pub fn can_close(report: &DivergenceReport, justification: Option<&str>, justified: bool) -> bool {
    closure_issues(report, justification, justified).is_empty()
}
