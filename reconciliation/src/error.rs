//! Error types for cash-shift reconciliation

use crate::divergence::ClosureIssue;
use thiserror::Error;
use uuid::Uuid;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reconciliation errors
#[derive(Error, Debug)]
pub enum Error {
    /// Shift is closed and can no longer change
    #[error("Shift {0} is already closed")]
    ShiftClosed(Uuid),

    /// Closing was refused; every failed condition is listed
    #[error("Shift cannot be closed: {}", describe(.0))]
    ClosureRejected(Vec<ClosureIssue>),

    /// Amount normalization error
    #[error(transparent)]
    Money(#[from] capinhas_core::Error),
}

fn describe(issues: &[ClosureIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
