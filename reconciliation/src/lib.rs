//! Cash-shift reconciliation for Mais Capinhas
//!
//! Compares what the point-of-sale recorded for a shift with what the
//! conferente counted in the drawer, classifies the difference, and gates
//! closing the shift on a confirmed justification.
//!
//! # Invariants
//!
//! - `difference = real - system`, computed in centavos
//! - A divergent shift closes only with non-blank justification text and
//!   an explicit confirmation; both are checked and reported separately
//! - A closed shift never changes again

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod divergence;
pub mod error;
pub mod shift;
pub mod summary;

// Re-exports
pub use divergence::{
    can_close, classify, classify_decimal, closure_issues, ClosureIssue, DivergenceReport,
    Severity,
};
pub use error::{Error, Result};
pub use shift::{ShiftKey, ShiftReconciliation, ShiftSegment, ShiftStatus};
pub use summary::{summarize, ReconciliationSummary};
