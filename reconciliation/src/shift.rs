//! Cash-shift reconciliation lifecycle
//!
//! ```text
//! Pending ──(no divergence)──────────────▶ Balanced ──┐
//!    │                                                 ├──close──▶ Closed
//!    └──(justified + confirmed)──────────▶ Justified ──┘
//! ```
//!
//! Status is derived from the amounts and the justification after every
//! change; `Closed` is terminal. Re-opening a closed shift is an
//! administrative action on the backend, not something this type offers.

use crate::divergence::{classify, closure_issues, ClosureIssue, DivergenceReport};
use crate::{Error, Result};
use capinhas_core::{Money, SellerId, StoreId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

/// Part of the day a seller handled the drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftSegment {
    /// Morning shift
    Morning,
    /// Afternoon shift
    Afternoon,
    /// Night shift
    Night,
}

impl fmt::Display for ShiftSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShiftSegment::Morning => "morning",
            ShiftSegment::Afternoon => "afternoon",
            ShiftSegment::Night => "night",
        };
        f.write_str(name)
    }
}

/// Which shift a reconciliation belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftKey {
    /// Store
    pub store_id: StoreId,
    /// Seller responsible for the drawer
    pub seller_id: SellerId,
    /// Business date
    pub date: NaiveDate,
    /// Segment of the day
    pub segment: ShiftSegment,
}

impl fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.store_id, self.seller_id, self.date, self.segment
        )
    }
}

/// Shift status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Divergent and not yet justified
    #[default]
    Pending,
    /// Counted amount matches the system
    Balanced,
    /// Divergent, with a confirmed justification
    Justified,
    /// Closed (terminal)
    Closed,
}

/// Reconciliation of one cash shift
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReconciliation {
    /// Reconciliation ID
    pub id: Uuid,

    /// Shift identity
    pub key: ShiftKey,

    /// Amount the point-of-sale recorded
    pub system_amount: Money,

    /// Amount physically counted
    pub real_amount: Money,

    /// Free-text explanation of the divergence
    #[serde(default)]
    pub justification: Option<String>,

    /// Confirmation that the justification is accurate
    #[serde(default)]
    pub justified: bool,

    #[serde(default)]
    status: ShiftStatus,

    #[serde(default)]
    closed_at: Option<DateTime<Utc>>,
}

impl ShiftReconciliation {
    /// Start reconciling a shift
    pub fn new(key: ShiftKey, system_amount: Money, real_amount: Money) -> Self {
        let mut shift = Self {
            id: Uuid::new_v4(),
            key,
            system_amount,
            real_amount,
            justification: None,
            justified: false,
            status: ShiftStatus::Pending,
            closed_at: None,
        };
        shift.refresh_status();
        shift
    }

    /// Current status
    pub fn status(&self) -> ShiftStatus {
        self.status
    }

    /// When the shift was closed
    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Whether the shift is closed
    pub fn is_closed(&self) -> bool {
        self.status == ShiftStatus::Closed
    }

    /// Counted minus recorded
    pub fn difference(&self) -> Money {
        self.real_amount - self.system_amount
    }

    /// Divergence classification of the current amounts
    pub fn report(&self) -> DivergenceReport {
        classify(self.system_amount, self.real_amount)
    }

    /// Conditions currently blocking closure
    pub fn closure_issues(&self) -> Vec<ClosureIssue> {
        closure_issues(&self.report(), self.justification.as_deref(), self.justified)
    }

    /// Whether `close` would succeed now
    pub fn can_close(&self) -> bool {
        !self.is_closed() && self.closure_issues().is_empty()
    }

    /// Record a new counted amount
    pub fn record_count(&mut self, real_amount: Money) -> Result<()> {
        self.ensure_open()?;
        self.real_amount = real_amount;
        self.refresh_status();
        Ok(())
    }

    /// Store the justification text and its confirmation flag
    pub fn justify(&mut self, justification: impl Into<String>, confirmed: bool) -> Result<()> {
        self.ensure_open()?;
        self.justification = Some(justification.into());
        self.justified = confirmed;
        self.refresh_status();
        Ok(())
    }

    /// Close the shift, refusing with every failed condition if it is not ready
    pub fn close(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.ensure_open()?;

        let issues = self.closure_issues();
        if !issues.is_empty() {
            warn!(
                shift = %self.key,
                difference = %self.difference(),
                issues = issues.len(),
                "Shift closure rejected"
            );
            return Err(Error::ClosureRejected(issues));
        }

        self.status = ShiftStatus::Closed;
        self.closed_at = Some(now);
        info!(shift = %self.key, difference = %self.difference(), "Shift closed");
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ShiftClosed(self.id));
        }
        Ok(())
    }

    fn refresh_status(&mut self) {
        let report = self.report();
        self.status = if !report.has_divergence {
            ShiftStatus::Balanced
        } else if self.closure_issues().is_empty() {
            ShiftStatus::Justified
        } else {
            ShiftStatus::Pending
        };
    }
}
