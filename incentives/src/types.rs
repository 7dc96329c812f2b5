//! Tier tables as served by the backend

use capinhas_core::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// Bonus band: sales in `[lower_bound, upper_bound]` earn a flat reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusTier {
    /// Inclusive lower bound
    pub lower_bound: Money,

    /// Inclusive upper bound; `None` for an unbounded top band
    #[serde(default)]
    pub upper_bound: Option<Money>,

    /// Flat reward paid once the band is reached
    pub reward: Money,

    /// Inactive bands are ignored entirely
    #[serde(default = "default_active")]
    pub active: bool,
}

impl BonusTier {
    /// Active band
    pub fn new(lower_bound: Money, upper_bound: Option<Money>, reward: Money) -> Self {
        Self {
            lower_bound,
            upper_bound,
            reward,
            active: true,
        }
    }

    /// Whether `amount` falls inside the band (both ends inclusive)
    pub fn contains(&self, amount: Money) -> bool {
        amount >= self.lower_bound && self.upper_bound.map_or(true, |upper| amount <= upper)
    }
}

/// Commission step: from `threshold_percent` achievement on, `commission_percent` applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionTier {
    /// Minimum achievement percent (inclusive)
    pub threshold_percent: Decimal,

    /// Commission rate in percent of sales
    pub commission_percent: Decimal,
}

impl CommissionTier {
    /// Create new tier
    pub fn new(threshold_percent: Decimal, commission_percent: Decimal) -> Self {
        Self {
            threshold_percent,
            commission_percent,
        }
    }
}

/// A tier table of either kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tiers", rename_all = "snake_case")]
pub enum TierTable {
    /// Flat bonus by sales amount
    Bonus(Vec<BonusTier>),
    /// Commission rate by goal achievement
    Commission(Vec<CommissionTier>),
}

/// A seller's (or store's) sales against the goal for the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPerformance {
    /// Sales in the period
    pub sales: Money,

    /// Goal for the period
    pub goal: Money,
}

impl SalesPerformance {
    /// Create new performance snapshot
    pub fn new(sales: Money, goal: Money) -> Self {
        Self { sales, goal }
    }

    /// Sales as a percentage of the goal; `None` when no positive goal is set
    pub fn achievement_percent(&self) -> Option<Decimal> {
        crate::commission::achievement_percent(self.sales, self.goal)
    }
}
