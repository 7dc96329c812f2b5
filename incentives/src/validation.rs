//! Tier table checks for the configuration boundary
//!
//! The resolvers never call these. Whatever accepts edited tier tables
//! (an admin endpoint, an import job) runs them before the table is stored.

use crate::types::{BonusTier, CommissionTier};
use crate::{Error, Result};
use rust_decimal::Decimal;

/// Check a bonus table: well-formed bands, no overlap among active bands,
/// and at most one unbounded band, which must be the highest.
pub fn validate_bonus_tiers(tiers: &[BonusTier]) -> Result<()> {
    for (index, tier) in tiers.iter().enumerate() {
        if tier.lower_bound.is_negative() {
            return Err(Error::InvalidBand {
                index,
                reason: "lower bound is negative".to_string(),
            });
        }
        if tier.reward.is_negative() {
            return Err(Error::InvalidBand {
                index,
                reason: "reward is negative".to_string(),
            });
        }
        if let Some(upper) = tier.upper_bound {
            if tier.lower_bound >= upper {
                return Err(Error::InvalidBand {
                    index,
                    reason: format!(
                        "lower bound {} is not below upper bound {}",
                        tier.lower_bound, upper
                    ),
                });
            }
        }
    }

    let mut active: Vec<(usize, &BonusTier)> =
        tiers.iter().enumerate().filter(|(_, t)| t.active).collect();
    active.sort_by_key(|(_, t)| t.lower_bound);

    for pair in active.windows(2) {
        let (first, lower) = pair[0];
        let (second, upper) = pair[1];
        let clear = lower
            .upper_bound
            .map_or(false, |bound| bound < upper.lower_bound);
        if !clear {
            return Err(Error::OverlappingBands { first, second });
        }
    }

    Ok(())
}

/// Check a commission table: non-negative thresholds, rates within
/// `0..=100`, and no two tiers on the same threshold.
pub fn validate_commission_tiers(tiers: &[CommissionTier]) -> Result<()> {
    for (index, tier) in tiers.iter().enumerate() {
        if tier.threshold_percent < Decimal::ZERO {
            return Err(Error::InvalidThreshold {
                index,
                reason: "threshold is negative".to_string(),
            });
        }
        if tier.commission_percent < Decimal::ZERO || tier.commission_percent > Decimal::ONE_HUNDRED
        {
            return Err(Error::InvalidThreshold {
                index,
                reason: format!("commission {}% is outside 0..=100", tier.commission_percent),
            });
        }
    }

    let mut sorted: Vec<(usize, &CommissionTier)> = tiers.iter().enumerate().collect();
    sorted.sort_by(|(_, a), (_, b)| a.threshold_percent.cmp(&b.threshold_percent));
    for pair in sorted.windows(2) {
        if pair[0].1.threshold_percent == pair[1].1.threshold_percent {
            let (first, second) = (pair[0].0.min(pair[1].0), pair[0].0.max(pair[1].0));
            return Err(Error::DuplicateThreshold { first, second });
        }
    }

    Ok(())
}
