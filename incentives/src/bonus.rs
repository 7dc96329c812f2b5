//! Bonus band resolution
//!
//! Bands are read-only here: the table is trusted to have been checked by
//! [`crate::validation::validate_bonus_tiers`] when it was edited. Tables
//! that slipped through anyway resolve to the nearest band below the amount
//! and log a configuration warning instead of failing.

use crate::types::BonusTier;
use capinhas_core::Money;
use serde::Serialize;
use tracing::{debug, warn};

/// Where an amount sits in a bonus table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusResolution {
    /// Reward of the band already reached
    pub reward_if_qualified: Money,

    /// How much more must be sold to reach the next band
    pub distance_to_next_tier: Money,

    /// Reward of the next band (zero past the top band)
    pub next_reward: Money,

    /// Band already reached
    pub current_tier: Option<BonusTier>,

    /// Next band up
    pub next_tier: Option<BonusTier>,

    /// False when the amount fell in a gap or past a finite top bound
    pub within_band: bool,
}

impl BonusResolution {
    fn empty() -> Self {
        Self {
            reward_if_qualified: Money::ZERO,
            distance_to_next_tier: Money::ZERO,
            next_reward: Money::ZERO,
            current_tier: None,
            next_tier: None,
            within_band: false,
        }
    }
}

/// Resolve the earned reward and the distance to the next band
pub fn resolve_bonus_tier(amount: Money, tiers: &[BonusTier]) -> BonusResolution {
    let mut active: Vec<&BonusTier> = tiers.iter().filter(|t| t.active).collect();
    if active.is_empty() {
        return BonusResolution::empty();
    }
    active.sort_by_key(|t| t.lower_bound);

    let split = active.partition_point(|t| t.lower_bound <= amount);
    let (reached, ahead) = active.split_at(split);

    let mut resolution = BonusResolution::empty();

    if let Some(next) = ahead.first() {
        resolution.next_reward = next.reward;
        resolution.distance_to_next_tier = next.lower_bound - amount;
        resolution.next_tier = Some((*next).clone());
    }

    if let Some((current, below)) = reached.split_last() {
        resolution.reward_if_qualified = current.reward;
        resolution.within_band = current.contains(amount);
        resolution.current_tier = Some((*current).clone());

        if !resolution.within_band {
            warn!(
                amount = %amount,
                lower_bound = %current.lower_bound,
                "Amount falls outside every bonus band; using nearest band below"
            );
        }
        if below.iter().any(|t| t.contains(amount)) {
            warn!(
                amount = %amount,
                "Overlapping bonus bands; using the band with the highest lower bound"
            );
        }
    }

    debug!(
        amount = %amount,
        reward = %resolution.reward_if_qualified,
        distance = %resolution.distance_to_next_tier,
        "Resolved bonus band"
    );

    resolution
}
