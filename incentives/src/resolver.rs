//! Dispatch over tier table kinds

use crate::bonus::{resolve_bonus_tier, BonusResolution};
use crate::commission::{commission_amount, resolve_commission_tier};
use crate::types::{SalesPerformance, TierTable};
use crate::Result;
use capinhas_core::Money;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// Commission outcome for one performance snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionResolution {
    /// Sales over goal in percent; `None` without a positive goal
    pub achievement_percent: Option<Decimal>,

    /// Rate of the applicable tier
    pub commission_percent: Decimal,

    /// Commission owed on the sales
    pub commission_amount: Money,
}

/// Outcome of resolving any tier table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierOutcome {
    /// Bonus band outcome
    Bonus(BonusResolution),
    /// Commission tier outcome
    Commission(CommissionResolution),
}

/// Tier resolver
#[derive(Debug, Default)]
pub struct TierResolver;

impl TierResolver {
    /// Create new tier resolver
    pub fn new() -> Self {
        Self
    }

    /// Resolve `performance` against a table of either kind
    pub fn resolve(&self, table: &TierTable, performance: &SalesPerformance) -> Result<TierOutcome> {
        match table {
            TierTable::Bonus(tiers) => Ok(TierOutcome::Bonus(resolve_bonus_tier(
                performance.sales,
                tiers,
            ))),
            TierTable::Commission(tiers) => {
                let achievement = performance.achievement_percent();
                if achievement.is_none() {
                    warn!(goal = %performance.goal, "No positive sales goal; achievement counts as 0%");
                }
                let rate = resolve_commission_tier(achievement.unwrap_or(Decimal::ZERO), tiers);
                Ok(TierOutcome::Commission(CommissionResolution {
                    achievement_percent: achievement,
                    commission_percent: rate,
                    commission_amount: commission_amount(performance.sales, rate)?,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BonusTier, CommissionTier};
    use rust_decimal_macros::dec;

    #[test]
    fn test_bonus_dispatch() {
        let table = TierTable::Bonus(vec![
            BonusTier::new(Money::from_reais(500), Some(Money::from_cents(99_999)), Money::from_reais(10)),
            BonusTier::new(Money::from_reais(1000), None, Money::from_reais(25)),
        ]);
        let performance = SalesPerformance::new(Money::from_reais(750), Money::from_reais(2000));

        let outcome = TierResolver::new().resolve(&table, &performance).unwrap();
        match outcome {
            TierOutcome::Bonus(resolution) => {
                assert_eq!(resolution.reward_if_qualified, Money::from_reais(10));
                assert_eq!(resolution.distance_to_next_tier, Money::from_reais(250));
            }
            TierOutcome::Commission(_) => panic!("expected bonus outcome"),
        }
    }

    #[test]
    fn test_commission_dispatch() {
        let table = TierTable::Commission(vec![
            CommissionTier::new(dec!(90), dec!(1)),
            CommissionTier::new(dec!(110), dec!(2)),
        ]);
        let performance = SalesPerformance::new(Money::from_reais(11_000), Money::from_reais(10_000));

        let outcome = TierResolver::new().resolve(&table, &performance).unwrap();
        assert_eq!(
            outcome,
            TierOutcome::Commission(CommissionResolution {
                achievement_percent: Some(dec!(110)),
                commission_percent: dec!(2),
                commission_amount: Money::from_reais(220),
            })
        );
    }

    #[test]
    fn test_commission_without_goal() {
        let table = TierTable::Commission(vec![CommissionTier::new(dec!(0), dec!(0.5))]);
        let performance = SalesPerformance::new(Money::from_reais(1_000), Money::ZERO);

        let outcome = TierResolver::new().resolve(&table, &performance).unwrap();
        match outcome {
            TierOutcome::Commission(resolution) => {
                assert_eq!(resolution.achievement_percent, None);
                assert_eq!(resolution.commission_percent, dec!(0.5));
                assert_eq!(resolution.commission_amount, Money::from_reais(5));
            }
            TierOutcome::Bonus(_) => panic!("expected commission outcome"),
        }
    }

    #[test]
    fn test_commission_overflow_is_an_error() {
        let table = TierTable::Commission(vec![CommissionTier::new(
            dec!(0),
            dec!(100000000000000000000),
        )]);
        let performance = SalesPerformance::new(Money::from_reais(10_000_000_000), Money::from_reais(1));

        let result = TierResolver::new().resolve(&table, &performance);
        assert!(matches!(result, Err(crate::Error::Money(_))));
    }
}
