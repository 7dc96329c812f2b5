//! Commission step resolution

use crate::types::CommissionTier;
use crate::Result;
use capinhas_core::Money;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Commission rate for an achievement percentage
///
/// The tier with the highest threshold not above `achievement_percent`
/// applies; below every threshold the rate is zero.
pub fn resolve_commission_tier(achievement_percent: Decimal, tiers: &[CommissionTier]) -> Decimal {
    if tiers.is_empty() {
        if !achievement_percent.is_zero() {
            warn!(
                achievement = %achievement_percent,
                "Empty commission table; no commission applies"
            );
        }
        return Decimal::ZERO;
    }

    let mut sorted: Vec<&CommissionTier> = tiers.iter().collect();
    sorted.sort_by(|a, b| b.threshold_percent.cmp(&a.threshold_percent));

    let rate = sorted
        .iter()
        .find(|t| t.threshold_percent <= achievement_percent)
        .map(|t| t.commission_percent)
        .unwrap_or(Decimal::ZERO);

    debug!(achievement = %achievement_percent, rate = %rate, "Resolved commission tier");
    rate
}

/// Sales as a percentage of the goal
///
/// `None` when the goal is zero or negative: there is nothing to measure
/// achievement against.
pub fn achievement_percent(sales: Money, goal: Money) -> Option<Decimal> {
    if goal.cents() <= 0 {
        return None;
    }
    Some(Decimal::from(sales.cents()) * Decimal::ONE_HUNDRED / Decimal::from(goal.cents()))
}

/// Commission owed on `sales` at `commission_percent`
pub fn commission_amount(sales: Money, commission_percent: Decimal) -> Result<Money> {
    Ok(sales.percent(commission_percent)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ladder() -> Vec<CommissionTier> {
        vec![
            CommissionTier::new(dec!(80), dec!(1)),
            CommissionTier::new(dec!(100), dec!(2)),
            CommissionTier::new(dec!(120), dec!(3)),
        ]
    }

    #[test]
    fn test_highest_reached_threshold_wins() {
        assert_eq!(resolve_commission_tier(dec!(105), &ladder()), dec!(2));
        assert_eq!(resolve_commission_tier(dec!(150), &ladder()), dec!(3));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(resolve_commission_tier(dec!(80), &ladder()), dec!(1));
        assert_eq!(resolve_commission_tier(dec!(79.99), &ladder()), dec!(0));
    }

    #[test]
    fn test_zero_achievement() {
        assert_eq!(resolve_commission_tier(dec!(0), &ladder()), dec!(0));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(resolve_commission_tier(dec!(130), &[]), dec!(0));
    }

    #[test]
    fn test_order_of_input_is_irrelevant() {
        let mut tiers = ladder();
        tiers.reverse();
        assert_eq!(resolve_commission_tier(dec!(119.9), &tiers), dec!(2));
    }

    #[test]
    fn test_achievement_percent() {
        let sales = Money::from_reais(9_500);
        let goal = Money::from_reais(10_000);
        assert_eq!(achievement_percent(sales, goal), Some(dec!(95)));
        assert_eq!(achievement_percent(sales, Money::ZERO), None);
        assert_eq!(achievement_percent(Money::ZERO, goal), Some(dec!(0)));
    }

    #[test]
    fn test_commission_amount() {
        let sales = Money::from_cents(1_234_567);
        assert_eq!(
            commission_amount(sales, dec!(1.5)).unwrap(),
            Money::from_cents(18_519)
        );
    }
}
