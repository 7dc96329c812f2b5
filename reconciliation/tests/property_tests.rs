//! Property-based tests for divergence classification
//!
//! - Equal amounts never diverge
//! - Swapping the amounts negates the difference
//! - Severity depends only on the magnitude of the difference
//! - Closure is allowed exactly when no issue is reported

use capinhas_core::money::MAX_CENTS;
use capinhas_core::Money;
use proptest::prelude::*;
use reconciliation::{
    can_close, classify, closure_issues, ClosureIssue, Error, Severity, ShiftKey,
    ShiftReconciliation, ShiftSegment,
};

fn money_strategy() -> impl Strategy<Value = Money> {
    (-10_000_000i64..10_000_000i64).prop_map(Money::from_cents)
}

fn bounded_money_strategy() -> impl Strategy<Value = Money> {
    (-MAX_CENTS..=MAX_CENTS).prop_map(Money::from_cents)
}

fn justification_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   \t".to_string())),
        "[a-zA-Z ]{1,40}".prop_map(Some),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Property: a drawer that matches the system never diverges
    #[test]
    fn prop_equal_amounts_balanced(amount in money_strategy()) {
        let report = classify(amount, amount);
        prop_assert!(!report.has_divergence);
        prop_assert_eq!(report.difference, Money::ZERO);
        prop_assert_eq!(report.severity, Severity::Balanced);
    }

    /// Property: classification is antisymmetric in its inputs
    #[test]
    fn prop_swap_negates(a in money_strategy(), b in money_strategy()) {
        let forward = classify(a, b);
        let backward = classify(b, a);
        prop_assert_eq!(forward.difference, -backward.difference);
        prop_assert_eq!(forward.has_divergence, backward.has_divergence);
        prop_assert_eq!(forward.severity, backward.severity);
    }

    /// Property: the difference of any two admitted amounts is exact or saturates
    #[test]
    fn prop_difference_never_wraps(
        system in bounded_money_strategy(),
        real in bounded_money_strategy(),
    ) {
        let report = classify(system, real);
        let exact = i128::from(real.cents()) - i128::from(system.cents());
        let bound = i128::from(MAX_CENTS);
        prop_assert_eq!(i128::from(report.difference.cents()), exact.clamp(-bound, bound));
        prop_assert_eq!(report.has_divergence, exact != 0);
        if exact.abs() > 5_000 {
            prop_assert_eq!(report.severity, Severity::Critical);
        }
    }

    /// Property: severity grows with the magnitude of the difference
    #[test]
    fn prop_severity_monotonic(a in 0i64..20_000, b in 0i64..20_000) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            Severity::from_difference(Money::from_cents(small))
                <= Severity::from_difference(Money::from_cents(large))
        );
    }

    /// Property: the closure gate matches the issue list
    #[test]
    fn prop_gate_matches_issues(
        system in money_strategy(),
        real in money_strategy(),
        justification in justification_strategy(),
        justified in any::<bool>(),
    ) {
        let report = classify(system, real);
        let issues = closure_issues(&report, justification.as_deref(), justified);
        prop_assert_eq!(can_close(&report, justification.as_deref(), justified), issues.is_empty());

        let has_text = justification.as_deref().map_or(false, |t| !t.trim().is_empty());
        let expected = !report.has_divergence || (justified && has_text);
        prop_assert_eq!(issues.is_empty(), expected);

        if report.has_divergence {
            prop_assert_eq!(issues.contains(&ClosureIssue::MissingJustification), !has_text);
            prop_assert_eq!(issues.contains(&ClosureIssue::NotConfirmed), !justified);
        }
    }

    /// Property: a closed shift rejects every further change
    #[test]
    fn prop_closed_shift_immutable(amount in money_strategy(), recount in money_strategy()) {
        let key = ShiftKey {
            store_id: capinhas_core::StoreId::new("loja-1"),
            seller_id: capinhas_core::SellerId::new("vend-1"),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            segment: ShiftSegment::Night,
        };
        let mut shift = ShiftReconciliation::new(key, amount, amount);
        shift.close(chrono::Utc::now()).unwrap();

        prop_assert!(matches!(shift.record_count(recount), Err(Error::ShiftClosed(_))));
        prop_assert!(matches!(shift.justify("x", true), Err(Error::ShiftClosed(_))));
        prop_assert_eq!(shift.real_amount, amount);
    }
}
