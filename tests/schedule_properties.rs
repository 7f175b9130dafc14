// Property-based checks of the schedule invariants.

use chrono::{Days, NaiveDate};
use payment_schedule::{
    PlanInput, PlanKind, generate, periodic_payment, project_total_payable, summarize,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Valid installment plans: prices up to 10M with cents, rates 0%..30% in
/// basis points, and up to 30 years of monthly installments.
fn installment_plan() -> impl Strategy<Value = PlanInput> {
    (
        0i64..1_000_000_000,
        0u32..=100,
        1u32..=360,
        0i64..=3000,
    )
        .prop_map(|(cents, down_percent, count, rate_bps)| {
            let principal = Decimal::new(cents, 2);
            let down_payment = (principal * Decimal::from(down_percent) / dec!(100)).round_dp(2);
            PlanInput {
                principal,
                down_payment,
                installment_count: count,
                annual_interest_rate: Decimal::new(rate_bps, 2),
                plan_kind: PlanKind::Installment,
            }
        })
}

fn reference_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..20_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Days::new(offset)
    })
}

proptest! {
    /// Principal portions add up to the price, within a cent per installment.
    #[test]
    fn prop_principal_is_conserved(input in installment_plan(), date in reference_date()) {
        let schedule = generate(&input, date).unwrap();
        let paid: Decimal = schedule.iter().map(|i| i.principal_portion).sum();
        let tolerance = dec!(0.01) * Decimal::from(schedule.len() as u32);

        prop_assert!((paid - input.principal).abs() <= tolerance, "paid {} of {}", paid, input.principal);
    }

    /// Each installment opens with the balance the previous one left.
    #[test]
    fn prop_balance_is_continuous(input in installment_plan(), date in reference_date()) {
        let schedule = generate(&input, date).unwrap();

        for pair in schedule[1..].windows(2) {
            prop_assert_eq!(
                pair[0].opening_balance - pair[0].principal_portion,
                pair[1].opening_balance
            );
        }
    }

    /// The preview total is exactly the total of the generated schedule.
    #[test]
    fn prop_projection_matches_schedule(input in installment_plan(), date in reference_date()) {
        let schedule = generate(&input, date).unwrap();

        prop_assert_eq!(
            project_total_payable(&input).unwrap(),
            summarize(&schedule).total_payable
        );
    }

    /// Installment 0 falls on the reference date, the rest every 30 days.
    #[test]
    fn prop_due_dates_are_evenly_spaced(input in installment_plan(), date in reference_date()) {
        let schedule = generate(&input, date).unwrap();

        prop_assert_eq!(schedule[0].due_date, date);
        prop_assert_eq!(schedule[0].period_days, 0);
        for installment in &schedule[1..] {
            let offset = Days::new(u64::from(installment.number) * 30);
            prop_assert_eq!(installment.due_date, date + offset);
            prop_assert_eq!(installment.period_days, 30);
        }
    }

    /// Interest-free plans split the financed principal evenly.
    #[test]
    fn prop_zero_rate_is_straight_line(
        mut input in installment_plan(),
        date in reference_date(),
    ) {
        input.annual_interest_rate = Decimal::ZERO;
        let schedule = generate(&input, date).unwrap();
        let financed = input.financed_principal();

        if financed > Decimal::ZERO {
            let share = (financed / Decimal::from(input.installment_count)).round_dp(2);
            prop_assert_eq!(schedule.len() as u32, input.installment_count + 1);
            for installment in &schedule[1..] {
                prop_assert_eq!(installment.interest_portion, Decimal::ZERO);
                prop_assert_eq!(installment.principal_portion.round_dp(2), share);
            }
        } else {
            prop_assert_eq!(schedule.len(), 1);
        }
    }

    /// Cash plans are a single payment of the full price.
    #[test]
    fn prop_cash_plan_is_single_payment(
        mut input in installment_plan(),
        date in reference_date(),
    ) {
        input.plan_kind = PlanKind::Cash;
        let schedule = generate(&input, date).unwrap();

        prop_assert_eq!(schedule.len(), 1);
        prop_assert_eq!(schedule[0].total_amount, input.principal);
        prop_assert_eq!(periodic_payment(&input).unwrap(), None);
    }

    /// Every periodic installment pays the same amount.
    #[test]
    fn prop_periodic_payment_is_constant(input in installment_plan(), date in reference_date()) {
        let schedule = generate(&input, date).unwrap();

        if let Some(payment) = periodic_payment(&input).unwrap() {
            for installment in &schedule[1..] {
                prop_assert_eq!(installment.total_amount, payment);
            }
        }
    }
}
