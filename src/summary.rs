//! Totals derived from a schedule, and previews computed before one exists.
//!
//! Both paths accumulate the same amortization fold in the same order, so a
//! quotation preview always agrees with the schedule later generated for the
//! same plan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::plan::PlanInput;
use crate::schedule::{self, Installment, MONEY_SCALE};

/// Aggregate figures of a payment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_principal: Decimal,
    pub total_interest: Decimal,
    /// Principal plus interest: what the customer pays in total.
    pub total_payable: Decimal,
}

impl ScheduleSummary {
    /// Copy with every total rounded to [`MONEY_SCALE`] for display or storage.
    pub fn rounded(&self) -> Self {
        Self {
            total_principal: self.total_principal.round_dp(MONEY_SCALE),
            total_interest: self.total_interest.round_dp(MONEY_SCALE),
            total_payable: self.total_payable.round_dp(MONEY_SCALE),
        }
    }
}

/// Figures shown to a customer while a plan is still being chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationPreview {
    pub principal: Decimal,
    pub down_payment: Decimal,
    pub financed_principal: Decimal,
    /// Constant payment of each periodic installment, if any are due.
    pub periodic_payment: Option<Decimal>,
    /// Number of periodic installments after the down payment.
    pub periodic_installments: u32,
    pub total_interest: Decimal,
    pub projected_payable: Decimal,
}

impl QuotationPreview {
    /// Copy with every amount rounded to [`MONEY_SCALE`] for display or storage.
    pub fn rounded(&self) -> Self {
        Self {
            principal: self.principal.round_dp(MONEY_SCALE),
            down_payment: self.down_payment.round_dp(MONEY_SCALE),
            financed_principal: self.financed_principal.round_dp(MONEY_SCALE),
            periodic_payment: self.periodic_payment.map(|p| p.round_dp(MONEY_SCALE)),
            periodic_installments: self.periodic_installments,
            total_interest: self.total_interest.round_dp(MONEY_SCALE),
            projected_payable: self.projected_payable.round_dp(MONEY_SCALE),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    principal: Decimal,
    interest: Decimal,
    periods: u32,
}

impl Totals {
    fn add(self, principal: Decimal, interest: Decimal) -> Self {
        Self {
            principal: self.principal + principal,
            interest: self.interest + interest,
            periods: self.periods + 1,
        }
    }

    fn into_summary(self) -> ScheduleSummary {
        ScheduleSummary {
            total_principal: self.principal,
            total_interest: self.interest,
            total_payable: self.principal + self.interest,
        }
    }
}

fn project(input: &PlanInput) -> Result<Totals> {
    Ok(schedule::periods(input)?.into_iter().fold(Totals::default(), |totals, period| {
        totals.add(period.principal_portion, period.interest_portion)
    }))
}

/// Sums a schedule's principal and interest portions.
///
/// An empty schedule yields all-zero totals.
pub fn summarize(schedule: &[Installment]) -> ScheduleSummary {
    schedule
        .iter()
        .fold(Totals::default(), |totals, installment| {
            totals.add(installment.principal_portion, installment.interest_portion)
        })
        .into_summary()
}

/// Total payable for a plan without materializing its schedule.
///
/// Equal to `summarize(&generate(input, date)?).total_payable` for any date.
///
/// # Errors
///
/// Returns the same errors as [`schedule::generate`] except those tied to due
/// dates, which the projection never computes.
pub fn project_total_payable(input: &PlanInput) -> Result<Decimal> {
    Ok(project(input)?.into_summary().total_payable)
}

/// Builds the quotation preview of a plan.
pub fn preview(input: &PlanInput) -> Result<QuotationPreview> {
    let totals = project(input)?;
    let periodic_payment = schedule::payment_for(input)?;
    let summary = totals.into_summary();

    Ok(QuotationPreview {
        principal: input.principal,
        down_payment: input.down_payment,
        financed_principal: input.financed_principal(),
        periodic_payment,
        periodic_installments: totals.periods.saturating_sub(1),
        total_interest: summary.total_interest,
        projected_payable: summary.total_payable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanKind;
    use crate::schedule::generate;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_summarize_empty_schedule() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_principal, dec!(0));
        assert_eq!(summary.total_interest, dec!(0));
        assert_eq!(summary.total_payable, dec!(0));
    }

    #[test]
    fn test_summarize_schedule() {
        let input =
            PlanInput::new(dec!(100000), dec!(20000), 12, dec!(12), PlanKind::Installment).unwrap();
        let summary = summarize(&generate(&input, reference_date()).unwrap()).rounded();

        assert_eq!(summary.total_principal, dec!(100000));
        assert_eq!(summary.total_interest, dec!(5294.84));
        assert_eq!(summary.total_payable, dec!(105294.84));
    }

    #[rstest]
    #[case(dec!(100000), dec!(20000), 12, dec!(12), PlanKind::Installment)]
    #[case(dec!(50000), dec!(0), 1, dec!(0), PlanKind::Cash)]
    #[case(dec!(30000), dec!(30000), 6, dec!(10), PlanKind::Installment)]
    #[case(dec!(10000), dec!(0), 5, dec!(0), PlanKind::Installment)]
    #[case(dec!(333333.33), dec!(1234.56), 7, dec!(13.75), PlanKind::Installment)]
    fn test_projection_matches_schedule(
        #[case] principal: Decimal,
        #[case] down_payment: Decimal,
        #[case] count: u32,
        #[case] rate: Decimal,
        #[case] kind: PlanKind,
    ) {
        let input = PlanInput::new(principal, down_payment, count, rate, kind).unwrap();
        let schedule = generate(&input, reference_date()).unwrap();

        assert_eq!(
            project_total_payable(&input).unwrap(),
            summarize(&schedule).total_payable
        );
    }

    #[test]
    fn test_projection_rejects_invalid_input() {
        let input = PlanInput {
            principal: dec!(10000),
            down_payment: dec!(15000),
            installment_count: 12,
            annual_interest_rate: dec!(12),
            plan_kind: PlanKind::Installment,
        };
        assert!(project_total_payable(&input).is_err());
    }

    #[test]
    fn test_preview() {
        let input =
            PlanInput::new(dec!(100000), dec!(20000), 12, dec!(12), PlanKind::Installment).unwrap();
        let preview = preview(&input).unwrap().rounded();

        assert_eq!(preview.financed_principal, dec!(80000));
        assert_eq!(preview.periodic_payment, Some(dec!(7107.90)));
        assert_eq!(preview.periodic_installments, 12);
        assert_eq!(preview.total_interest, dec!(5294.84));
        assert_eq!(preview.projected_payable, dec!(105294.84));
    }

    #[test]
    fn test_preview_of_cash_plan() {
        let input = PlanInput::new(dec!(50000), dec!(0), 1, dec!(0), PlanKind::Cash).unwrap();
        let preview = preview(&input).unwrap();

        assert_eq!(preview.periodic_payment, None);
        assert_eq!(preview.periodic_installments, 0);
        assert_eq!(preview.projected_payable, dec!(50000));
    }

    #[test]
    fn test_preview_warns_once_on_invalid_input() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct WarnCounter(Arc<AtomicUsize>);

        impl<S: Subscriber> Layer<S> for WarnCounter {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() == Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let input = PlanInput {
            principal: dec!(10000),
            down_payment: dec!(15000),
            installment_count: 12,
            annual_interest_rate: dec!(12),
            plan_kind: PlanKind::Installment,
        };

        let result = tracing::subscriber::with_default(subscriber, || preview(&input));

        assert!(result.is_err());
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }
}
