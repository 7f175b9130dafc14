//! Installment schedule generation.
//!
//! Installments after the down payment follow the Price (French) system: a
//! constant payment given by PMT = P * [i(1 + i)^n] / [(1 + i)^n – 1], where
//! `i` is the nominal annual rate divided by twelve. When `i` is zero the
//! payment falls back to straight-line amortization, P / n.

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::plan::{PERIOD_LENGTH_DAYS, PlanInput, PlanKind};

/// Decimal places of amounts handed to renderers and persistence.
pub const MONEY_SCALE: u32 = 2;

/// One entry of a payment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// Position in the schedule; 0 is the down payment.
    pub number: u32,
    /// Date the installment falls due.
    pub due_date: NaiveDate,
    /// Principal outstanding before this installment is applied.
    pub opening_balance: Decimal,
    /// The portion of the payment that reduces the balance.
    pub principal_portion: Decimal,
    /// The portion of the payment that covers interest.
    pub interest_portion: Decimal,
    /// Amount actually due: principal plus interest.
    pub total_amount: Decimal,
    /// Days covered by this installment; 0 for the down payment.
    pub period_days: u32,
}

impl Installment {
    /// Copy with every amount rounded to [`MONEY_SCALE`] for display or storage.
    pub fn rounded(&self) -> Self {
        Self {
            opening_balance: self.opening_balance.round_dp(MONEY_SCALE),
            principal_portion: self.principal_portion.round_dp(MONEY_SCALE),
            interest_portion: self.interest_portion.round_dp(MONEY_SCALE),
            total_amount: self.total_amount.round_dp(MONEY_SCALE),
            ..self.clone()
        }
    }
}

/// A step of the amortization fold before it is placed on the calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Period {
    pub number: u32,
    pub opening_balance: Decimal,
    pub principal_portion: Decimal,
    pub interest_portion: Decimal,
    pub total_amount: Decimal,
}

impl Period {
    fn into_installment(self, reference_date: NaiveDate) -> Result<Installment> {
        let offset = u64::from(self.number) * u64::from(PERIOD_LENGTH_DAYS);
        let due_date = reference_date
            .checked_add_days(Days::new(offset))
            .ok_or(ScheduleError::DueDateOutOfRange {
                number: self.number,
            })?;

        Ok(Installment {
            number: self.number,
            due_date,
            opening_balance: self.opening_balance,
            principal_portion: self.principal_portion,
            interest_portion: self.interest_portion,
            total_amount: self.total_amount,
            period_days: if self.number == 0 { 0 } else { PERIOD_LENGTH_DAYS },
        })
    }
}

/// Constant payment of installments 1..n, or `None` when nothing is financed.
///
/// Cash plans and plans whose down payment covers the whole price have no
/// periodic installments.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidInput`] if the plan fails validation, or
/// [`ScheduleError::Overflow`] if the compound growth factor or the payment
/// cannot be represented.
pub fn periodic_payment(input: &PlanInput) -> Result<Option<Decimal>> {
    input.validate()?;
    payment_for(input)
}

fn overflow(context: &'static str) -> ScheduleError {
    ScheduleError::Overflow { context }
}

pub(crate) fn payment_for(input: &PlanInput) -> Result<Option<Decimal>> {
    let financed = input.financed_principal();
    if input.plan_kind == PlanKind::Cash || financed <= Decimal::ZERO {
        return Ok(None);
    }

    let terms = Decimal::from(input.installment_count);
    let rate = input.monthly_rate();
    if rate.is_zero() {
        debug!(%financed, installments = input.installment_count, "zero interest rate, amortizing straight-line");
        return Ok(Some(financed / terms));
    }

    let growth = (Decimal::ONE + rate)
        .checked_powu(input.installment_count.into())
        .ok_or_else(|| overflow("compound growth factor"))?;
    let denominator = growth - Decimal::ONE;
    // Rates below decimal precision leave (1 + i)^n at exactly one.
    if denominator.is_zero() {
        return Ok(Some(financed / terms));
    }

    let factor = rate
        .checked_mul(growth)
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or_else(|| overflow("annuity factor"))?;
    financed
        .checked_mul(factor)
        .map(Some)
        .ok_or_else(|| overflow("periodic payment"))
}

/// Fold state: outstanding balance plus the running totals a summary will add up.
#[derive(Debug, Clone, Copy)]
struct Running {
    balance: Decimal,
    principal: Decimal,
    interest: Decimal,
}

/// Runs the amortization fold shared by [`generate`] and the aggregator.
///
/// Returns installment 0 followed by one period per financed installment, with
/// the outstanding balance carried as fold state. Every amount, and every total
/// a summary of these periods adds up, is checked to fit in a `Decimal`.
pub(crate) fn periods(input: &PlanInput) -> Result<Vec<Period>> {
    input.validate()?;

    let first = match input.plan_kind {
        PlanKind::Cash => Period {
            number: 0,
            opening_balance: input.principal,
            principal_portion: input.principal,
            interest_portion: Decimal::ZERO,
            total_amount: input.principal,
        },
        PlanKind::Installment => Period {
            number: 0,
            opening_balance: input.principal,
            principal_portion: input.down_payment,
            interest_portion: Decimal::ZERO,
            total_amount: input.down_payment,
        },
    };

    let Some(payment) = payment_for(input)? else {
        return Ok(vec![first]);
    };
    let rate = input.monthly_rate();

    let mut periods = Vec::with_capacity(input.installment_count as usize + 1);
    periods.push(first);

    let start = Running {
        balance: input.financed_principal(),
        principal: first.principal_portion,
        interest: Decimal::ZERO,
    };
    let end = (1..=input.installment_count).try_fold(start, |running, number| -> Result<Running> {
        let opening_balance = running.balance;
        let interest_portion = opening_balance
            .checked_mul(rate)
            .ok_or_else(|| overflow("interest portion"))?;
        let principal_portion = payment
            .checked_sub(interest_portion)
            .ok_or_else(|| overflow("principal portion"))?;

        periods.push(Period {
            number,
            opening_balance,
            principal_portion,
            interest_portion,
            total_amount: payment,
        });

        Ok(Running {
            balance: opening_balance
                .checked_sub(principal_portion)
                .ok_or_else(|| overflow("outstanding balance"))?,
            principal: running
                .principal
                .checked_add(principal_portion)
                .ok_or_else(|| overflow("total principal"))?,
            interest: running
                .interest
                .checked_add(interest_portion)
                .ok_or_else(|| overflow("total interest"))?,
        })
    })?;
    end.principal
        .checked_add(end.interest)
        .ok_or_else(|| overflow("total payable"))?;

    Ok(periods)
}

/// Generates the full installment schedule of a plan.
///
/// Installment 0 is due on `reference_date`; installment `i` is due
/// `i * 30` days later. Amounts are left unrounded; use
/// [`Installment::rounded`] at the output boundary.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidInput`] before computing anything if the
/// plan violates a precondition, and [`ScheduleError::Overflow`] if an amount
/// or total exceeds the `Decimal` range. No partial schedule is returned on
/// error.
pub fn generate(input: &PlanInput, reference_date: NaiveDate) -> Result<Vec<Installment>> {
    debug!(
        kind = ?input.plan_kind,
        installments = input.installment_count,
        rate = %input.annual_interest_rate,
        %reference_date,
        "generating payment schedule"
    );

    periods(input)?
        .into_iter()
        .map(|period| period.into_installment(reference_date))
        .collect()
}
