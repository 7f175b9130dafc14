//! Plan inputs and the cash/installment classifier.
//!
//! Plan type arrives from the configuration store as a free-text label. The
//! classifier turns that label into a [`PlanKind`] so the numeric code never
//! looks at strings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PlanField, Result, ScheduleError};

/// Length of every installment period, in days.
pub const PERIOD_LENGTH_DAYS: u32 = 30;

/// Label fragments that mark a plan as a single lump-sum payment.
const CASH_TOKENS: [&str; 3] = ["cash", "contado", "lump"];

/// How a plan is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// The full price is due at once on the reference date.
    Cash,
    /// A down payment followed by periodic amortized installments.
    Installment,
}

/// Classifies a plan from its descriptive label and installment count.
///
/// A plan is [`PlanKind::Cash`] when it has exactly one installment or when its
/// label contains a cash token (case-insensitive). Anything else is an
/// installment plan.
pub fn classify(plan_label: &str, installment_count: u32) -> PlanKind {
    if installment_count == 1 {
        return PlanKind::Cash;
    }

    let label = plan_label.to_lowercase();
    if CASH_TOKENS.iter().any(|token| label.contains(token)) {
        PlanKind::Cash
    } else {
        PlanKind::Installment
    }
}

/// Validated parameters of a single schedule calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInput {
    /// The property's base price.
    pub principal: Decimal,
    /// Amount paid upfront as installment 0.
    pub down_payment: Decimal,
    /// Number of periodic installments after the down payment.
    pub installment_count: u32,
    /// Nominal annual rate as a percentage (e.g., 12.5 for 12.5%).
    pub annual_interest_rate: Decimal,
    /// Which generation path the plan takes.
    pub plan_kind: PlanKind,
}

impl PlanInput {
    /// Builds a plan input, rejecting values that violate its preconditions.
    pub fn new(
        principal: Decimal,
        down_payment: Decimal,
        installment_count: u32,
        annual_interest_rate: Decimal,
        plan_kind: PlanKind,
    ) -> Result<Self> {
        let input = Self {
            principal,
            down_payment,
            installment_count,
            annual_interest_rate,
            plan_kind,
        };
        input.validate()?;
        Ok(input)
    }

    /// Checks every precondition of the generator.
    ///
    /// The fields are public so deserialized inputs bypass [`PlanInput::new`];
    /// the generator calls this again before computing anything.
    pub fn validate(&self) -> Result<()> {
        let failure = if self.principal < Decimal::ZERO {
            Some((PlanField::Principal, format!("{} is negative", self.principal)))
        } else if self.down_payment < Decimal::ZERO {
            Some((PlanField::DownPayment, format!("{} is negative", self.down_payment)))
        } else if self.down_payment > self.principal {
            Some((
                PlanField::DownPayment,
                format!("{} exceeds principal {}", self.down_payment, self.principal),
            ))
        } else if self.installment_count < 1 {
            Some((PlanField::InstallmentCount, "must be at least 1".to_string()))
        } else if self.annual_interest_rate < Decimal::ZERO {
            Some((
                PlanField::AnnualInterestRate,
                format!("{} is negative", self.annual_interest_rate),
            ))
        } else {
            None
        };

        match failure {
            Some((field, reason)) => {
                warn!(%field, %reason, "rejected plan input");
                Err(ScheduleError::invalid(field, reason))
            }
            None => Ok(()),
        }
    }

    /// Principal left to amortize after the down payment.
    pub fn financed_principal(&self) -> Decimal {
        self.principal - self.down_payment
    }

    /// Monthly rate as a decimal factor: the nominal annual percentage / 12 / 100.
    pub fn monthly_rate(&self) -> Decimal {
        self.annual_interest_rate / dec!(12) / dec!(100)
    }
}

/// A plan as stored by the plan configuration: label-based, not yet classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Descriptive plan name, e.g. "Contado" or "24 cuotas".
    #[serde(default)]
    pub label: String,
    pub principal: Decimal,
    #[serde(default)]
    pub down_payment: Decimal,
    pub installment_count: u32,
    #[serde(default)]
    pub annual_interest_rate: Decimal,
}

impl PlanRequest {
    /// Classifies the plan and validates it into a [`PlanInput`].
    pub fn into_input(self) -> Result<PlanInput> {
        let plan_kind = classify(&self.label, self.installment_count);
        PlanInput::new(
            self.principal,
            self.down_payment,
            self.installment_count,
            self.annual_interest_rate,
            plan_kind,
        )
    }
}
