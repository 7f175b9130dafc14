//! Error types returned by the schedule engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized Result type for schedule operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Names the plan input that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanField {
    Principal,
    DownPayment,
    InstallmentCount,
    AnnualInterestRate,
}

impl fmt::Display for PlanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanField::Principal => "principal",
            PlanField::DownPayment => "down payment",
            PlanField::InstallmentCount => "installment count",
            PlanField::AnnualInterestRate => "annual interest rate",
        };
        f.write_str(name)
    }
}

/// Errors produced while validating a plan or building its schedule.
///
/// Either a complete schedule is returned or one of these; no partial
/// schedule ever escapes the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// A plan input violates a precondition.
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// The offending input.
        field: PlanField,
        /// What is wrong with it.
        reason: String,
    },

    /// The due date of an installment cannot be represented.
    #[error("Due date of installment {number} is out of range")]
    DueDateOutOfRange {
        /// Position of the installment in the schedule.
        number: u32,
    },

    /// A decimal computation exceeded the representable range.
    #[error("Arithmetic overflow while computing {context}")]
    Overflow {
        /// The quantity being computed.
        context: &'static str,
    },
}

impl ScheduleError {
    pub(crate) fn invalid(field: PlanField, reason: impl Into<String>) -> Self {
        ScheduleError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// The field that failed validation, if this is an input error.
    pub fn field(&self) -> Option<PlanField> {
        match self {
            ScheduleError::InvalidInput { field, .. } => Some(*field),
            _ => None,
        }
    }
}
