//! `payment_schedule` computes the installment schedules behind property sales
//! quotations, printed payment schedules and reservation confirmations.
//!
//! A plan is either:
//! - **Cash**: the full price is due at once on the reference date.
//! - **Installment**: a down payment (installment 0) followed by a fixed number
//!   of constant payments every 30 days, amortized with the Price (French)
//!   system at a nominal annual rate compounded monthly. A zero rate amortizes
//!   straight-line.
//!
//! All amounts are [`rust_decimal::Decimal`] and stay unrounded inside the
//! engine; round them with [`Installment::rounded`] and
//! [`ScheduleSummary::rounded`] when displaying or storing.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use payment_schedule::{PlanRequest, generate, project_total_payable, summarize};
//! use rust_decimal_macros::dec;
//!
//! let input = PlanRequest {
//!     label: "12 cuotas".to_string(),
//!     principal: dec!(100_000),
//!     down_payment: dec!(20_000),
//!     installment_count: 12,
//!     annual_interest_rate: dec!(12),
//! }
//! .into_input()
//! .expect("valid plan");
//!
//! let reference_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let schedule = generate(&input, reference_date).expect("schedule");
//! let summary = summarize(&schedule);
//!
//! assert_eq!(schedule.len(), 13);
//! assert_eq!(summary.rounded().total_payable, dec!(105294.84));
//! assert_eq!(project_total_payable(&input).unwrap(), summary.total_payable);
//! ```

pub mod error;
pub mod plan;
pub mod schedule;
pub mod summary;

pub use error::{PlanField, Result, ScheduleError};
pub use plan::{PERIOD_LENGTH_DAYS, PlanInput, PlanKind, PlanRequest, classify};
pub use schedule::{Installment, MONEY_SCALE, generate, periodic_payment};
pub use summary::{QuotationPreview, ScheduleSummary, preview, project_total_payable, summarize};
