//! # Prorata
//!
//! Prorated monthly subscription billing.
//!
//! Given a billing month, a per-user monthly price, and a set of users with
//! activation/deactivation dates, this crate computes the total charge for
//! the month in integer currency subunits (cents), rounded once after
//! aggregation.
//!
//! Key properties:
//! - Fixed-point decimal arithmetic for financial accuracy (never f64)
//! - Day boundaries are inclusive: activation and deactivation days both bill
//! - Rounding happens once, on the aggregate, not per user
//! - Pure computation: no I/O, no shared state, safe to call concurrently
//!
//! Known limitation: the charge is always the full month's projected charge,
//! even when invoked mid-month. Partial-month billing relative to "today" is
//! out of scope.

pub mod amount;
pub mod month;
pub mod proration;
pub mod subscription;

pub use amount::Amount;
pub use month::BillingMonth;
pub use proration::{billable_days, ChargeBreakdown, ProrationCalculator, RoundingMode};
pub use subscription::{Subscription, User};

pub type Result<T> = anyhow::Result<T>;

#[derive(thiserror::Error, Debug)]
pub enum BillingError {
    #[error("invalid month format: {0:?} (expected \"YYYY-MM\")")]
    InvalidMonthFormat(String),
    #[error("invalid activity window: {0}")]
    InvalidActivityWindow(String),
}
