//! Subscription and user records
//!
//! Plain data containers: a subscription carries the per-user monthly price,
//! a user carries one billable activity window. They have no behavior beyond
//! construction and validation; persistence and transport are the caller's
//! concern.

use crate::{Amount, BillingError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A customer's subscription plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: u32,
    pub customer_id: u32,
    /// Price per active user for a full month, in cents.
    pub monthly_price: Amount,
}

impl Subscription {
    /// Create a new subscription.
    pub fn new(id: u32, customer_id: u32, monthly_price: Amount) -> Self {
        Self {
            id,
            customer_id,
            monthly_price,
        }
    }
}

/// One user's billable interval.
///
/// `activated_on` is the first billable day. `deactivated_on`, when present,
/// is the last billable day (inclusive); when absent the user is still active
/// indefinitely. Both boundary days bill: a user present on a single day is
/// billable for that day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub customer_id: u32,
    pub activated_on: NaiveDate,
    pub deactivated_on: Option<NaiveDate>,
}

impl User {
    /// Create a new, still-active user.
    pub fn new(id: u32, name: impl Into<String>, customer_id: u32, activated_on: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            customer_id,
            activated_on,
            deactivated_on: None,
        }
    }

    /// Set the deactivation date (last billable day, inclusive).
    pub fn with_deactivated_on(mut self, deactivated_on: NaiveDate) -> Self {
        self.deactivated_on = Some(deactivated_on);
        self
    }

    /// Validate the activity window.
    ///
    /// The proration algorithm does not check window ordering; callers that
    /// accept untrusted input should validate before computing a charge.
    pub fn validate(&self) -> Result<()> {
        if let Some(deactivated_on) = self.deactivated_on {
            if deactivated_on < self.activated_on {
                return Err(BillingError::InvalidActivityWindow(format!(
                    "user {} deactivated on {} before activation on {}",
                    self.id, deactivated_on, self.activated_on
                ))
                .into());
            }
        }
        Ok(())
    }
}
