//! Prorated monthly charges
//!
//! This module computes the total monthly bill for a customer from per-user
//! activity windows: each user contributes the days of the billing month on
//! which they were active, and the price is prorated over the month's length.
//!
//! The day-count policy is a four-case decision table (see [`billable_days`]),
//! evaluated top to bottom with the first match winning. All day boundaries
//! are inclusive. Rounding to whole cents happens once, on the aggregate.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use prorata::{Amount, ProrationCalculator, Subscription, User};
//!
//! let plan = Subscription::new(1, 1, Amount::from_cents(5000));
//! let users = vec![
//!     User::new(1, "Employee", 1, NaiveDate::from_ymd_opt(2021, 10, 5).unwrap()),
//! ];
//!
//! let calculator = ProrationCalculator::new();
//! let charge = calculator.monthly_charge("2021-10", Some(&plan), &users).unwrap();
//! assert_eq!(charge.as_cents(), 4355); // 27 of 31 days, rounded to nearest cent
//! ```

use crate::{Amount, BillingMonth, Result, Subscription, User};
use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rounding mode for the aggregate charge.
#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Round to the nearest cent, ties away from zero.
    #[default]
    Nearest,
    /// Always round up (favor provider).
    Up,
    /// Always round down (favor subscriber).
    Down,
}

/// The figures behind a monthly charge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    /// The billing month.
    pub month: BillingMonth,
    /// Length of the billing month in days.
    pub days_in_month: u32,
    /// Billable days summed over all users.
    pub billable_days_total: u32,
    /// Price per active user for a full month.
    pub monthly_price: Amount,
    /// The rounded total charge in cents.
    pub charge: Amount,
}

/// Calculator for prorated monthly charges.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProrationCalculator {
    /// Rounding mode for the aggregate charge.
    pub rounding_mode: RoundingMode,
}

impl ProrationCalculator {
    /// Create a new calculator with nearest-cent rounding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rounding mode.
    pub fn with_rounding(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = mode;
        self
    }

    /// Compute the total monthly bill for the customer in cents.
    ///
    /// `month` is a `"YYYY-MM"` token (e.g. `"2022-04"` for April 2022);
    /// malformed tokens fail with [`crate::BillingError::InvalidMonthFormat`].
    /// An absent subscription or an empty user list yields a zero charge, not
    /// an error.
    ///
    /// Note: this always returns the PROJECTED full charge for the month,
    /// even when called mid-month.
    pub fn monthly_charge(
        &self,
        month: &str,
        subscription: Option<&Subscription>,
        users: &[User],
    ) -> Result<Amount> {
        Ok(self
            .monthly_charge_breakdown(month, subscription, users)?
            .charge)
    }

    /// Compute the monthly charge along with the figures behind it.
    pub fn monthly_charge_breakdown(
        &self,
        month: &str,
        subscription: Option<&Subscription>,
        users: &[User],
    ) -> Result<ChargeBreakdown> {
        let month = BillingMonth::parse(month)?;
        let days_in_month = month.days_in_month();

        let Some(subscription) = subscription else {
            return Ok(ChargeBreakdown {
                month,
                days_in_month,
                billable_days_total: 0,
                monthly_price: Amount::zero(),
                charge: Amount::zero(),
            });
        };

        let billable_days_total: u32 = users.iter().map(|user| billable_days(user, &month)).sum();

        // One rounding pass on the aggregate, never per user.
        let exact = subscription.monthly_price.as_decimal() * Decimal::from(billable_days_total)
            / Decimal::from(days_in_month);
        let charge = Amount::from_decimal(self.apply_rounding(exact));

        tracing::debug!(
            "monthly charge for {}: {} billable days over {} days -> {} cents",
            month,
            billable_days_total,
            days_in_month,
            charge
        );

        Ok(ChargeBreakdown {
            month,
            days_in_month,
            billable_days_total,
            monthly_price: subscription.monthly_price,
            charge,
        })
    }

    fn apply_rounding(&self, value: Decimal) -> Decimal {
        match self.rounding_mode {
            // Decimal::round() is banker's rounding; the billing contract is
            // ties away from zero.
            RoundingMode::Nearest => {
                value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            }
            RoundingMode::Up => value.ceil(),
            RoundingMode::Down => value.floor(),
        }
    }
}

/// Days of the billing month on which the user bills.
///
/// Guards evaluated top to bottom, first match wins:
///
/// 1. Activated after the month end: 0.
/// 2. Deactivated before the month start: 0.
/// 3. Still active through/past the month end: full month if activated
///    before it, otherwise activation day through month end inclusive.
/// 4. Deactivated during the month: day 1 through deactivation day if
///    activated before the month, otherwise activation day through
///    deactivation day with both boundary days billed.
///
/// Window ordering (`deactivated_on >= activated_on`) is NOT checked here;
/// see [`User::validate`].
pub fn billable_days(user: &User, month: &BillingMonth) -> u32 {
    let month_start = month.first_day();
    let month_end = month.last_day();

    // Started after the billing month: no charge this month.
    if user.activated_on > month_end {
        return 0;
    }
    // Ended before the billing month: no charge.
    if user.deactivated_on.is_some_and(|d| d < month_start) {
        return 0;
    }

    match user.deactivated_on {
        // Deactivated sometime this month.
        Some(deactivated_on) if deactivated_on <= month_end => {
            if user.activated_on < month_start {
                deactivated_on.day()
            } else {
                // Activated and deactivated this month; both boundary days bill.
                deactivated_on.day() - user.activated_on.day() + 2
            }
        }
        // Still active through or past the month end.
        _ => {
            if user.activated_on < month_start {
                month.days_in_month()
            } else {
                month.days_in_month() - user.activated_on.day() + 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn october() -> BillingMonth {
        BillingMonth::parse("2021-10").unwrap()
    }

    fn plan() -> Subscription {
        Subscription::new(1, 1, Amount::from_cents(5000))
    }

    #[test]
    fn test_no_days_when_activated_after_month() {
        let user = User::new(1, "Employee", 1, date(2021, 11, 1));
        assert_eq!(billable_days(&user, &october()), 0);
    }

    #[test]
    fn test_no_days_when_deactivated_before_month() {
        let user =
            User::new(1, "Employee", 1, date(2019, 1, 1)).with_deactivated_on(date(2021, 9, 30));
        assert_eq!(billable_days(&user, &october()), 0);
    }

    #[test]
    fn test_full_month_when_spanning() {
        let user = User::new(1, "Employee", 1, date(2019, 1, 1));
        assert_eq!(billable_days(&user, &october()), 31);

        let user = user.with_deactivated_on(date(2023, 11, 10));
        assert_eq!(billable_days(&user, &october()), 31);
    }

    #[test]
    fn test_activated_mid_month_still_active() {
        // Activation day through month end, inclusive.
        let user = User::new(1, "Employee", 1, date(2021, 10, 5));
        assert_eq!(billable_days(&user, &october()), 27);
    }

    #[test]
    fn test_deactivated_mid_month_activated_before() {
        // Day 1 through and including the deactivation day.
        let user =
            User::new(1, "Employee", 1, date(2021, 9, 1)).with_deactivated_on(date(2021, 10, 10));
        assert_eq!(billable_days(&user, &october()), 10);
    }

    #[test]
    fn test_activated_and_deactivated_same_month() {
        // Both boundary days bill.
        let user =
            User::new(1, "Employee", 1, date(2021, 10, 5)).with_deactivated_on(date(2021, 10, 10));
        assert_eq!(billable_days(&user, &october()), 7);
    }

    #[test]
    fn test_single_day_presence_bills() {
        let user =
            User::new(1, "Employee", 1, date(2021, 9, 1)).with_deactivated_on(date(2021, 10, 1));
        assert_eq!(billable_days(&user, &october()), 1);
    }

    #[test]
    fn test_month_boundary_days_inclusive() {
        // Activated on the first day, still active: full month.
        let user = User::new(1, "Employee", 1, date(2021, 10, 1));
        assert_eq!(billable_days(&user, &october()), 31);

        // Deactivated on the last day, activated before: full month.
        let user =
            User::new(2, "Employee", 1, date(2021, 9, 1)).with_deactivated_on(date(2021, 10, 31));
        assert_eq!(billable_days(&user, &october()), 31);

        // Activated on the last day, still active: one day.
        let user = User::new(3, "Employee", 1, date(2021, 10, 31));
        assert_eq!(billable_days(&user, &october()), 1);
    }

    #[test]
    fn test_zero_charge_without_subscription() {
        let calc = ProrationCalculator::new();
        let users = vec![User::new(1, "Employee", 1, date(2021, 10, 5))];
        let charge = calc.monthly_charge("2021-10", None, &users).unwrap();
        assert!(charge.is_zero());
    }

    #[test]
    fn test_zero_charge_for_empty_user_list() {
        let calc = ProrationCalculator::new();
        let charge = calc.monthly_charge("2021-10", Some(&plan()), &[]).unwrap();
        assert!(charge.is_zero());
    }

    #[test]
    fn test_invalid_month_token() {
        let calc = ProrationCalculator::new();
        let err = calc.monthly_charge("10-2021", Some(&plan()), &[]).unwrap_err();
        assert!(err
            .downcast_ref::<crate::BillingError>()
            .is_some_and(|e| matches!(e, crate::BillingError::InvalidMonthFormat(_))));
    }

    #[test]
    fn test_breakdown_figures() {
        let calc = ProrationCalculator::new();
        let users = vec![
            User::new(1, "Employee #1", 1, date(2021, 10, 5)),
            User::new(2, "Employee #2", 1, date(2021, 9, 1))
                .with_deactivated_on(date(2021, 10, 10)),
        ];

        let breakdown = calc
            .monthly_charge_breakdown("2021-10", Some(&plan()), &users)
            .unwrap();
        assert_eq!(breakdown.days_in_month, 31);
        assert_eq!(breakdown.billable_days_total, 27 + 10);
        assert_eq!(breakdown.monthly_price, Amount::from_cents(5000));
        // round(5000 * 37 / 31) = round(5967.74...) = 5968
        assert_eq!(breakdown.charge.as_cents(), 5968);
    }

    #[test]
    fn test_rounding_modes() {
        // 5000 * 27 / 31 = 4354.838...
        let users = vec![User::new(1, "Employee", 1, date(2021, 10, 5))];

        let nearest = ProrationCalculator::new()
            .monthly_charge("2021-10", Some(&plan()), &users)
            .unwrap();
        assert_eq!(nearest.as_cents(), 4355);

        let up = ProrationCalculator::new()
            .with_rounding(RoundingMode::Up)
            .monthly_charge("2021-10", Some(&plan()), &users)
            .unwrap();
        assert_eq!(up.as_cents(), 4355);

        let down = ProrationCalculator::new()
            .with_rounding(RoundingMode::Down)
            .monthly_charge("2021-10", Some(&plan()), &users)
            .unwrap();
        assert_eq!(down.as_cents(), 4354);
    }

    #[test]
    fn test_nearest_rounds_half_away_from_zero() {
        let calc = ProrationCalculator::new();
        // 125 * 10 / 25... pick a genuine half: 25 cents, 15 of 30 days -> 12.5
        let calc_value = calc.apply_rounding(dec!(12.5));
        assert_eq!(calc_value, dec!(13));
        assert_eq!(calc.apply_rounding(dec!(12.4)), dec!(12));
        assert_eq!(calc.apply_rounding(dec!(12.6)), dec!(13));
    }
}
