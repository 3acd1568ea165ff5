//! Billing month handling
//!
//! A billing month is identified by a `"YYYY-MM"` token (e.g. `"2022-04"` for
//! April 2022). [`BillingMonth`] validates the token once at construction;
//! the first day, last day, and day count derive from it.

use crate::{BillingError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar (year, month) pair for which a charge is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// Create a billing month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(
                BillingError::InvalidMonthFormat(format!("{:04}-{:02}", year, month)).into(),
            );
        }
        Ok(Self { year, month })
    }

    /// Parse a `"YYYY-MM"` token (four-digit year, two-digit month).
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = || BillingError::InvalidMonthFormat(token.to_string());

        let (year, month) = token.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.chars().all(|c| c.is_ascii_digit())
            || !month.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid().into());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid().into())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Invariant: (year, month) validated at construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Last calendar day of the month (inclusive).
    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or_else(|| self.first_day())
    }

    /// Number of days in the month (28-31, leap-aware).
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
