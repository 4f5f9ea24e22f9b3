//! Employee Currency Preferences
//!
//! An employee may route part of their net pay into a secondary currency,
//! either as a percentage of net pay or as a fixed secondary-currency
//! amount. Preferences carry a validity window; at most one is active for
//! an employee on a given date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    Percentage,
    FixedAmount,
    AllPrimary,
}

impl SplitMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMethod::Percentage => "percentage",
            SplitMethod::FixedAmount => "fixed_amount",
            SplitMethod::AllPrimary => "all_primary",
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(SplitMethod::Percentage),
            "fixed_amount" => Ok(SplitMethod::FixedAmount),
            "all_primary" => Ok(SplitMethod::AllPrimary),
            other => Err(format!("Unknown split method: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyPreference {
    pub employee_id: Uuid,
    pub company_id: Uuid,
    pub primary_currency: String,
    pub secondary_currency: Option<String>,
    pub split_method: SplitMethod,
    /// 0-100, used when split_method = percentage.
    pub secondary_percentage: Option<Decimal>,
    /// Denominated in the secondary currency, used when
    /// split_method = fixed_amount.
    pub secondary_fixed_amount: Option<Decimal>,
    pub effective_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl CurrencyPreference {
    /// Whether this preference's validity window covers the given date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if self.effective_date > date {
            return false;
        }
        match self.end_date {
            Some(end) => end >= date,
            None => true,
        }
    }
}

/// Resolve the preference in force for a date: the latest-effective entry
/// whose window covers it. Mirrors the query-layer resolution for
/// in-memory slices.
pub fn active_preference_on(
    preferences: &[CurrencyPreference],
    date: NaiveDate,
) -> Option<&CurrencyPreference> {
    preferences
        .iter()
        .filter(|p| p.is_active_on(date))
        .max_by_key(|p| p.effective_date)
}
