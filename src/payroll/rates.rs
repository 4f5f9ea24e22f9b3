//! Locked Exchange Rates
//!
//! A payroll run locks its exchange rates at rate-selection time. All
//! conversions for that run use exactly the locked set; rates are never
//! re-derived or interpolated afterward.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single locked exchange rate row for a payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub rate_date: NaiveDate,
    pub source: String,
}

/// Lookup over a payroll run's locked rates, keyed by (from, to).
#[derive(Debug, Clone, Default)]
pub struct LockedRateSet {
    rates: HashMap<(String, String), Decimal>,
}

impl LockedRateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rates(rows: impl IntoIterator<Item = ExchangeRate>) -> Self {
        let mut set = Self::new();
        for row in rows {
            set.insert(&row.from_currency, &row.to_currency, row.rate);
        }
        set
    }

    pub fn insert(&mut self, from: &str, to: &str, rate: Decimal) {
        self.rates.insert((from.to_string(), to.to_string()), rate);
    }

    /// Direct (from, to) rate, if locked.
    pub fn direct(&self, from: &str, to: &str) -> Option<Decimal> {
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Policy for a rate lookup that finds nothing.
///
/// `DefaultToUnity` is the lenient preview behavior: an absent rate is
/// substituted with 1 so a UI estimate can still render. `Fail` is the
/// disbursement behavior: an absent rate is an error, never a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRatePolicy {
    DefaultToUnity,
    Fail,
}

/// Result of a stored-rate conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub amount: Decimal,
    pub rate_used: Decimal,
}

/// Convert an amount using a run's locked rates.
///
/// Tries the direct (from, to) rate, then falls back to the inverse
/// (to, from) rate as 1/rate. Returns None when neither direction is
/// locked; callers must treat that as a missing-rate condition rather
/// than assuming parity.
pub fn convert_with_stored_rate(
    amount: Decimal,
    from: &str,
    to: &str,
    rates: &LockedRateSet,
) -> Option<Converted> {
    if from == to {
        return Some(Converted {
            amount,
            rate_used: Decimal::ONE,
        });
    }

    if let Some(rate) = rates.direct(from, to) {
        return Some(Converted {
            amount: amount * rate,
            rate_used: rate,
        });
    }

    if let Some(inverse) = rates.direct(to, from) {
        if !inverse.is_zero() {
            let rate = Decimal::ONE / inverse;
            return Some(Converted {
                amount: amount * rate,
                rate_used: rate,
            });
        }
    }

    None
}
