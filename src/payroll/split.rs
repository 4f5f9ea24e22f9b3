//! Net Pay Currency Split
//!
//! Decomposes a net pay amount in an employee's local currency into
//! currency-tagged disbursement legs according to the employee's currency
//! preference and a payroll run's locked exchange rates.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::HrisError;
use crate::payroll::preference::{CurrencyPreference, SplitMethod};
use crate::payroll::rates::{LockedRateSet, MissingRatePolicy};

/// One disbursement leg of a net pay split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetPaySplit {
    pub currency: String,
    /// Amount payable in `currency`.
    pub amount: Decimal,
    pub exchange_rate_used: Decimal,
    /// The slice of net pay this leg accounts for, in the local currency.
    /// Legs always sum to the full net pay in this view.
    pub local_currency_equivalent: Decimal,
    pub is_primary: bool,
}

impl NetPaySplit {
    fn all_primary(net_pay_local: Decimal, local_currency: &str) -> Self {
        Self {
            currency: local_currency.to_string(),
            amount: net_pay_local,
            exchange_rate_used: Decimal::ONE,
            local_currency_equivalent: net_pay_local,
            is_primary: true,
        }
    }
}

/// Compute the disbursement legs for a net pay amount.
///
/// With no preference, an `all_primary` method, a missing secondary
/// currency, or a missing percentage/fixed-amount value, the full amount
/// stays in the local currency as a single primary leg. Otherwise two legs
/// are emitted, secondary first, and the primary remainder is derived by
/// subtraction so the local-currency equivalents always sum to
/// `net_pay_local` exactly.
///
/// The split path looks up the local -> secondary rate directly; there is
/// no inverse fallback here (that belongs to [`convert_with_stored_rate`]).
/// An absent rate is resolved per `on_missing_rate`.
///
/// [`convert_with_stored_rate`]: crate::payroll::rates::convert_with_stored_rate
pub fn calculate_net_pay_split(
    net_pay_local: Decimal,
    local_currency: &str,
    preference: Option<&CurrencyPreference>,
    rates: &LockedRateSet,
    on_missing_rate: MissingRatePolicy,
) -> Result<Vec<NetPaySplit>, HrisError> {
    let all_primary = || vec![NetPaySplit::all_primary(net_pay_local, local_currency)];

    let Some(pref) = preference else {
        return Ok(all_primary());
    };

    let Some(secondary_currency) = pref.secondary_currency.as_deref() else {
        return Ok(all_primary());
    };

    match pref.split_method {
        SplitMethod::AllPrimary => Ok(all_primary()),
        SplitMethod::Percentage => {
            let Some(percentage) = pref.secondary_percentage else {
                return Ok(all_primary());
            };

            let rate = resolve_rate(rates, local_currency, secondary_currency, on_missing_rate)?;
            let local_portion = round_money(net_pay_local * percentage / Decimal::from(100));
            let secondary_amount = round_money(local_portion * rate);

            Ok(two_legs(
                net_pay_local,
                local_currency,
                secondary_currency,
                secondary_amount,
                rate,
                local_portion,
            ))
        }
        SplitMethod::FixedAmount => {
            let Some(fixed_amount) = pref.secondary_fixed_amount else {
                return Ok(all_primary());
            };

            let rate = resolve_rate(rates, local_currency, secondary_currency, on_missing_rate)?;
            let local_equivalent = round_money(fixed_amount / rate);

            // The secondary leg can never exceed the total net pay; the
            // primary remainder must not go negative.
            let actual_local_equivalent = if local_equivalent > net_pay_local {
                warn!(
                    "Fixed {} split of {} exceeds net pay {} {}; clamping",
                    secondary_currency, fixed_amount, net_pay_local, local_currency
                );
                net_pay_local
            } else {
                local_equivalent
            };
            let actual_secondary_amount = round_money(actual_local_equivalent * rate);

            Ok(two_legs(
                net_pay_local,
                local_currency,
                secondary_currency,
                actual_secondary_amount,
                rate,
                actual_local_equivalent,
            ))
        }
    }
}

fn two_legs(
    net_pay_local: Decimal,
    local_currency: &str,
    secondary_currency: &str,
    secondary_amount: Decimal,
    rate: Decimal,
    secondary_local_equivalent: Decimal,
) -> Vec<NetPaySplit> {
    let primary_remainder = net_pay_local - secondary_local_equivalent;
    vec![
        NetPaySplit {
            currency: secondary_currency.to_string(),
            amount: secondary_amount,
            exchange_rate_used: rate,
            local_currency_equivalent: secondary_local_equivalent,
            is_primary: false,
        },
        NetPaySplit {
            currency: local_currency.to_string(),
            amount: primary_remainder,
            exchange_rate_used: Decimal::ONE,
            local_currency_equivalent: primary_remainder,
            is_primary: true,
        },
    ]
}

/// Direct rate lookup for the split path. A zero rate cannot back a
/// division and is treated the same as an absent one.
fn resolve_rate(
    rates: &LockedRateSet,
    from: &str,
    to: &str,
    on_missing_rate: MissingRatePolicy,
) -> Result<Decimal, HrisError> {
    match rates.direct(from, to) {
        Some(rate) if !rate.is_zero() => Ok(rate),
        _ => match on_missing_rate {
            MissingRatePolicy::DefaultToUnity => Ok(Decimal::ONE),
            MissingRatePolicy::Fail => Err(HrisError::missing_rate(from, to)),
        },
    }
}

/// Banker's rounding to 2 decimal places.
fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
