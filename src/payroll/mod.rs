//! Multi-Currency Payroll
//!
//! Currency preference resolution, locked exchange rates, and the net pay
//! split calculation that turns one net pay amount into per-currency
//! disbursement legs.

pub mod preference;
pub mod rates;
pub mod split;

pub use preference::{active_preference_on, CurrencyPreference, SplitMethod};
pub use rates::{convert_with_stored_rate, Converted, ExchangeRate, LockedRateSet, MissingRatePolicy};
pub use split::{calculate_net_pay_split, NetPaySplit};
