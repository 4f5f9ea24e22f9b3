//! Row models for the HRIS schema.
//!
//! Rows are fetched with runtime-bound `query_as` and converted into the
//! domain types; enum-like columns are stored as text and parsed on the
//! way out.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::audit::entry::{AuditLogEntry, Snapshot};
use crate::error::HrisError;
use crate::payroll::preference::CurrencyPreference;
use crate::payroll::rates::ExchangeRate;

#[derive(Debug, Clone, FromRow)]
pub struct AuditEntryRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub event_timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub checksum: Option<String>,
    pub previous_checksum: Option<String>,
}

impl TryFrom<AuditEntryRow> for AuditLogEntry {
    type Error = HrisError;

    fn try_from(row: AuditEntryRow) -> Result<Self, Self::Error> {
        let event_type = row
            .event_type
            .parse()
            .map_err(HrisError::AuditError)?;

        Ok(AuditLogEntry {
            id: row.id,
            company_id: row.company_id,
            event_timestamp: row.event_timestamp,
            event_type,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            actor_id: row.actor_id,
            old_values: parse_snapshot(row.old_values)?,
            new_values: parse_snapshot(row.new_values)?,
            checksum: row.checksum,
            previous_checksum: row.previous_checksum,
        })
    }
}

fn parse_snapshot(value: Option<serde_json::Value>) -> Result<Option<Snapshot>, HrisError> {
    match value {
        None => Ok(None),
        Some(v) => Ok(Some(serde_json::from_value(v)?)),
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CurrencyPreferenceRow {
    pub employee_id: Uuid,
    pub company_id: Uuid,
    pub primary_currency: String,
    pub secondary_currency: Option<String>,
    pub split_method: String,
    pub secondary_percentage: Option<Decimal>,
    pub secondary_fixed_amount: Option<Decimal>,
    pub effective_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl TryFrom<CurrencyPreferenceRow> for CurrencyPreference {
    type Error = HrisError;

    fn try_from(row: CurrencyPreferenceRow) -> Result<Self, Self::Error> {
        let split_method = row
            .split_method
            .parse()
            .map_err(HrisError::ValidationError)?;

        Ok(CurrencyPreference {
            employee_id: row.employee_id,
            company_id: row.company_id,
            primary_currency: row.primary_currency,
            secondary_currency: row.secondary_currency,
            split_method,
            secondary_percentage: row.secondary_percentage,
            secondary_fixed_amount: row.secondary_fixed_amount,
            effective_date: row.effective_date,
            end_date: row.end_date,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ExchangeRateRow {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub rate_date: NaiveDate,
    pub source: String,
}

impl From<ExchangeRateRow> for ExchangeRate {
    fn from(row: ExchangeRateRow) -> Self {
        ExchangeRate {
            from_currency: row.from_currency,
            to_currency: row.to_currency,
            rate: row.rate,
            rate_date: row.rate_date,
            source: row.source,
        }
    }
}
