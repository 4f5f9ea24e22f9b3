use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::entry::{AuditEventType, AuditLogEntry};
use crate::database::models::{AuditEntryRow, CurrencyPreferenceRow, ExchangeRateRow};
use crate::error::HrisError;
use crate::payroll::preference::CurrencyPreference;
use crate::payroll::rates::LockedRateSet;
use crate::payroll::split::NetPaySplit;

/// Fixed page cap for audit trail queries.
pub const AUDIT_TRAIL_PAGE_LIMIT: i64 = 500;

/// Optional filters for an audit trail page.
#[derive(Debug, Clone, Default)]
pub struct AuditTrailFilter {
    pub event_type: Option<AuditEventType>,
    pub entity_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub struct Queries;

impl Queries {
    /// Fetch a tenant's audit trail page, newest first. The chain verifier
    /// relies on this ordering.
    pub async fn audit_trail(
        pool: &PgPool,
        company_id: Uuid,
        filter: &AuditTrailFilter,
    ) -> Result<Vec<AuditLogEntry>, HrisError> {
        let rows = sqlx::query_as::<_, AuditEntryRow>(
            r#"
            SELECT id, company_id, event_timestamp, event_type, entity_type,
                   entity_id, actor_id, old_values, new_values,
                   checksum, previous_checksum
            FROM audit_log_entries
            WHERE company_id = $1
              AND ($2::text IS NULL OR event_type = $2)
              AND ($3::text IS NULL OR entity_type = $3)
              AND ($4::timestamptz IS NULL OR event_timestamp >= $4)
              AND ($5::timestamptz IS NULL OR event_timestamp <= $5)
            ORDER BY event_timestamp DESC
            LIMIT $6
            "#,
        )
        .bind(company_id)
        .bind(filter.event_type.map(|t| t.as_str().to_string()))
        .bind(filter.entity_type.clone())
        .bind(filter.from)
        .bind(filter.to)
        .bind(AUDIT_TRAIL_PAGE_LIMIT)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(AuditLogEntry::try_from).collect()
    }

    /// Checksum of the newest audit entry for a tenant, i.e. the current
    /// chain head.
    pub async fn head_checksum(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Option<String>, HrisError> {
        let head: Option<Option<String>> = sqlx::query_scalar(
            r#"
            SELECT checksum
            FROM audit_log_entries
            WHERE company_id = $1
            ORDER BY event_timestamp DESC
            LIMIT 1
            "#,
        )
        .bind(company_id)
        .fetch_optional(pool)
        .await?;

        Ok(head.flatten())
    }

    /// Resolve the currency preference in force for an employee on a date:
    /// latest effective entry whose window covers the date.
    pub async fn active_preference(
        pool: &PgPool,
        company_id: Uuid,
        employee_id: Uuid,
        on_date: NaiveDate,
    ) -> Result<Option<CurrencyPreference>, HrisError> {
        let row = sqlx::query_as::<_, CurrencyPreferenceRow>(
            r#"
            SELECT employee_id, company_id, primary_currency, secondary_currency,
                   split_method, secondary_percentage, secondary_fixed_amount,
                   effective_date, end_date
            FROM currency_preferences
            WHERE company_id = $1
              AND employee_id = $2
              AND effective_date <= $3
              AND (end_date IS NULL OR end_date >= $3)
            ORDER BY effective_date DESC
            LIMIT 1
            "#,
        )
        .bind(company_id)
        .bind(employee_id)
        .bind(on_date)
        .fetch_optional(pool)
        .await?;

        row.map(CurrencyPreference::try_from).transpose()
    }

    /// Load a payroll run's locked exchange rates.
    pub async fn locked_rates(pool: &PgPool, run_id: Uuid) -> Result<LockedRateSet, HrisError> {
        let rows = sqlx::query_as::<_, ExchangeRateRow>(
            r#"
            SELECT from_currency, to_currency, rate, rate_date, source
            FROM payroll_exchange_rates
            WHERE payroll_run_id = $1
            "#,
        )
        .bind(run_id)
        .fetch_all(pool)
        .await?;

        Ok(LockedRateSet::from_rates(rows.into_iter().map(Into::into)))
    }

    /// Persist the disbursement legs computed for an employee in a run.
    pub async fn insert_disbursements(
        pool: &PgPool,
        run_id: Uuid,
        employee_id: Uuid,
        splits: &[NetPaySplit],
    ) -> Result<(), HrisError> {
        for split in splits {
            sqlx::query(
                r#"
                INSERT INTO payroll_disbursements
                    (id, payroll_run_id, employee_id, currency, amount,
                     exchange_rate_used, local_currency_equivalent, is_primary)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(run_id)
            .bind(employee_id)
            .bind(&split.currency)
            .bind(split.amount)
            .bind(split.exchange_rate_used)
            .bind(split.local_currency_equivalent)
            .bind(split.is_primary)
            .execute(pool)
            .await?;
        }

        Ok(())
    }
}
