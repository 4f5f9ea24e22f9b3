pub mod models;
pub mod queries;

use sqlx::PgPool;

use crate::audit::entry::AuditLogEntry;
use crate::error::HrisError;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Database { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        // Run initial schema migration
        sqlx::raw_sql(include_str!("../../migrations/001_initial_schema.sql"))
            .execute(&self.pool)
            .await?;

        // Run audit trail migration
        sqlx::raw_sql(include_str!("../../migrations/002_audit_trail.sql"))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Append an audit entry. The trail is append-only: there is no update
    /// or delete path anywhere in the crate.
    pub async fn insert_audit_entry(&self, entry: &AuditLogEntry) -> Result<(), HrisError> {
        let old_values = entry
            .old_values
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        let new_values = entry
            .new_values
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO audit_log_entries
                (id, company_id, event_timestamp, event_type, entity_type,
                 entity_id, actor_id, old_values, new_values,
                 checksum, previous_checksum)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(entry.id)
        .bind(entry.company_id)
        .bind(entry.event_timestamp)
        .bind(entry.event_type.as_str())
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(entry.actor_id)
        .bind(old_values)
        .bind(new_values)
        .bind(&entry.checksum)
        .bind(&entry.previous_checksum)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
