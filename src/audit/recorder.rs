//! Audit Recorder
//!
//! The single write path for the compliance audit trail. Each tracked
//! action is recorded once, at the moment it happens: the recorder
//! computes the entry checksum, links it to the tenant's current chain
//! head, and appends. Entries are never updated or deleted.

use tracing::debug;
use uuid::Uuid;

use crate::audit::entry::{AuditEventType, AuditLogEntry, Snapshot};
use crate::database::queries::Queries;
use crate::database::Database;
use crate::error::HrisError;

/// A tracked action about to enter the audit trail.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub company_id: Uuid,
    pub event_type: AuditEventType,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub old_values: Option<Snapshot>,
    pub new_values: Option<Snapshot>,
}

impl NewAuditEvent {
    /// Build the chained, checksummed entry for this event.
    pub fn into_entry(self, previous_checksum: Option<String>) -> AuditLogEntry {
        AuditLogEntry::new(
            self.company_id,
            self.event_type,
            self.entity_type,
            self.entity_id,
            self.actor_id,
            self.old_values,
            self.new_values,
            previous_checksum,
        )
    }
}

#[derive(Clone)]
pub struct AuditRecorder {
    database: Database,
}

impl AuditRecorder {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Append a new entry linked to the tenant's current chain head.
    pub async fn record(&self, event: NewAuditEvent) -> Result<AuditLogEntry, HrisError> {
        let previous_checksum =
            Queries::head_checksum(self.database.pool(), event.company_id).await?;

        let entry = event.into_entry(previous_checksum);
        self.database.insert_audit_entry(&entry).await?;

        debug!("Recorded audit entry: {}", entry.summary());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::FieldValue;
    use crate::audit::verify::{verify_chain, ChainStatus};

    fn event(company_id: Uuid) -> NewAuditEvent {
        let mut new_values = Snapshot::new();
        new_values.insert("status".to_string(), FieldValue::Text("assigned".into()));

        NewAuditEvent {
            company_id,
            event_type: AuditEventType::AssignmentCreated,
            entity_type: "training_assignment".to_string(),
            entity_id: Uuid::new_v4(),
            actor_id: Some(Uuid::new_v4()),
            old_values: None,
            new_values: Some(new_values),
        }
    }

    #[test]
    fn test_entries_chain_through_head_checksum() {
        let company_id = Uuid::new_v4();

        let first = event(company_id).into_entry(None);
        let second = event(company_id).into_entry(first.checksum.clone());
        let third = event(company_id).into_entry(second.checksum.clone());

        assert_eq!(second.previous_checksum, first.checksum);
        assert_eq!(third.previous_checksum, second.checksum);

        // Newest first, as the trail query returns them.
        let report = verify_chain(&[third, second, first]);
        assert_eq!(report.status, ChainStatus::Verified);
        assert_eq!(report.checked_links, 2);
    }

    #[test]
    fn test_first_entry_has_no_predecessor() {
        let entry = event(Uuid::new_v4()).into_entry(None);
        assert!(entry.previous_checksum.is_none());
        assert!(entry.checksum.is_some());
    }
}
