//! Audit Log Entry
//!
//! Defines the structure for tamper-evident compliance audit log entries
//! with checksum hash chains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tracked compliance event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    AssignmentCreated,
    AssignmentCompleted,
    StatusChanged,
    EscalationTriggered,
    ExemptionRequested,
    ExemptionApproved,
    ExemptionRejected,
    GracePeriodExtended,
    RequirementCreated,
    RequirementUpdated,
    BulkAssignment,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::AssignmentCreated => "assignment_created",
            AuditEventType::AssignmentCompleted => "assignment_completed",
            AuditEventType::StatusChanged => "status_changed",
            AuditEventType::EscalationTriggered => "escalation_triggered",
            AuditEventType::ExemptionRequested => "exemption_requested",
            AuditEventType::ExemptionApproved => "exemption_approved",
            AuditEventType::ExemptionRejected => "exemption_rejected",
            AuditEventType::GracePeriodExtended => "grace_period_extended",
            AuditEventType::RequirementCreated => "requirement_created",
            AuditEventType::RequirementUpdated => "requirement_updated",
            AuditEventType::BulkAssignment => "bulk_assignment",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assignment_created" => Ok(AuditEventType::AssignmentCreated),
            "assignment_completed" => Ok(AuditEventType::AssignmentCompleted),
            "status_changed" => Ok(AuditEventType::StatusChanged),
            "escalation_triggered" => Ok(AuditEventType::EscalationTriggered),
            "exemption_requested" => Ok(AuditEventType::ExemptionRequested),
            "exemption_approved" => Ok(AuditEventType::ExemptionApproved),
            "exemption_rejected" => Ok(AuditEventType::ExemptionRejected),
            "grace_period_extended" => Ok(AuditEventType::GracePeriodExtended),
            "requirement_created" => Ok(AuditEventType::RequirementCreated),
            "requirement_updated" => Ok(AuditEventType::RequirementUpdated),
            "bulk_assignment" => Ok(AuditEventType::BulkAssignment),
            other => Err(format!("Unknown audit event type: {}", other)),
        }
    }
}

/// A single field value captured in a before/after snapshot.
///
/// Snapshots are schema-less: any business entity can be diffed. Nested
/// objects are carried as opaque JSON rather than flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Flag(bool),
    Number(f64),
    Text(String),
    Opaque(serde_json::Value),
}

/// Ordered field-name -> value snapshot of an entity before or after a change.
pub type Snapshot = BTreeMap<String, FieldValue>;

/// Audit log entry with checksum hash chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub company_id: Uuid,
    pub event_timestamp: DateTime<Utc>,
    pub event_type: AuditEventType,
    pub entity_type: String,
    pub entity_id: Uuid,
    /// None means the event was system-initiated.
    pub actor_id: Option<Uuid>,
    pub old_values: Option<Snapshot>,
    pub new_values: Option<Snapshot>,
    /// Checksum of this entry's content. None on rows written before
    /// checksumming was introduced.
    pub checksum: Option<String>,
    /// Checksum of the chain predecessor (the entry immediately prior in
    /// time), or None for the first chained entry.
    pub previous_checksum: Option<String>,
}

impl AuditLogEntry {
    /// Create a new entry, computing its checksum from content.
    pub fn new(
        company_id: Uuid,
        event_type: AuditEventType,
        entity_type: String,
        entity_id: Uuid,
        actor_id: Option<Uuid>,
        old_values: Option<Snapshot>,
        new_values: Option<Snapshot>,
        previous_checksum: Option<String>,
    ) -> Self {
        let mut entry = Self {
            id: Uuid::new_v4(),
            company_id,
            event_timestamp: Utc::now(),
            event_type,
            entity_type,
            entity_id,
            actor_id,
            old_values,
            new_values,
            checksum: None,
            previous_checksum,
        };

        entry.checksum = Some(entry.calculate_checksum());
        entry
    }

    /// Create canonical string representation for hashing
    pub fn canonical_string(&self) -> String {
        format!(
            "id:{}|company_id:{}|event_timestamp:{}|event_type:{}|entity_type:{}|entity_id:{}|actor_id:{}|old_values:{}|new_values:{}|previous_checksum:{}",
            self.id,
            self.company_id,
            self.event_timestamp.to_rfc3339(),
            self.event_type,
            self.entity_type,
            self.entity_id,
            self.actor_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "system".to_string()),
            serialize_snapshot(self.old_values.as_ref()),
            serialize_snapshot(self.new_values.as_ref()),
            self.previous_checksum.as_deref().unwrap_or("-"),
        )
    }

    /// Calculate SHA256 checksum of this entry
    pub fn calculate_checksum(&self) -> String {
        let canonical = self.canonical_string();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let hash = hasher.finalize();
        format!("sha256:{}", hex::encode(hash))
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{}: {} {} by {}",
            self.event_type,
            self.entity_type,
            self.entity_id,
            self.actor_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "system".to_string()),
        )
    }
}

/// Serialize a snapshot map to a deterministic string for hashing.
///
/// BTreeMap iteration is key-ordered, so equal snapshots always hash equal.
fn serialize_snapshot(snapshot: Option<&Snapshot>) -> String {
    match snapshot {
        None => "-".to_string(),
        Some(map) => {
            let items: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    let value = serde_json::to_string(v).unwrap_or_else(|_| "null".to_string());
                    format!("{}:{}", k, value)
                })
                .collect();
            items.join(",")
        }
    }
}
