//! Compliance Audit Trail
//!
//! Provides tamper-evident logging for tracked compliance actions with
//! checksum hash chains, and link-integrity verification over trail pages.

pub mod entry;
pub mod recorder;
pub mod verify;

pub use entry::{AuditEventType, AuditLogEntry, FieldValue, Snapshot};
pub use recorder::{AuditRecorder, NewAuditEvent};
pub use verify::{load_audit_trail_from_file, verify_audit_trail_file, verify_chain, ChainReport, ChainStatus};
