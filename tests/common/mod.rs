use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use hris_app::audit::{AuditEventType, AuditLogEntry, FieldValue, NewAuditEvent, Snapshot};
use hris_app::payroll::{CurrencyPreference, LockedRateSet, SplitMethod};

/// Build a tracked event for a fixed tenant.
pub fn test_event(company_id: Uuid, event_type: AuditEventType) -> NewAuditEvent {
    let mut new_values = Snapshot::new();
    new_values.insert(
        "status".to_string(),
        FieldValue::Text("assigned".to_string()),
    );

    NewAuditEvent {
        company_id,
        event_type,
        entity_type: "training_assignment".to_string(),
        entity_id: Uuid::new_v4(),
        actor_id: Some(Uuid::new_v4()),
        old_values: None,
        new_values: Some(new_values),
    }
}

/// Build a recorder-style chain of `count` entries, returned newest-first
/// as the trail query would deliver them.
pub fn chained_entries(company_id: Uuid, count: usize) -> Vec<AuditLogEntry> {
    let mut entries: Vec<AuditLogEntry> = Vec::with_capacity(count);
    let mut head: Option<String> = None;

    for _ in 0..count {
        let entry = test_event(company_id, AuditEventType::StatusChanged).into_entry(head.clone());
        head = entry.checksum.clone();
        entries.push(entry);
    }

    entries.reverse();
    entries
}

/// An entry carrying explicit checksum strings, for link-level cases.
pub fn entry_with_checksums(
    checksum: Option<&str>,
    previous_checksum: Option<&str>,
) -> AuditLogEntry {
    let mut entry = test_event(Uuid::new_v4(), AuditEventType::AssignmentCreated)
        .into_entry(previous_checksum.map(|s| s.to_string()));
    entry.checksum = checksum.map(|s| s.to_string());
    entry
}

pub fn percentage_preference(secondary: &str, percentage: Decimal) -> CurrencyPreference {
    CurrencyPreference {
        employee_id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
        primary_currency: "USD".to_string(),
        secondary_currency: Some(secondary.to_string()),
        split_method: SplitMethod::Percentage,
        secondary_percentage: Some(percentage),
        secondary_fixed_amount: None,
        effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: None,
    }
}

pub fn fixed_amount_preference(secondary: &str, fixed: Decimal) -> CurrencyPreference {
    CurrencyPreference {
        employee_id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
        primary_currency: "USD".to_string(),
        secondary_currency: Some(secondary.to_string()),
        split_method: SplitMethod::FixedAmount,
        secondary_percentage: None,
        secondary_fixed_amount: Some(fixed),
        effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: None,
    }
}

pub fn rates_with(from: &str, to: &str, rate: Decimal) -> LockedRateSet {
    let mut rates = LockedRateSet::new();
    rates.insert(from, to, rate);
    rates
}
